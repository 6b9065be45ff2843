//! Flattening of the nested Crowdin file tree into a path index.

use serde_json::Value;
use std::sync::Arc;
use tracing::{trace, warn};

use super::api_types::{project_files, RawNode};
use super::error::ModelError;
use super::types::{Directory, File, FileIndex, Node};

/// Build the flat index for the `files` array of project info.
pub fn parse_project_files(info: &Value) -> Result<FileIndex, ModelError> {
  let nodes = project_files(info)?;
  Ok(parse_files("", nodes))
}

/// Flatten `nodes` into a path index rooted at `prefix`.
///
/// Every node's path is `prefix/name`. A directory is inserted together with
/// all of its descendants, and also embeds those descendants as its own
/// `files`. Nodes of unknown type produce no entry. A repeated path replaces
/// the earlier entry.
pub fn parse_files(prefix: &str, nodes: Vec<RawNode>) -> FileIndex {
  let mut files = FileIndex::new();

  for node in nodes {
    match node {
      RawNode::File { name, data } => {
        let path = format!("{}/{}", prefix, name);
        trace!(path = %path, "Parsed file");
        insert(&mut files, path.clone(), Node::File(File::new(data, path)));
      }
      RawNode::Directory {
        name,
        data,
        files: children,
      } => {
        let path = format!("{}/{}", prefix, name);
        let kids = parse_files(&path, children);
        trace!(path = %path, descendants = kids.len(), "Parsed directory");

        let dir = Directory::new(data, path.clone(), kids.clone());
        insert(&mut files, path, Node::Directory(dir));
        for (kid_path, kid) in kids {
          if files.insert(kid_path.clone(), kid).is_some() {
            warn!(path = %kid_path, "Duplicate path in project tree, keeping the later node");
          }
        }
      }
      RawNode::Unknown { node_type } => {
        warn!(
          prefix = %prefix,
          node_type = node_type.as_deref().unwrap_or("<none>"),
          "Skipping node of unknown type"
        );
      }
    }
  }

  files
}

fn insert(files: &mut FileIndex, path: String, node: Node) {
  if files.insert(path.clone(), Arc::new(node)).is_some() {
    warn!(path = %path, "Duplicate path in project tree, keeping the later node");
  }
}
