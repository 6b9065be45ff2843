//! Typed view of the Crowdin project info payload.
//!
//! The payload is checked once here; the tree parser and record types only
//! ever see [`RawNode`] values.

use serde_json::Value;

use super::error::ModelError;
use super::model::RawMap;

/// One entry of a project's `files` array
#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
  File {
    name: String,
    data: RawMap,
  },
  Directory {
    name: String,
    data: RawMap,
    files: Vec<RawNode>,
  },
  /// A node_type this client does not know (or none at all)
  Unknown { node_type: Option<String> },
}

impl RawNode {
  pub fn from_value(value: &Value) -> Result<Self, ModelError> {
    let data = value
      .as_object()
      .ok_or_else(|| ModelError::InvalidPayload(format!("file node is not an object: {}", value)))?;

    let node_type = data.get("node_type").and_then(Value::as_str);
    match node_type {
      Some("file") => Ok(RawNode::File {
        name: node_name(data)?,
        data: data.clone(),
      }),
      Some("directory") => {
        let name = node_name(data)?;
        let files = match data.get("files") {
          Some(files) => parse_nodes(files, &name)?,
          None => return Err(ModelError::missing_field("files")),
        };
        Ok(RawNode::Directory {
          name,
          data: data.clone(),
          files,
        })
      }
      other => Ok(RawNode::Unknown {
        node_type: other.map(String::from),
      }),
    }
  }
}

fn node_name(data: &RawMap) -> Result<String, ModelError> {
  match data.get("name") {
    Some(Value::String(name)) => Ok(name.clone()),
    None | Some(Value::Null) => Err(ModelError::missing_field("name")),
    Some(_) => Err(ModelError::unexpected_type("name", "a string")),
  }
}

/// Parse an array of raw nodes. `owner` names the array in errors.
pub fn parse_nodes(value: &Value, owner: &str) -> Result<Vec<RawNode>, ModelError> {
  value
    .as_array()
    .ok_or_else(|| ModelError::InvalidPayload(format!("files of {:?} is not an array", owner)))?
    .iter()
    .map(RawNode::from_value)
    .collect()
}

/// The top-level `files` array of project info
pub fn project_files(info: &Value) -> Result<Vec<RawNode>, ModelError> {
  let files = info
    .get("files")
    .ok_or_else(|| ModelError::missing_field("files"))?;
  parse_nodes(files, "project")
}

/// The `details` object of project info
pub fn project_details(info: &Value) -> Result<RawMap, ModelError> {
  match info.get("details") {
    Some(Value::Object(details)) => Ok(details.clone()),
    Some(_) => Err(ModelError::unexpected_type("details", "an object")),
    None => Err(ModelError::missing_field("details")),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_file_and_directory_nodes() {
    let nodes = parse_nodes(
      &json!([
        {"name": "a", "node_type": "file", "last_revision": "1"},
        {"name": "b", "node_type": "directory", "files": [
          {"name": "c", "node_type": "file"}
        ]}
      ]),
      "test",
    )
    .unwrap();

    assert_eq!(nodes.len(), 2);
    assert!(matches!(&nodes[0], RawNode::File { name, data } if name == "a" && data.contains_key("last_revision")));
    match &nodes[1] {
      RawNode::Directory { name, files, .. } => {
        assert_eq!(name, "b");
        assert!(matches!(&files[0], RawNode::File { name, .. } if name == "c"));
      }
      other => panic!("expected directory, got {:?}", other),
    }
  }

  #[test]
  fn test_unknown_node_type_is_kept_as_unknown() {
    let nodes = parse_nodes(
      &json!([
        {"name": "x", "node_type": "branch"},
        {"name": "y"},
      ]),
      "test",
    )
    .unwrap();

    assert_eq!(
      nodes,
      vec![
        RawNode::Unknown {
          node_type: Some("branch".to_string())
        },
        RawNode::Unknown { node_type: None },
      ]
    );
  }

  #[test]
  fn test_malformed_nodes() {
    assert_eq!(
      RawNode::from_value(&json!({"node_type": "file"})),
      Err(ModelError::missing_field("name"))
    );
    assert_eq!(
      RawNode::from_value(&json!({"name": "d", "node_type": "directory"})),
      Err(ModelError::missing_field("files"))
    );
    assert!(matches!(
      RawNode::from_value(&json!("a")),
      Err(ModelError::InvalidPayload(_))
    ));
    assert!(matches!(
      parse_nodes(&json!({"name": "a"}), "test"),
      Err(ModelError::InvalidPayload(_))
    ));
  }

  #[test]
  fn test_project_details() {
    let info = json!({"details": {"name": "p"}, "files": []});
    assert_eq!(project_details(&info).unwrap().get("name"), Some(&json!("p")));
    assert_eq!(project_files(&info).unwrap(), vec![]);

    assert_eq!(
      project_details(&json!({})),
      Err(ModelError::missing_field("details"))
    );
    assert_eq!(
      project_files(&json!({})),
      Err(ModelError::missing_field("files"))
    );
  }
}
