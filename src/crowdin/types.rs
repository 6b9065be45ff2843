//! Domain records decoded from Crowdin project info.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::api_types::project_details;
use super::error::ModelError;
use super::model::{integer_field, raw_field, time_field, FieldDef, Model, RawMap, Record};

/// Every node of a project tree keyed by its slash-separated path
pub type FileIndex = BTreeMap<String, Arc<Node>>;

type StrResult<'a> = Result<Option<&'a str>, ModelError>;
type TimeResult = Result<Option<DateTime<Utc>>, ModelError>;
type IntResult = Result<Option<i64>, ModelError>;

/// Project details (the `details` object of project info)
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
  model: Model,
}

impl Project {
  pub fn new(data: RawMap) -> Self {
    Self {
      model: Model::new(data),
    }
  }

  /// Build the project from the `details` object of project info
  pub fn from_info(info: &serde_json::Value) -> Result<Self, ModelError> {
    Ok(Self::new(project_details(info)?))
  }

  pub fn identifier(&self) -> StrResult<'_> {
    self.model.raw("identifier")
  }

  pub fn name(&self) -> StrResult<'_> {
    self.model.raw("name")
  }

  pub fn description(&self) -> StrResult<'_> {
    self.model.raw("description")
  }

  pub fn source_language(&self) -> StrResult<'_> {
    self.model.raw("source_language")
  }

  pub fn invite_url(&self) -> StrResult<'_> {
    self.model.raw("invite_url")
  }

  pub fn created(&self) -> TimeResult {
    self.model.time("created")
  }

  pub fn last_build(&self) -> TimeResult {
    self.model.time("last_build")
  }

  pub fn last_activity(&self) -> TimeResult {
    self.model.time("last_activity")
  }

  pub fn participants_count(&self) -> IntResult {
    self.model.integer("participants_count")
  }

  pub fn total_strings_count(&self) -> IntResult {
    self.model.integer("total_strings_count")
  }

  pub fn total_words_count(&self) -> IntResult {
    self.model.integer("total_words_count")
  }

  pub fn duplicate_strings_count(&self) -> IntResult {
    self.model.integer("duplicate_strings_count")
  }

  pub fn duplicate_words_count(&self) -> IntResult {
    self.model.integer("duplicate_words_count")
  }
}

impl Record for Project {
  const FIELDS: &'static [FieldDef] = &[
    raw_field("identifier"),
    raw_field("name"),
    raw_field("description"),
    raw_field("source_language"),
    raw_field("invite_url"),
    time_field("created"),
    time_field("last_build"),
    time_field("last_activity"),
    integer_field("participants_count"),
    integer_field("total_strings_count"),
    integer_field("total_words_count"),
    integer_field("duplicate_strings_count"),
    integer_field("duplicate_words_count"),
  ];

  fn model(&self) -> &Model {
    &self.model
  }
}

/// A file in the project tree
#[derive(Debug, Clone, PartialEq)]
pub struct File {
  model: Model,
  path: String,
}

impl File {
  pub fn new(data: RawMap, path: impl Into<String>) -> Self {
    Self {
      model: Model::new(data),
      path: path.into(),
    }
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn name(&self) -> StrResult<'_> {
    self.model.raw("name")
  }

  pub fn last_revision(&self) -> IntResult {
    self.model.integer("last_revision")
  }

  pub fn created(&self) -> TimeResult {
    self.model.time("created")
  }

  pub fn last_updated(&self) -> TimeResult {
    self.model.time("last_updated")
  }

  pub fn last_accessed(&self) -> TimeResult {
    self.model.time("last_accessed")
  }
}

impl Record for File {
  const FIELDS: &'static [FieldDef] = &[
    raw_field("name"),
    integer_field("last_revision"),
    time_field("created"),
    time_field("last_updated"),
    time_field("last_accessed"),
  ];

  fn model(&self) -> &Model {
    &self.model
  }
}

/// A directory in the project tree.
///
/// `files` holds every node beneath the directory at any depth, keyed by
/// full path, not only its direct children.
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
  model: Model,
  path: String,
  files: FileIndex,
}

impl Directory {
  pub fn new(data: RawMap, path: impl Into<String>, files: FileIndex) -> Self {
    Self {
      model: Model::new(data),
      path: path.into(),
      files,
    }
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn name(&self) -> StrResult<'_> {
    self.model.raw("name")
  }

  /// All descendants, flattened
  pub fn files(&self) -> &FileIndex {
    &self.files
  }

  /// Direct children only
  pub fn children(&self) -> impl Iterator<Item = &Arc<Node>> + '_ {
    self.files.iter().filter_map(move |(path, node)| {
      let (parent, _) = path.rsplit_once('/')?;
      (parent == self.path).then_some(node)
    })
  }
}

impl Record for Directory {
  const FIELDS: &'static [FieldDef] = &[raw_field("name")];

  fn model(&self) -> &Model {
    &self.model
  }
}

/// File or directory
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
  File(File),
  Directory(Directory),
}

impl Node {
  pub fn path(&self) -> &str {
    match self {
      Node::File(f) => f.path(),
      Node::Directory(d) => d.path(),
    }
  }

  pub fn name(&self) -> StrResult<'_> {
    match self {
      Node::File(f) => f.name(),
      Node::Directory(d) => d.name(),
    }
  }

  pub fn data(&self) -> &RawMap {
    match self {
      Node::File(f) => f.data(),
      Node::Directory(d) => d.data(),
    }
  }

  pub fn is_file(&self) -> bool {
    matches!(self, Node::File(_))
  }

  pub fn is_directory(&self) -> bool {
    matches!(self, Node::Directory(_))
  }

  pub fn as_file(&self) -> Option<&File> {
    match self {
      Node::File(f) => Some(f),
      Node::Directory(_) => None,
    }
  }

  pub fn as_directory(&self) -> Option<&Directory> {
    match self {
      Node::Directory(d) => Some(d),
      Node::File(_) => None,
    }
  }

  /// Short label for listings
  pub fn kind(&self) -> &'static str {
    match self {
      Node::File(_) => "file",
      Node::Directory(_) => "directory",
    }
  }
}
