//! Cached Crowdin client that wraps CrowdinApi with memoized accessors.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::cache::CacheSlot;

use super::client::{CrowdinApi, ProjectSource};
use super::error::{Error, Result};
use super::tree::parse_project_files;
use super::types::{FileIndex, Project};

/// Crowdin client with per-session caching.
///
/// Project info, the file index and the project record are each computed on
/// first access and reused until [`clear_cache`](Self::clear_cache). The
/// file index and project are derived from the cached project info, so one
/// fetch serves all three.
///
/// Slots are always locked in the order project, files, info.
pub struct CachedCrowdinClient<S> {
  inner: CrowdinApi<S>,
  project_info: CacheSlot<Value>,
  files: CacheSlot<FileIndex>,
  project: CacheSlot<Project>,
}

impl<S: ProjectSource> CachedCrowdinClient<S> {
  pub fn new(source: S) -> Self {
    Self::from_api(CrowdinApi::new(source))
  }

  pub fn from_api(inner: CrowdinApi<S>) -> Self {
    Self {
      inner,
      project_info: CacheSlot::new("project_info"),
      files: CacheSlot::new("files"),
      project: CacheSlot::new("project"),
    }
  }

  pub fn source(&self) -> &S {
    self.inner.source()
  }

  /// Raw project info, fetched once per session.
  pub async fn project_info(&self) -> Result<Arc<Value>> {
    self
      .project_info
      .get_or_fetch(|| self.inner.project_info())
      .await
  }

  /// Flat index of every file and directory, parsed once per session.
  pub async fn files(&self) -> Result<Arc<FileIndex>> {
    self
      .files
      .get_or_fetch(|| async {
        let info = self.project_info().await?;
        let files = parse_project_files(&info)?;
        debug!(entries = files.len(), "Parsed project file tree");
        Ok::<_, Error>(files)
      })
      .await
  }

  /// Project details, decoded once per session.
  pub async fn project(&self) -> Result<Arc<Project>> {
    self
      .project
      .get_or_fetch(|| async {
        let info = self.project_info().await?;
        Ok::<_, Error>(Project::from_info(&info)?)
      })
      .await
  }

  /// Discard all cached values.
  ///
  /// Waits for in-flight fetches, then empties every slot while holding all
  /// three locks, so no caller sees some slots cleared and others not.
  pub async fn clear_cache(&self) {
    let mut project = self.project.lock().await;
    let mut files = self.files.lock().await;
    let mut project_info = self.project_info.lock().await;

    project.clear();
    files.clear();
    project_info.clear();
    debug!("Cleared Crowdin cache");
  }
}
