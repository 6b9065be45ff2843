//! Project info source and the uncached accessors built on it.

use color_eyre::{eyre::eyre, Result as EyreResult};
use serde_json::Value;
use std::future::Future;
use tracing::debug;
use url::Url;

use crate::config::Config;

use super::error::{Error, Result};
use super::tree::parse_project_files;
use super::types::{FileIndex, Project};

/// Anything that can produce the raw project info payload.
///
/// The payload is the decoded JSON of Crowdin's project info call, with at
/// least `details` and `files`.
pub trait ProjectSource: Send + Sync {
  fn fetch_project_info(&self) -> impl Future<Output = EyreResult<Value>> + Send;
}

/// Project info over the Crowdin HTTP API
#[derive(Clone)]
pub struct HttpProjectSource {
  client: reqwest::Client,
  endpoint: Url,
  project: String,
}

impl HttpProjectSource {
  pub fn new(config: &Config) -> EyreResult<Self> {
    let key = Config::get_api_key()?;
    let endpoint = info_url(&config.crowdin.base_url, &config.crowdin.project, &key)?;

    let client = reqwest::Client::builder()
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      client,
      endpoint,
      project: config.crowdin.project.clone(),
    })
  }
}

impl ProjectSource for HttpProjectSource {
  async fn fetch_project_info(&self) -> EyreResult<Value> {
    debug!(project = %self.project, "Fetching project info");

    let response = self
      .client
      .post(self.endpoint.clone())
      .send()
      .await
      .map_err(|e| eyre!("Failed to request project info for {}: {}", self.project, e))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(eyre!(
        "Project info for {} failed with HTTP {}: {}",
        self.project,
        status,
        body
      ));
    }

    response
      .json::<Value>()
      .await
      .map_err(|e| eyre!("Failed to parse project info for {}: {}", self.project, e))
  }
}

/// `{base_url}/project/{project}/info?key=...&json`
fn info_url(base_url: &str, project: &str, key: &str) -> EyreResult<Url> {
  let mut url =
    Url::parse(base_url).map_err(|e| eyre!("Invalid Crowdin base URL {}: {}", base_url, e))?;

  url
    .path_segments_mut()
    .map_err(|_| eyre!("Crowdin base URL cannot have a path: {}", base_url))?
    .pop_if_empty()
    .extend(["project", project, "info"]);
  url
    .query_pairs_mut()
    .append_pair("key", key)
    .append_key_only("json");

  Ok(url)
}

/// Uncached accessors: every call fetches project info again
pub struct CrowdinApi<S> {
  source: S,
}

impl<S: ProjectSource> CrowdinApi<S> {
  pub fn new(source: S) -> Self {
    Self { source }
  }

  pub fn source(&self) -> &S {
    &self.source
  }

  /// Raw project info
  pub async fn project_info(&self) -> Result<Value> {
    self
      .source
      .fetch_project_info()
      .await
      .map_err(Error::Fetch)
  }

  /// Flat index of every file and directory in the project
  pub async fn files(&self) -> Result<FileIndex> {
    let info = self.project_info().await?;
    Ok(parse_project_files(&info)?)
  }

  /// Project details
  pub async fn project(&self) -> Result<Project> {
    let info = self.project_info().await?;
    Ok(Project::from_info(&info)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::crowdin::error::ModelError;
  use serde_json::json;
  use std::sync::atomic::{AtomicUsize, Ordering};

  struct StaticSource {
    info: Value,
    calls: AtomicUsize,
  }

  impl ProjectSource for StaticSource {
    async fn fetch_project_info(&self) -> EyreResult<Value> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(self.info.clone())
    }
  }

  struct FailingSource;

  impl ProjectSource for FailingSource {
    async fn fetch_project_info(&self) -> EyreResult<Value> {
      Err(eyre!("connection refused"))
    }
  }

  fn api(info: Value) -> CrowdinApi<StaticSource> {
    CrowdinApi::new(StaticSource {
      info,
      calls: AtomicUsize::new(0),
    })
  }

  #[test]
  fn test_info_url() {
    let url = info_url("https://api.crowdin.com/api", "my-app", "s3cr3t").unwrap();
    assert_eq!(
      url.as_str(),
      "https://api.crowdin.com/api/project/my-app/info?key=s3cr3t&json"
    );

    let url = info_url("https://crowdin.example.com/api/", "my app", "k").unwrap();
    assert_eq!(
      url.as_str(),
      "https://crowdin.example.com/api/project/my%20app/info?key=k&json"
    );
  }

  #[test]
  fn test_info_url_rejects_bad_base() {
    assert!(info_url("not a url", "p", "k").is_err());
    assert!(info_url("mailto:someone@example.com", "p", "k").is_err());
  }

  #[tokio::test]
  async fn test_uncached_api_fetches_every_call() {
    let api = api(json!({
      "details": {"name": "My App"},
      "files": [{"name": "a", "node_type": "file"}]
    }));

    api.project_info().await.unwrap();
    let files = api.files().await.unwrap();
    let project = api.project().await.unwrap();

    assert!(files.contains_key("/a"));
    assert_eq!(project.name(), Ok(Some("My App")));
    assert_eq!(api.source().calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn test_fetch_error_is_passed_through() {
    let api = CrowdinApi::new(FailingSource);
    match api.files().await {
      Err(Error::Fetch(report)) => assert_eq!(report.to_string(), "connection refused"),
      other => panic!("expected fetch error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_missing_details() {
    let api = api(json!({"files": []}));
    assert!(matches!(
      api.project().await,
      Err(Error::Model(ModelError::MissingField { .. }))
    ));
  }
}
