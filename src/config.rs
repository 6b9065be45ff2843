use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.crowdin.com/api";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub crowdin: CrowdinConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrowdinConfig {
  /// Project identifier as shown in the project URL
  pub project: String,
  /// API root (defaults to the public Crowdin API)
  #[serde(default = "default_base_url")]
  pub base_url: String,
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./crowdin.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/crowdin/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    Self::load_optional(explicit_path)?.ok_or_else(|| {
      eyre!(
        "No configuration file found. Create one at ~/.config/crowdin/config.yaml \
         or pass --project"
      )
    })
  }

  /// Like [`load`](Self::load), but having no config file at all is `Ok(None)`.
  /// A file that exists but cannot be read or parsed is still an error.
  pub fn load_optional(explicit_path: Option<&Path>) -> Result<Option<Self>> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    path.map(|p| Self::load_from_path(&p)).transpose()
  }

  /// Load the config and apply a `--project` override.
  ///
  /// The override stands in for the file only when none is found.
  pub fn resolve(explicit_path: Option<&Path>, project: Option<String>) -> Result<Self> {
    Self::with_project_override(Self::load_optional(explicit_path)?, project)
  }

  fn with_project_override(config: Option<Self>, project: Option<String>) -> Result<Self> {
    match (config, project) {
      (Some(config), Some(project)) => Ok(Self {
        crowdin: CrowdinConfig {
          project,
          ..config.crowdin
        },
      }),
      (Some(config), None) => Ok(config),
      (None, Some(project)) => Ok(Self::for_project(&project)),
      (None, None) => Err(eyre!(
        "No configuration file found. Create one at ~/.config/crowdin/config.yaml \
         or pass --project"
      )),
    }
  }

  /// Configuration for a project given on the command line, without a file
  pub fn for_project(project: &str) -> Self {
    Self {
      crowdin: CrowdinConfig {
        project: project.to_string(),
        base_url: default_base_url(),
      },
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("crowdin.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("crowdin").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self> {
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Get the Crowdin project API key from environment variables.
  ///
  /// Checks CROWDIN_API_KEY first, then CROWDIN_PROJECT_KEY as fallback.
  pub fn get_api_key() -> Result<String> {
    std::env::var("CROWDIN_API_KEY")
      .or_else(|_| std::env::var("CROWDIN_PROJECT_KEY"))
      .map_err(|_| {
        eyre!("Crowdin API key not found. Set CROWDIN_API_KEY or CROWDIN_PROJECT_KEY environment variable.")
      })
  }
}
