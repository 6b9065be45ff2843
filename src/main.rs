use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crowdin_api::config::Config;
use crowdin_api::crowdin::{CachedCrowdinClient, HttpProjectSource, Record};

#[derive(Parser, Debug)]
#[command(name = "crowdin")]
#[command(about = "Inspect a Crowdin project's details and file tree")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/crowdin/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Crowdin project identifier to use
  #[arg(short, long)]
  project: Option<String>,

  /// Write logs to this file instead of stderr
  #[arg(long)]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show decoded project details
  Project,
  /// List files and directories, optionally only those under a directory
  Files {
    /// Directory path such as /android/res
    path: Option<String>,
  },
  /// Print the raw project info JSON
  Info,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _log_guard = init_logging(args.log_file.as_deref())?;

  let config = Config::resolve(args.config.as_deref(), args.project)?;
  let client = CachedCrowdinClient::new(HttpProjectSource::new(&config)?);

  match args.command {
    Command::Project => {
      let project = client.project().await?;
      for (name, value) in project.fields()? {
        println!("{:<24} {}", name, value);
      }
      let files = client.files().await?;
      println!("{:<24} {}", "nodes", files.len());
    }
    Command::Files { path } => {
      let files = client.files().await?;
      let listing = match path.as_deref().map(|p| p.trim_end_matches('/')) {
        None | Some("") => &*files,
        Some(dir) => files
          .get(dir)
          .and_then(|node| node.as_directory())
          .map(|d| d.files())
          .ok_or_else(|| eyre!("No directory at {}", dir))?,
      };
      for (path, node) in listing {
        println!("{:<9} {}", node.kind(), path);
      }
    }
    Command::Info => {
      let info = client.project_info().await?;
      println!("{}", serde_json::to_string_pretty(&*info)?);
    }
  }

  Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

  let Some(path) = log_file else {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .init();
    return Ok(None);
  };

  let file_name = path
    .file_name()
    .ok_or_else(|| eyre!("Invalid log file path: {}", path.display()))?;
  let dir = path
    .parent()
    .filter(|p| !p.as_os_str().is_empty())
    .unwrap_or_else(|| Path::new("."));

  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(Some(guard))
}
