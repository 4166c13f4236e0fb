//! File-backed tracing. The terminal belongs to the UI, so logs go to a daily
//! rolling file under the platform data directory.
//!
//! Filter priority: `REEL_LOG`, then `RUST_LOG`, then `--log-level`.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::constants::constants;

pub fn log_dir() -> Option<PathBuf> {
  ProjectDirs::from("", "", "reel").map(|dirs| dirs.data_local_dir().join("logs"))
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered lines are flushed.
pub fn init(default_level: &str) -> Result<Option<WorkerGuard>> {
  let Some(dir) = log_dir() else { return Ok(None) };
  std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;

  let appender = tracing_appender::rolling::daily(&dir, &constants().log_file_prefix);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);
  tracing_subscriber::registry()
    .with(build_filter(default_level))
    .with(layer)
    .try_init()
    .context("Failed to install tracing subscriber")?;

  Ok(Some(guard))
}

fn build_filter(default_level: &str) -> EnvFilter {
  for var in ["REEL_LOG", "RUST_LOG"] {
    if let Ok(directives) = std::env::var(var)
      && let Ok(filter) = EnvFilter::try_new(&directives)
    {
      return filter;
    }
  }
  EnvFilter::try_new(default_level).unwrap_or_else(|_| EnvFilter::new("info"))
}
