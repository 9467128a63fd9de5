//! Log setup.
//!
//! The terminal belongs to the game while it runs, so log records only go
//! to a file, and only when one is requested.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

/// Route `log` records to `path`. Level comes from `RUST_LOG`, default `info`.
pub fn init_file_logger(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Failed to install logger")?;

    log::info!("Logging to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_file_logger_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.log");

        init_file_logger(&path).unwrap();
        log::warn!("written to file");

        assert!(path.exists());
    }

    #[test]
    fn test_init_file_logger_bad_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("snake.log");

        assert!(init_file_logger(&path).is_err());
    }
}
