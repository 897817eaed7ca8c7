//! Default data location

use std::path::{Path, PathBuf};

/// Resolves where the observation database lives.
#[derive(Debug, Clone)]
pub struct Paths {
    pub data_dir: PathBuf,
}

impl Paths {
    pub fn new() -> std::io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;
        Ok(Self {
            data_dir: home.join(".sentilog"),
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("sentiment.db")
    }
}

/// The database path: an explicit `--db` wins, otherwise the default
/// under the home directory.
pub fn resolve_db(db: Option<&Path>) -> anyhow::Result<PathBuf> {
    match db {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Paths::new()?.database_path()),
    }
}
