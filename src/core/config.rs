//! Hive file location resolution.
//!
//! The hive lives at `$HOME/.hivereg/hive.db` unless `HIVEREG_PATH` points
//! somewhere else. The parent directory is created on demand.

use crate::core::error::RegError;
use crate::core::hive::Hive;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment override for the hive file path.
pub const HIVE_ENV: &str = "HIVEREG_PATH";

const DEFAULT_DIR: &str = ".hivereg";
const HIVE_FILE: &str = "hive.db";

/// Resolve the hive file path from the environment.
pub fn hive_path() -> Result<PathBuf, RegError> {
    if let Ok(path) = env::var(HIVE_ENV) {
        return Ok(PathBuf::from(path));
    }
    let home = env::var("HOME")?;
    Ok(Path::new(&home).join(DEFAULT_DIR).join(HIVE_FILE))
}

/// Open the default hive, creating its directory and file as needed.
pub fn open_default() -> Result<Hive, RegError> {
    open_at(&hive_path()?)
}

/// Open a hive at an explicit location, creating its directory as needed.
pub fn open_at(path: &Path) -> Result<Hive, RegError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Hive::open(path)
}
