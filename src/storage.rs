// File: ./src/storage.rs
// Filesystem locations and atomic writes
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides both the config and data directories (used by tests).
pub const DIR_OVERRIDE_ENV: &str = "MEALPREP_CONFIG_DIR";

pub struct LocalStorage;

impl LocalStorage {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "mealprep", "mealprep")
    }

    fn ensure(dir: PathBuf) -> Option<PathBuf> {
        if !dir.exists() {
            let _ = fs::create_dir_all(&dir);
        }
        Some(dir)
    }

    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(dir) = env::var(DIR_OVERRIDE_ENV)
            && !dir.is_empty()
        {
            return Self::ensure(PathBuf::from(dir));
        }
        Self::project_dirs().and_then(|proj| Self::ensure(proj.config_dir().to_path_buf()))
    }

    pub fn data_dir() -> Option<PathBuf> {
        if let Ok(dir) = env::var(DIR_OVERRIDE_ENV)
            && !dir.is_empty()
        {
            return Self::ensure(PathBuf::from(dir));
        }
        Self::project_dirs().and_then(|proj| Self::ensure(proj.data_dir().to_path_buf()))
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}
