use crate::BackendKind;
use camino::{Utf8Path, Utf8PathBuf};
use drover_lsf::LsfConfig;
use drover_slurm::SlurmConfig;
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Default settings file name, looked up in the current directory.
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings in {path}: {source}")]
    Json {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid settings in {path}: {message}")]
    Invalid { path: Utf8PathBuf, message: String },
}

/// Values read from a JSON settings file. Command line flags win over these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: Option<BackendKind>,
    pub queue: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub lsf: LsfConfig,
    pub slurm: SlurmConfig,
}

impl Settings {
    /// Settings file location for a directory.
    pub fn default_path(dir: &Utf8Path) -> Utf8PathBuf {
        dir.join(SETTINGS_FILE)
    }

    /// Load settings from disk.
    ///
    /// Returns defaults if the file doesn't exist.
    pub fn load(path: &Utf8Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&content).map_err(|source| SettingsError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        if settings.poll_interval_secs == Some(0) {
            return Err(SettingsError::Invalid {
                path: path.to_path_buf(),
                message: "poll_interval_secs must be at least 1".to_string(),
            });
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(temp.path()).unwrap();
        let settings = Settings::load(&Settings::default_path(dir)).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.lsf.bsub, "bsub");
    }

    #[test]
    fn test_load_file() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(temp.path()).unwrap();
        let path = Settings::default_path(dir);
        fs::write(
            &path,
            r#"{
                "backend": "slurm",
                "queue": "short",
                "poll_interval_secs": 30,
                "slurm": {"sbatch": "/opt/slurm/bin/sbatch"}
            }"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.backend, Some(BackendKind::Slurm));
        assert_eq!(settings.queue.as_deref(), Some("short"));
        assert_eq!(settings.poll_interval_secs, Some(30));
        assert_eq!(settings.timeout_secs, None);
        assert_eq!(settings.slurm.sbatch, "/opt/slurm/bin/sbatch");
        assert_eq!(settings.slurm.scancel, "scancel");
    }

    #[test]
    fn test_load_invalid() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(temp.path()).unwrap();
        let path = Settings::default_path(dir);
        fs::write(&path, r#"{"backend": "pbs"}"#).unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Json { .. }));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(temp.path()).unwrap();
        let path = Settings::default_path(dir);
        fs::write(&path, r#"{"poll_interval_secs": 0}"#).unwrap();

        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
        assert!(err.to_string().contains("poll_interval_secs"));
    }
}
