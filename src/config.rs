use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, UserDirs};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::planner::OutputSettings;

/// Environment variable that relocates the application home.
pub const HOME_ENV: &str = "WEDDING_PLANNER_HOME";

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".wedding-song-planner";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "wedding-songs.sqlite";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not determine home directory")]
    Directories,
}

/// Where everything the planner owns lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub home: PathBuf,
    pub config_file: PathBuf,
    pub db_file: PathBuf,
    pub log_dir: PathBuf,
}

impl Paths {
    /// An explicit override wins, then `WEDDING_PLANNER_HOME`, then
    /// `~/.wedding-song-planner`.
    pub fn resolve(home_override: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(home) = home_override {
            return Ok(Self::in_home(home.to_path_buf()));
        }
        if let Some(home) = std::env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            return Ok(Self::in_home(PathBuf::from(home)));
        }
        let base = BaseDirs::new().ok_or(ConfigError::Directories)?;
        Ok(Self::in_home(base.home_dir().join(DATA_DIR_NAME)))
    }

    pub fn in_home(home: PathBuf) -> Self {
        Self {
            config_file: home.join(CONFIG_FILE_NAME),
            db_file: home.join(DB_FILE_NAME),
            log_dir: home.join(LOG_DIR_NAME),
            home,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    /// Ask before finalizing an incomplete selection.
    pub confirm_incomplete: bool,
    pub share_url: String,
    pub export_dir: Option<PathBuf>,
    /// Command used to preview audio; the system opener is used when unset.
    pub audio_player: Option<String>,
    pub seed_catalog: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            confirm_incomplete: true,
            share_url: "https://wa.me/".to_string(),
            export_dir: None,
            audio_player: None,
            seed_catalog: true,
        }
    }
}

impl AppConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Configured export directory, else Downloads, else the app home.
    pub fn export_dir(&self, paths: &Paths) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(|| UserDirs::new().and_then(|dirs| dirs.download_dir().map(Path::to_path_buf)))
            .unwrap_or_else(|| paths.home.clone())
    }

    pub fn output_settings(&self, paths: &Paths) -> OutputSettings {
        OutputSettings {
            export_dir: self.export_dir(paths),
            share_url: self.share_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct EnvVarGuard {
        key: &'static str,
        original: Option<std::ffi::OsString>,
    }

    impl EnvVarGuard {
        fn set(key: &'static str, value: &Path) -> Self {
            let original = std::env::var_os(key);
            std::env::set_var(key, value);
            EnvVarGuard { key, original }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match &self.original {
                Some(value) => std::env::set_var(self.key, value),
                None => std::env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn missing_file_means_defaults() {
        let tmp = tempdir().unwrap();
        let config = AppConfig::load(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.confirm_incomplete);
        assert_eq!(config.share_url, "https://wa.me/");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "confirm_incomplete = false\nexport_dir = \"/srv/exports\"\naudio_player = \"mpv\"\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert!(!config.confirm_incomplete);
        assert_eq!(config.audio_player.as_deref(), Some("mpv"));
        assert_eq!(config.log_level, "info");
        assert!(config.seed_catalog);

        let paths = Paths::in_home(tmp.path().to_path_buf());
        let settings = config.output_settings(&paths);
        assert_eq!(settings.export_dir, PathBuf::from("/srv/exports"));
        assert_eq!(settings.share_url, "https://wa.me/");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "confirm_incomplete = \"maybe\"").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }

    #[test]
    fn explicit_home_lays_out_every_file() {
        let tmp = tempdir().unwrap();
        let paths = Paths::resolve(Some(tmp.path())).unwrap();

        assert_eq!(paths.home, tmp.path());
        assert_eq!(paths.config_file, tmp.path().join("config.toml"));
        assert_eq!(paths.db_file, tmp.path().join("wedding-songs.sqlite"));
        assert_eq!(paths.log_dir, tmp.path().join("logs"));
    }

    #[test]
    fn environment_relocates_home() {
        let tmp = tempdir().unwrap();
        let _env = EnvVarGuard::set(HOME_ENV, tmp.path());

        let paths = Paths::resolve(None).unwrap();

        assert_eq!(paths.home, tmp.path());
    }
}
