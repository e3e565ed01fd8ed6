//! The JSON config file shared by every command: where the database lives,
//! and who is currently logged in.

use {
    serde::{Deserialize, Serialize},
    std::path::{Path, PathBuf},
    thiserror::Error,
};

pub const CONFIG_FILE_NAME: &str = ".gleaner.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub db_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate a home directory")]
    NoHomeDir,
    #[error("reading config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("writing config file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Config {
    /// `~/.gleaner.json`. Login and register rewrite it in place.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = directories::BaseDirs::new().ok_or(ConfigError::NoHomeDir)?;
        Ok(dirs.home_dir().join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let data = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    pub fn store(&self, path: &Path) -> Result<(), ConfigError> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)
            .map_err(|source| ConfigError::Write { path: path.to_owned(), source })
    }

    pub fn set_user(&mut self, name: &str, path: &Path) -> Result<(), ConfigError> {
        self.current_user_name = Some(name.to_owned());
        self.store(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = Config {
            db_url: "gleaner.sqlite".to_string(),
            current_user_name: None,
        };
        config.store(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.db_url, "gleaner.sqlite");
        assert_eq!(loaded.current_user_name, None);
    }

    #[test]
    fn set_user_rewrites_the_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = Config {
            db_url: "gleaner.sqlite".to_string(),
            current_user_name: None,
        };
        config.store(&path).unwrap();
        config.set_user("ada", &path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.db_url, "gleaner.sqlite");
        assert_eq!(loaded.current_user_name.as_deref(), Some("ada"));
    }

    #[test]
    fn reads_a_config_without_a_current_user() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{"db_url": "somewhere.sqlite"}"#).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.db_url, "somewhere.sqlite");
        assert!(loaded.current_user_name.is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        assert!(matches!(Config::load(&path), Err(ConfigError::Read { .. })));
    }
}
