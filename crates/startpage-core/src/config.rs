//! Start page configuration

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use startpage_navigation::DEFAULT_SEARCH_ENGINE;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Search engine URL template with a `{{{s}}}` placeholder
    pub search_engine: String,
    /// Extra bang providers merged over the built-in table
    pub bangs_path: Option<PathBuf>,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("startpage.db"),
            search_engine: DEFAULT_SEARCH_ENGINE.to_string(),
            bangs_path: None,
        }
    }

    pub fn data_dir() -> PathBuf {
        ProjectDirs::from("", "", "startpage")
            .map(|dirs| dirs.data_local_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".startpage"))
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))?;
        let config = serde_json::from_str(&json)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_data_dir() {
        let config = Config::new(PathBuf::from("/tmp/sp"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/sp/startpage.db"));
        assert_eq!(config.search_engine, DEFAULT_SEARCH_ENGINE);
        assert!(config.bangs_path.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "search_engine": "https://ddg.test/?q={{{s}}}" }"#).unwrap();
        assert_eq!(config.search_engine, "https://ddg.test/?q={{{s}}}");
        assert_eq!(config.database_path, Config::default().database_path);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/startpage.json").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
