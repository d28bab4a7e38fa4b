use crate::error::CompilerError;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Print the offending source line and a caret under diagnostics.
    #[serde(default = "default_show_snippet")]
    pub show_snippet: bool,
}

fn default_log_level() -> String {
    env::var("SEN_LOG").unwrap_or_else(|_| String::from("warn"))
}

fn default_show_snippet() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_log_level(),
            show_snippet: default_show_snippet(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, CompilerError> {
        Self::load_from(&Self::get_config_path())
    }

    /// Reads the config at `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, CompilerError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| CompilerError::IO {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self) -> Result<(), CompilerError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CompilerError> {
        let io_error = |source| CompilerError::IO {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents).map_err(io_error)
    }

    pub fn get_config_path() -> PathBuf {
        if let Ok(custom) = env::var("SEN_CONFIG") {
            return PathBuf::from(custom);
        }

        let home = if cfg!(windows) {
            env::var("USERPROFILE")
        } else {
            env::var("HOME")
        };
        PathBuf::from(home.unwrap_or_else(|_| String::from(".")))
            .join(".sen")
            .join("config.json")
    }

    /// Log level from the config. Unknown names fall back to `warn`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("sen-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_from(&scratch_path("missing.json")).unwrap();
        assert!(config.show_snippet);
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("saved.json");
        let config = Config {
            log_level: "debug".to_string(),
            show_snippet: false,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.level_filter(), LevelFilter::Debug);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let path = scratch_path("partial.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "show_snippet": false }"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.show_snippet);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = scratch_path("broken.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CompilerError::Config(_))));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unknown_level_falls_back_to_warn() {
        let config = Config {
            log_level: "loud".to_string(),
            show_snippet: true,
        };
        assert_eq!(config.level_filter(), LevelFilter::Warn);
    }
}
