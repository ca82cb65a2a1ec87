use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::arch::Architecture;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV: &str = "SYMVIEW_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Table colours the log pane picks up on a style refresh.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub table_text_color: String,
    pub table_background_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            table_text_color: "#000000".to_string(),
            table_background_color: "#FFF8F0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port the view server listens on (127.0.0.1 only).
    pub listen_port: u16,
    /// Base URL of the debugger engine's HTTP endpoint.
    pub engine_url: String,
    /// Debuggee architecture; the host's when absent.
    pub architecture: Option<Architecture>,
    pub theme: Theme,
    /// Fill a missing undecorated name by demangling the decorated one.
    pub demangle_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: 8081,
            engine_url: "http://127.0.0.1:8080".to_string(),
            architecture: None,
            theme: Theme::default(),
            demangle_missing: false,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reads the file named by `SYMVIEW_CONFIG`, or falls back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = Path::new(&path);
                info!(path = %path.display(), "Loading configuration");
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture.unwrap_or_else(Architecture::current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::from_json(r#"{"listen_port": 9000, "architecture": "X86"}"#).unwrap();
        assert_eq!(config.listen_port, 9000);
        assert_eq!(config.architecture(), Architecture::X86);
        assert_eq!(config.engine_url, "http://127.0.0.1:8080");
        assert!(!config.demangle_missing);
        assert_eq!(config.theme, Theme::default());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::from_file(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
