//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SCORER_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::constants::{DEFAULT_DATASET_DIR, DEFAULT_PORT, MODEL_FILENAME, VECTORIZER_FILENAME};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SCORER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `5000`.
    pub port: u16,

    /// IP address to bind to. Default: `0.0.0.0`.
    pub bind_addr: IpAddr,

    /// Directory holding the serialized artifacts. Default: `./dataset`.
    pub dataset_dir: PathBuf,

    /// Explicit vectorizer artifact path (otherwise derived from `dataset_dir`).
    pub vectorizer_path: Option<PathBuf>,

    /// Explicit classifier artifact path (otherwise derived from `dataset_dir`).
    pub model_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
            dataset_dir: PathBuf::from(DEFAULT_DATASET_DIR),
            vectorizer_path: None,
            model_path: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SCORER_PORT";
    const ENV_BIND_ADDR: &'static str = "SCORER_BIND_ADDR";
    const ENV_DATASET_DIR: &'static str = "SCORER_DATASET_DIR";
    const ENV_VECTORIZER_PATH: &'static str = "SCORER_VECTORIZER_PATH";
    const ENV_MODEL_PATH: &'static str = "SCORER_MODEL_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let dataset_dir = Self::parse_path_from_env(Self::ENV_DATASET_DIR, defaults.dataset_dir);
        let vectorizer_path = Self::parse_optional_path_from_env(Self::ENV_VECTORIZER_PATH);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);

        Ok(Self {
            port,
            bind_addr,
            dataset_dir,
            vectorizer_path,
            model_path,
        })
    }

    /// Validates path kinds. Missing artifact files are not an error: the server
    /// starts without them and reports the model as unloaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset_dir.exists() && !self.dataset_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.dataset_dir.clone(),
            });
        }

        for path in [&self.vectorizer_path, &self.model_path].into_iter().flatten() {
            if path.exists() && !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Vectorizer artifact location after applying the override.
    pub fn vectorizer_path(&self) -> PathBuf {
        self.vectorizer_path
            .clone()
            .unwrap_or_else(|| self.dataset_dir.join(VECTORIZER_FILENAME))
    }

    /// Classifier artifact location after applying the override.
    pub fn model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| self.dataset_dir.join(MODEL_FILENAME))
    }

    /// Port used by `--health-check`; never fails, falls back to the default.
    pub fn health_check_port() -> u16 {
        env::var(Self::ENV_PORT)
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        Self::parse_optional_path_from_env(var_name).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}
