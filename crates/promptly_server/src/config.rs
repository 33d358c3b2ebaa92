//! Command-line and environment configuration.
//!
//! Every flag falls back to an environment variable, then to a built-in
//! default, so the binary runs with no arguments against a local Ollama.

use clap::Parser;
use promptly_core::{default_log_level, DEFAULT_MODEL, DEFAULT_OLLAMA_URL};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Runtime configuration for the `promptly` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "promptly", version, about = "Promptly project and task tracker")]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, env = "PROMPTLY_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind.
    #[arg(long, env = "PROMPTLY_PORT", default_value_t = 8000)]
    pub port: u16,

    /// SQLite database file, created on first start.
    #[arg(long, env = "PROMPTLY_DB", default_value = "promptly.sqlite3")]
    pub db: PathBuf,

    /// Log directory [default: <cwd>/logs]
    #[arg(long, env = "PROMPTLY_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error [default: debug in debug builds, info otherwise]
    #[arg(long, env = "PROMPTLY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Ollama base URL.
    #[arg(long, env = "OLLAMA_HOST", default_value = DEFAULT_OLLAMA_URL)]
    pub ollama_host: String,

    /// Ollama model tag used for suggestions.
    #[arg(long, env = "PROMPTLY_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}

/// Configuration values that parse but cannot be used.
#[derive(Debug)]
pub enum ConfigError {
    InvalidHost(String),
    CurrentDir(std::io::Error),
    NonUtf8LogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHost(host) => write!(f, "invalid host address `{host}`"),
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
            Self::NonUtf8LogDir(path) => {
                write!(f, "log directory is not valid UTF-8: {}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            _ => None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::from((host, self.port)))
    }

    pub fn effective_log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(default_log_level())
    }

    /// Absolute log directory; relative values resolve against the cwd.
    pub fn effective_log_dir(&self) -> Result<String, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        let dir = match &self.log_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd.join("logs"),
        };
        dir.to_str()
            .map(str::to_string)
            .ok_or(ConfigError::NonUtf8LogDir(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig};
    use clap::Parser;

    #[test]
    fn explicit_flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "promptly",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--db",
            "/tmp/p.sqlite3",
            "--model",
            "mistral",
            "--ollama-host",
            "http://gpu-box:11434",
            "--log-level",
            "warn",
        ])
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:9000");
        assert_eq!(config.db.to_str(), Some("/tmp/p.sqlite3"));
        assert_eq!(config.model, "mistral");
        assert_eq!(config.ollama_host, "http://gpu-box:11434");
        assert_eq!(config.effective_log_level(), "warn");
    }

    #[test]
    fn relative_log_dir_resolves_against_cwd() {
        let config =
            ServerConfig::try_parse_from(["promptly", "--log-dir", "var/log"]).unwrap();
        let resolved = config.effective_log_dir().unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolved, cwd.join("var/log").to_str().unwrap());
    }

    #[test]
    fn unparsable_host_is_rejected() {
        let config = ServerConfig::try_parse_from(["promptly", "--host", "not an ip"]).unwrap();
        assert!(matches!(
            config.socket_addr(),
            Err(ConfigError::InvalidHost(host)) if host == "not an ip"
        ));
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(ServerConfig::try_parse_from(["promptly", "--port", "http"]).is_err());
    }
}
