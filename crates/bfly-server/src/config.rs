use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Environment variable overriding the listening port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding the store file path.
pub const ENV_DB_PATH: &str = "BFLY_DB_PATH";

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DB_PATH: &str = "db.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// JSON document holding all records.
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

impl ServerConfig {
    /// Defaults, then the TOML file at `path` if given, then the process
    /// environment.
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> ServerResult<Self> {
        toml::from_str(raw).map_err(|e| ServerError::Config(format!("invalid config: {e}")))
    }

    /// Apply `PORT` and `BFLY_DB_PATH` overrides looked up through `var`.
    ///
    /// `PORT` replaces only the port; the bind IP is kept.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> ServerResult<()> {
        if let Some(port) = var(ENV_PORT) {
            let port: u16 = port
                .trim()
                .parse()
                .map_err(|_| ServerError::Config(format!("invalid {ENV_PORT}: {port:?}")))?;
            self.bind_addr.set_port(port);
        }
        if let Some(path) = var(ENV_DB_PATH) {
            self.db_path = PathBuf::from(path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.db_path, PathBuf::from("db.json"));
    }

    #[test]
    fn port_override_keeps_ip() {
        let mut c = ServerConfig::from_toml(r#"bind_addr = "127.0.0.1:9000""#).unwrap();
        c.apply_env(env(&[("PORT", "3000")])).unwrap();
        assert_eq!(c.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn db_path_override() {
        let mut c = ServerConfig::default();
        c.apply_env(env(&[("BFLY_DB_PATH", "/tmp/other.json")])).unwrap();
        assert_eq!(c.db_path, PathBuf::from("/tmp/other.json"));
    }

    #[test]
    fn bad_port_is_config_error() {
        let mut c = ServerConfig::default();
        let err = c.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml(r#"db_path = "data/store.json""#).unwrap();
        assert_eq!(c.db_path, PathBuf::from("data/store.json"));
        assert_eq!(c.bind_addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bfly.toml");
        std::fs::write(&path, "bind_addr = \"127.0.0.1:8080\"\n").unwrap();
        let c = ServerConfig::from_file(&path).unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert!(ServerConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
