use std::fs;
use std::path::{Path, PathBuf};

use camino::Utf8PathBuf;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::client::normalize_base_url;
use crate::error::BiomajError;

pub const CONFIG_FILE: &str = "biomaj.json";
pub const SERVER_ENV: &str = "BIOMAJ_SERVER";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub trusted_prefix: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub server: Option<String>,
    pub trusted_prefix: Option<Utf8PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl ResolvedConfig {
    pub fn server(&self) -> Result<&str, BiomajError> {
        self.server.as_deref().ok_or(BiomajError::MissingServer)
    }

    pub fn with_server(mut self, server: Option<&str>) -> Self {
        if let Some(server) = server.map(str::trim).filter(|server| !server.is_empty()) {
            self.server = Some(normalize_base_url(server));
        }
        self
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, BiomajError> {
        let config = match Self::locate(path) {
            Some(config_path) => Self::read(&config_path)?,
            None if path.is_some() => return Err(BiomajError::MissingConfig),
            None => Config::default(),
        };

        let env_server = std::env::var(SERVER_ENV).ok();
        Ok(Self::resolve_config(config).with_server(env_server.as_deref()))
    }

    pub fn resolve_config(config: Config) -> ResolvedConfig {
        let server = config
            .server
            .as_deref()
            .map(str::trim)
            .filter(|server| !server.is_empty())
            .map(normalize_base_url);
        let trusted_prefix = config
            .trusted_prefix
            .filter(|prefix| !prefix.is_empty())
            .map(Utf8PathBuf::from);

        ResolvedConfig {
            server,
            trusted_prefix,
            timeout_secs: config.timeout_secs,
        }
    }

    pub fn parse(content: &str) -> Result<Config, BiomajError> {
        serde_json::from_str(content).map_err(|err| BiomajError::ConfigParse(err.to_string()))
    }

    fn read(path: &Path) -> Result<Config, BiomajError> {
        let content =
            fs::read_to_string(path).map_err(|_| BiomajError::ConfigRead(path.to_path_buf()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Self::parse(&content)
    }

    fn locate(path: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = path {
            let path = PathBuf::from(path);
            return path.exists().then_some(path);
        }
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        ProjectDirs::from("org", "genouest", "biomaj-catalog")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .filter(|path| path.exists())
    }
}
