// ABOUTME: Configuration module for the reveal-deck application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::errors::{DeckError, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_TOOL: &str = "staticjinja";
pub const DEFAULT_SLIDES_DIR: &str = "slides";
pub const DEFAULT_SUBMODULE_DIR: &str = "reveal.js";
pub const DEFAULT_MANIFEST: &str = "package.json";

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    /// Project directory; also the root served over HTTP
    pub project_dir: PathBuf,
    /// Slide templates, relative to `project_dir`
    pub slides_dir: PathBuf,
    /// Presentation framework submodule, relative to `project_dir`
    pub submodule_dir: PathBuf,
    /// File probed inside the submodule to decide whether it is checked out
    pub manifest_file: String,
    /// Templating executable invoked with `build` / `watch`
    pub tool: String,
    pub host: String,
    pub port: u16,
    pub watch: bool,
    /// Treat a missing submodule as fatal instead of only reporting it
    pub strict_submodule: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            slides_dir: PathBuf::from(DEFAULT_SLIDES_DIR),
            submodule_dir: PathBuf::from(DEFAULT_SUBMODULE_DIR),
            manifest_file: DEFAULT_MANIFEST.to_string(),
            tool: DEFAULT_TOOL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            watch: false,
            strict_submodule: false,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the `PORT` and `HOST` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(None, None)
    }

    /// Load configuration from the environment, letting explicit values win.
    ///
    /// An override is applied before the matching variable is parsed, so a
    /// malformed `PORT` is ignored when a port is given on the command line.
    pub fn from_env_with(port: Option<u16>, host: Option<String>) -> Result<Self> {
        let env_port = match port {
            Some(_) => None,
            None => env::var("PORT").ok(),
        };
        let env_host = host.or_else(|| env::var("HOST").ok());

        let mut config = Self::from_vars(env_port, env_host)?;
        if let Some(port) = port {
            config.port = port;
        }
        Ok(config)
    }

    /// Build a configuration from raw port/host values, falling back to defaults
    pub fn from_vars(port: Option<String>, host: Option<String>) -> Result<Self> {
        let port = match port.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_port(raw)?,
            _ => DEFAULT_PORT,
        };
        let host = host
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        Ok(Self {
            port,
            host,
            ..Self::default()
        })
    }

    /// Absolute-or-relative path to the slides directory
    pub fn slides_path(&self) -> PathBuf {
        self.project_dir.join(&self.slides_dir)
    }

    /// Path to the submodule directory
    pub fn submodule_path(&self) -> PathBuf {
        self.project_dir.join(&self.submodule_dir)
    }

    /// Path to the manifest file used as the submodule existence probe
    pub fn manifest_path(&self) -> PathBuf {
        self.submodule_path().join(&self.manifest_file)
    }

    /// Display name of the submodule, e.g. `reveal.js`
    pub fn submodule_name(&self) -> String {
        self.submodule_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.submodule_dir.to_string_lossy().to_string())
    }

    /// `host:port` string handed to the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a port number, rejecting anything that is not a valid u16
pub fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse::<u16>()
        .map_err(|e| DeckError::ConfigError(format!("Invalid port {:?}: {}", raw, e)))
}
