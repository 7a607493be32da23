//! Configuration file management for dayplan.
//!
//! Provides a TOML-based config file at `~/.config/dayplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use dayplan_core::{CommandGenerator, Generator, HttpGenerator, HttpGeneratorConfig, PlannerConfig};

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

/// Which generation adapter to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// HTTP text generation endpoint.
    #[default]
    Http,
    /// Local program reading the prompt on stdin.
    Command,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub planner: PlannerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    pub backend: Backend,
    /// Base URL for the HTTP backend.
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Program for the command backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Default for ServiceSection {
    fn default() -> Self {
        let http = HttpGeneratorConfig::default();
        Self {
            backend: Backend::default(),
            endpoint: http.endpoint,
            api_key: None,
            timeout_secs: http.timeout_secs,
            command: None,
            args: Vec::new(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the dayplan config directory.
///
/// Uses `$XDG_CONFIG_HOME/dayplan` or `~/.config/dayplan` on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("dayplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("dayplan")
}

/// Return the path to the dayplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load the config file, or `None` if it does not exist.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since it may hold an API key.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct DayplanConfig {
    pub service: ServiceSection,
    pub planner: PlannerConfig,
}

impl DayplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Backend: `cli_backend` > `DAYPLAN_BACKEND` env > `service.backend` > `http`
    /// - Endpoint: `cli_endpoint` > `DAYPLAN_ENDPOINT` env > `service.endpoint` > default
    /// - API key: `DAYPLAN_API_KEY` env > `service.api_key`
    pub fn resolve(cli_backend: Option<Backend>, cli_endpoint: Option<&str>) -> Result<Self> {
        let file_config = load_config()?.unwrap_or_default();
        let mut service = file_config.service;

        if let Some(backend) = cli_backend {
            service.backend = backend;
        } else if let Ok(raw) = std::env::var("DAYPLAN_BACKEND") {
            service.backend = <Backend as ValueEnum>::from_str(&raw, true)
                .map_err(|e| anyhow::anyhow!("invalid DAYPLAN_BACKEND {raw:?}: {e}"))?;
        }

        if let Some(url) = cli_endpoint {
            service.endpoint = url.to_string();
        } else if let Ok(url) = std::env::var("DAYPLAN_ENDPOINT") {
            service.endpoint = url;
        }

        if let Ok(key) = std::env::var("DAYPLAN_API_KEY") {
            service.api_key = Some(key);
        }

        Ok(Self {
            service,
            planner: file_config.planner,
        })
    }

    /// Construct the generation adapter selected by the resolved backend.
    pub fn build_generator(&self) -> Result<Arc<dyn Generator>> {
        match self.service.backend {
            Backend::Http => {
                let generator = HttpGenerator::new(HttpGeneratorConfig {
                    endpoint: self.service.endpoint.clone(),
                    api_key: self.service.api_key.clone(),
                    timeout_secs: self.service.timeout_secs,
                })
                .context("failed to build HTTP generator")?;
                Ok(Arc::new(generator))
            }
            Backend::Command => {
                let Some(program) = self.service.command.as_deref() else {
                    bail!(
                        "backend \"command\" requires service.command in {}",
                        config_path().display()
                    );
                };
                Ok(Arc::new(CommandGenerator::new(
                    program,
                    self.service.args.clone(),
                )))
            }
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
