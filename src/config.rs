/// Service configuration
///
/// Loaded from a TOML file:
///
/// ```toml
/// history_limit = 100
/// log_level = "info"
/// log_file = "leakmon.log"
///
/// [[nodes]]
/// id = "pipe_1"
/// label = "Sensor #1"
/// ```
///
/// Every key is optional; missing keys take the built-in defaults. The file
/// location comes from `LEAKMON_CONFIG` (a `.env` file is honoured), falling
/// back to `./leakmon.toml`.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;

use crate::logging::{self, Component, LogLevel};
use crate::model::{ConfigError, HISTORY_LIMIT};
use crate::nodes::{Node, NodeRegistry};

pub const CONFIG_ENV_VAR: &str = "LEAKMON_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "./leakmon.toml";

#[derive(Debug, Deserialize)]
struct RawConfig {
    history_limit: Option<usize>,
    log_level: Option<String>,
    log_file: Option<String>,
    nodes: Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Readings retained per node; older entries in a snapshot are ignored.
    pub history_limit: usize,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
    pub registry: NodeRegistry,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            history_limit: HISTORY_LIMIT,
            log_level: LogLevel::Info,
            log_file: None,
            registry: NodeRegistry::default(),
        }
    }
}

impl MonitorConfig {
    /// Parses and validates config text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let defaults = MonitorConfig::default();

        let history_limit = raw.history_limit.unwrap_or(defaults.history_limit);
        if history_limit == 0 {
            return Err(ConfigError::Invalid("history_limit must be at least 1".to_string()));
        }

        let log_level = match raw.log_level {
            Some(name) => LogLevel::parse(&name)
                .ok_or_else(|| ConfigError::Invalid(format!("unknown log_level '{}'", name)))?,
            None => defaults.log_level,
        };

        let registry = match raw.nodes {
            Some(nodes) => {
                validate_nodes(&nodes)?;
                NodeRegistry::new(nodes)
            }
            None => defaults.registry,
        };

        Ok(MonitorConfig {
            history_limit,
            log_level,
            log_file: raw.log_file,
            registry,
        })
    }

    /// Installs the global logger with this config's level and file.
    pub fn init_logging(&self, console_timestamps: bool) {
        logging::init_logger(self.log_level, self.log_file.as_deref(), console_timestamps);
        logging::info(
            Component::System,
            None,
            &format!(
                "Logger initialized at {} for {} node(s), history limit {}",
                self.log_level,
                self.registry.nodes().len(),
                self.history_limit
            ),
        );
    }
}

fn validate_nodes(nodes: &[Node]) -> Result<(), ConfigError> {
    if nodes.is_empty() {
        return Err(ConfigError::Invalid("at least one node must be configured".to_string()));
    }
    let mut seen = HashSet::new();
    for node in nodes {
        if node.id.trim().is_empty() {
            return Err(ConfigError::Invalid("node id must not be empty".to_string()));
        }
        if !seen.insert(node.id.as_str()) {
            return Err(ConfigError::Invalid(format!("duplicate node id '{}'", node.id)));
        }
    }
    Ok(())
}

/// Loads the configuration file at `path`.
pub fn load_config(path: &str) -> Result<MonitorConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    MonitorConfig::from_toml_str(&text)
}

/// Resolves the config path from the environment and loads it.
///
/// A missing file at the default location is not an error: the built-in
/// defaults are used. A missing file named explicitly via `LEAKMON_CONFIG`
/// is reported.
pub fn load_config_from_env() -> Result<MonitorConfig, ConfigError> {
    dotenv::dotenv().ok();
    resolve_config(std::env::var(CONFIG_ENV_VAR).ok(), DEFAULT_CONFIG_PATH)
}

fn resolve_config(
    explicit_path: Option<String>,
    default_path: &str,
) -> Result<MonitorConfig, ConfigError> {
    match explicit_path {
        Some(path) => load_config(&path),
        None => match load_config(default_path) {
            Err(ConfigError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                logging::debug(
                    Component::System,
                    None,
                    &format!("No config at {}, using built-in defaults", default_path),
                );
                Ok(MonitorConfig::default())
            }
            other => other,
        },
    }
}
