//! TOML configuration parsing and management.

use crate::response::ResponseStrategy;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "observability")]
use crate::observability::Logger;

use super::environment::EnvironmentLoader;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// `[workflow]` section
    #[serde(default)]
    pub workflow: WorkflowConfig,
    /// `[supervisor]` section
    #[serde(default)]
    pub supervisor: SupervisorConfig,
    /// `[logging]` section
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Loop controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Maximum number of full passes per loop run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_max_iterations() -> u32 {
    crate::workflow::DEFAULT_MAX_ITERATIONS
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

/// Supervisor controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Maximum number of agent invocations per run
    #[serde(default = "default_max_agents_invocations")]
    pub max_agents_invocations: u32,
    /// Response strategy name: "last" or "first"
    #[serde(default = "default_response_strategy")]
    pub response_strategy: String,
    /// Fixed planning instruction; bypasses dynamic planning when set
    pub planning_instruction: Option<String>,
    /// Scope key holding the supervisor's answer
    pub output_name: Option<String>,
}

fn default_max_agents_invocations() -> u32 {
    crate::supervisor::DEFAULT_MAX_AGENTS_INVOCATIONS
}

fn default_response_strategy() -> String {
    "last".to_string()
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            max_agents_invocations: default_max_agents_invocations(),
            response_strategy: default_response_strategy(),
            planning_instruction: None,
            output_name: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Run log path; a timestamped temp file when absent
    pub log_file: Option<String>,
    /// Run log level (INFO, DEBUG, ...)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Configuration {
    /// Check the invariants builders rely on.
    pub fn validate(&self) -> Result<()> {
        if self.workflow.max_iterations == 0 {
            bail!("workflow.max_iterations must be greater than 0");
        }
        if self.supervisor.max_agents_invocations == 0 {
            bail!("supervisor.max_agents_invocations must be greater than 0");
        }
        self.response_strategy()?;
        Ok(())
    }

    /// Parsed `supervisor.response_strategy`.
    pub fn response_strategy(&self) -> Result<ResponseStrategy> {
        self.supervisor
            .response_strategy
            .parse()
            .context("Invalid supervisor.response_strategy")
    }
}

/// Loads and manages TOML configuration.
#[derive(Debug)]
pub struct ConfigurationLoader {
    /// Path the configuration was read from
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: Configuration,
}

impl ConfigurationLoader {
    /// Initialize configuration loader.
    ///
    /// # Arguments
    /// * `config_path` - Path to TOML config file. If None, uses `config/aok.toml`;
    ///   a missing file yields the default configuration.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config_path = config_path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("config/aok.toml"));

        let config = if config_path.exists() {
            Self::load_config(&config_path)?
        } else {
            Configuration::default()
        };
        config
            .validate()
            .with_context(|| format!("Invalid configuration: {}", config_path.display()))?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Create a configuration loader from a pre-built Configuration.
    ///
    /// No file is read; the path is informational only.
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config_path: PathBuf::from("config/aok.toml"),
            config,
        }
    }

    /// Load using the config path and log level from the environment.
    pub fn from_env(env: &EnvironmentLoader) -> Result<Self> {
        let path = env.config_path();
        let mut loader = Self::new(path.as_deref())?;
        if let Some(level) = env.log_level() {
            loader.config.logging.log_level = level;
        }
        Ok(loader)
    }

    /// Load configuration from TOML file.
    fn load_config(path: &Path) -> Result<Configuration> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    /// Get configuration value by dot-notation key.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match key {
            "supervisor.response_strategy" => Some(self.config.supervisor.response_strategy.clone()),
            "supervisor.planning_instruction" => self.config.supervisor.planning_instruction.clone(),
            "supervisor.output_name" => self.config.supervisor.output_name.clone(),
            "logging.log_file" => self.config.logging.log_file.clone(),
            "logging.log_level" => Some(self.config.logging.log_level.clone()),
            _ => None,
        }
    }

    /// Get numeric configuration value.
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match key {
            "workflow.max_iterations" => Some(self.config.workflow.max_iterations as u64),
            "supervisor.max_agents_invocations" => {
                Some(self.config.supervisor.max_agents_invocations as u64)
            }
            _ => None,
        }
    }

    /// Create the run logger described by the `[logging]` section.
    #[cfg(feature = "observability")]
    pub fn create_logger(&self) -> Result<Logger> {
        let path = self.config.logging.log_file.as_ref().map(PathBuf::from);
        Logger::new(path.as_deref(), Some(&self.config.logging.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Configuration::default();
        assert_eq!(config.workflow.max_iterations, 5);
        assert_eq!(config.supervisor.max_agents_invocations, 10);
        assert_eq!(config.supervisor.response_strategy, "last");
        assert!(config.supervisor.planning_instruction.is_none());
        assert_eq!(config.logging.log_level, "INFO");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let loader = ConfigurationLoader::new(Some(Path::new("/nonexistent/aok.toml"))).unwrap();
        assert_eq!(loader.config, Configuration::default());
    }

    #[test]
    fn test_get_methods() {
        let loader = ConfigurationLoader::from_config(Configuration::default());
        assert_eq!(loader.get_u64("workflow.max_iterations"), Some(5));
        assert_eq!(loader.get_u64("supervisor.max_agents_invocations"), Some(10));
        assert_eq!(
            loader.get_string("supervisor.response_strategy"),
            Some("last".to_string())
        );
        assert_eq!(loader.get_string("logging.log_level"), Some("INFO".to_string()));
        assert_eq!(loader.get_string("supervisor.output_name"), None);
        assert_eq!(loader.get_string("unknown.key"), None);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_content = r#"
[workflow]
max_iterations = 3

[supervisor]
max_agents_invocations = 2
response_strategy = "first"
planning_instruction = "invoke A then invoke B, no looping"
output_name = "story"

[logging]
log_file = "/tmp/aok-test.md"
log_level = "DEBUG"
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), toml_content).unwrap();

        let loader = ConfigurationLoader::new(Some(temp_file.path())).unwrap();
        assert_eq!(loader.config.workflow.max_iterations, 3);
        assert_eq!(loader.config.supervisor.max_agents_invocations, 2);
        assert_eq!(loader.config.response_strategy().unwrap().name(), "first");
        assert_eq!(
            loader.get_string("supervisor.planning_instruction"),
            Some("invoke A then invoke B, no looping".to_string())
        );
        assert_eq!(loader.get_string("logging.log_file"), Some("/tmp/aok-test.md".to_string()));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "[supervisor]\noutput_name = \"answer\"\n").unwrap();

        let loader = ConfigurationLoader::new(Some(temp_file.path())).unwrap();
        assert_eq!(loader.config.workflow.max_iterations, 5);
        assert_eq!(loader.config.supervisor.max_agents_invocations, 10);
        assert_eq!(loader.config.supervisor.output_name.as_deref(), Some("answer"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "[workflow]\nmax_iterations = 0\n").unwrap();
        assert!(ConfigurationLoader::new(Some(temp_file.path())).is_err());

        let mut config = Configuration::default();
        config.supervisor.max_agents_invocations = 0;
        assert!(config.validate().is_err());

        let mut config = Configuration::default();
        config.supervisor.response_strategy = "best".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "[workflow\nmax_iterations = ").unwrap();
        let err = ConfigurationLoader::new(Some(temp_file.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse TOML config"));
    }

    #[cfg(feature = "observability")]
    #[test]
    fn test_create_logger() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Configuration::default();
        config.logging.log_file = Some(dir.path().join("run.md").to_string_lossy().to_string());
        config.logging.log_level = "debug".to_string();

        let logger = ConfigurationLoader::from_config(config).create_logger().unwrap();
        assert_eq!(logger.log_level(), "DEBUG");
        assert!(logger.log_file().exists());
    }
}
