//! Environment variable loading and management.
//!
//! Only host-level settings are read here: where the configuration file
//! lives and an optional log level override.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the TOML configuration file.
pub const CONFIG_PATH_VAR: &str = "AOK_CONFIG";

/// Environment variable overriding `logging.log_level`.
pub const LOG_LEVEL_VAR: &str = "AOK_LOG_LEVEL";

/// Loads environment variables from .env file and system environment.
#[derive(Debug, Clone)]
pub struct EnvironmentLoader {
    env_file: Option<PathBuf>,
}

impl EnvironmentLoader {
    /// Initialize the environment loader.
    ///
    /// # Arguments
    /// * `env_file` - Path to .env file. Nothing is loaded when None.
    pub fn new(env_file: Option<&Path>) -> Self {
        // Only an explicit path is loaded, so tests never pick up a stray .env.
        if let Some(path) = env_file {
            if path.exists() {
                if let Err(e) = dotenv::from_path(path) {
                    tracing::warn!(target: "aok::config", "Failed to load .env file: {}", e);
                }
            }
        }

        Self {
            env_file: env_file.map(Path::to_path_buf),
        }
    }

    /// The .env file this loader was given, if any.
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    /// Configuration file path from `AOK_CONFIG`.
    pub fn config_path(&self) -> Option<PathBuf> {
        env::var(CONFIG_PATH_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Log level override from `AOK_LOG_LEVEL`, uppercased.
    pub fn log_level(&self) -> Option<String> {
        env::var(LOG_LEVEL_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().to_uppercase())
    }
}

impl Default for EnvironmentLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationLoader;
    use std::fs;
    use std::sync::Mutex;

    // Tests here mutate process-wide variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_log_level_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var(LOG_LEVEL_VAR);
        let env_loader = EnvironmentLoader::default();
        assert_eq!(env_loader.log_level(), None);

        env::set_var(LOG_LEVEL_VAR, "debug");
        assert_eq!(env_loader.log_level(), Some("DEBUG".to_string()));

        env::remove_var(LOG_LEVEL_VAR);
    }

    #[test]
    fn test_env_file_loading() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("aok.toml");
        fs::write(&config_path, "[workflow]\nmax_iterations = 7\n").unwrap();

        let env_path = dir.path().join(".env");
        fs::write(
            &env_path,
            format!("{}={}\n{}=warn\n", CONFIG_PATH_VAR, config_path.display(), LOG_LEVEL_VAR),
        )
        .unwrap();

        env::remove_var(CONFIG_PATH_VAR);
        env::remove_var(LOG_LEVEL_VAR);
        let env_loader = EnvironmentLoader::new(Some(&env_path));
        assert_eq!(env_loader.env_file(), Some(env_path.as_path()));
        assert_eq!(env_loader.config_path(), Some(config_path.clone()));

        let loader = ConfigurationLoader::from_env(&env_loader).unwrap();
        assert_eq!(loader.config.workflow.max_iterations, 7);
        assert_eq!(loader.config.logging.log_level, "WARN");

        env::remove_var(CONFIG_PATH_VAR);
        env::remove_var(LOG_LEVEL_VAR);
    }
}
