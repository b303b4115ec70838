//! Configuration management for orchestration runs.
//!
//! This module provides configuration loading through TOML files and
//! environment variable management via `.env` files.
//!
//! # Example
//!
//! ```no_run
//! use aok::config::{ConfigurationLoader, EnvironmentLoader};
//! use std::path::Path;
//!
//! // Load environment variables
//! let env = EnvironmentLoader::new(Some(Path::new(".env")));
//!
//! // Load configuration from TOML (AOK_CONFIG, or config/aok.toml)
//! let config_loader = ConfigurationLoader::from_env(&env).unwrap();
//! let config = &config_loader.config;
//!
//! // Access configuration
//! println!("Max iterations: {}", config.workflow.max_iterations);
//! println!("Invocation budget: {}", config.supervisor.max_agents_invocations);
//! ```

pub mod config;
pub mod environment;

// Re-export main types for convenience
pub use self::config::{
    Configuration, ConfigurationLoader, LoggingConfig, SupervisorConfig, WorkflowConfig,
};
pub use self::environment::EnvironmentLoader;
