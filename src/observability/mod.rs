//! Observability utilities for orchestration runs.
//!
//! This module provides a markdown run log. Structured diagnostics are
//! emitted separately through `tracing` under `aok::*` targets; installing a
//! subscriber is left to the application.
//!
//! # Example
//!
//! ```no_run
//! use aok::observability::Logger;
//! use std::collections::BTreeMap;
//!
//! // Create a logger
//! let logger = Logger::new(None, Some("DEBUG")).unwrap();
//!
//! // Log a run start
//! let config = BTreeMap::new();
//! logger.log_run_start("supervisor", Some("Write a story"), &config).unwrap();
//!
//! // Log completion
//! logger.log_completion("done", 2).unwrap();
//! ```

pub mod logger;

// Re-export main types for convenience
pub use logger::Logger;
