//! Markdown run log for orchestration runs.

use crate::scope::AgentInvocation;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Logger for orchestration runs.
///
/// This logger creates markdown-formatted log files for tracking runs,
/// agent invocations, loop passes, planning decisions and outcomes.
/// At `DEBUG` level invocation entries include the full inputs as JSON.
#[derive(Debug)]
pub struct Logger {
    log_file: PathBuf,
    log_level: String,
}

impl Logger {
    /// Initialize logger.
    ///
    /// # Arguments
    /// * `log_file` - Path to log file. If None, creates a timestamped file in temp directory.
    /// * `log_level` - Logging level (defaults to "INFO").
    pub fn new(log_file: Option<&Path>, log_level: Option<&str>) -> Result<Self> {
        let log_file = match log_file {
            Some(p) => p.to_path_buf(),
            None => {
                let mut dir = std::env::temp_dir();
                dir.push("aok-logs");
                std::fs::create_dir_all(&dir).with_context(|| {
                    format!("Failed to create log directory: {}", dir.display())
                })?;
                let filename = format!(
                    "run_{}_{}.md",
                    Utc::now().timestamp_millis(),
                    std::process::id()
                );
                dir.join(filename)
            }
        };

        let log_level = log_level.unwrap_or("INFO").to_uppercase();

        // Ensure log directory exists
        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        let logger = Self {
            log_file,
            log_level,
        };

        if !logger.log_file.exists() {
            logger.initialize_log_file()?;
        }

        Ok(logger)
    }

    /// Initialize the log file with header.
    fn initialize_log_file(&self) -> Result<()> {
        let mut file = File::create(&self.log_file)
            .with_context(|| format!("Failed to create log file: {}", self.log_file.display()))?;

        let now: DateTime<Utc> = Utc::now();

        writeln!(file, "# Orchestration Run Log\n")?;
        writeln!(file, "Log started: {}\n", now.to_rfc3339())?;
        writeln!(file, "---\n")?;

        Ok(())
    }

    /// Append content to log file.
    fn append_to_log(&self, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .with_context(|| format!("Failed to open log file: {}", self.log_file.display()))?;

        write!(file, "{}", content).with_context(|| "Failed to write to log file")?;

        Ok(())
    }

    fn is_debug(&self) -> bool {
        self.log_level == "DEBUG"
    }

    /// Log run start.
    ///
    /// # Arguments
    /// * `kind` - Controller kind (loop, supervisor).
    /// * `goal` - Goal text, if the controller has one.
    /// * `config` - Effective configuration.
    pub fn log_run_start(
        &self,
        kind: &str,
        goal: Option<&str>,
        config: &BTreeMap<String, serde_json::Value>,
    ) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let mut content = format!("## Run Started - {}\n\n**Controller:** {}\n", now.to_rfc3339(), kind);
        if let Some(goal) = goal {
            content.push_str(&format!("**Goal:** {}\n", goal));
        }
        content.push_str(&format!(
            "**Config:** {}\n\n",
            serde_json::to_string_pretty(config).unwrap_or_default()
        ));

        self.append_to_log(&content)?;
        info!(target: "aok::observability", "Run started ({})", kind);
        Ok(())
    }

    /// Log one completed agent invocation.
    pub fn log_invocation(&self, record: &AgentInvocation) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let mut content = format!(
            "### Agent Invocation #{} - {}\n\n**Agent:** {}\n**Output key:** {}\n",
            record.sequence,
            now.to_rfc3339(),
            record.agent_name,
            record.output_key
        );

        if self.is_debug() {
            content.push_str(&format!(
                "**Inputs:**\n```json\n{}\n```\n",
                serde_json::to_string_pretty(&record.input).unwrap_or_default()
            ));
        } else {
            let keys: Vec<&str> = record.input.keys().map(|k| k.as_str()).collect();
            content.push_str(&format!("**Inputs:** {}\n", keys.join(", ")));
        }
        content.push_str(&format!("**Output:**\n```\n{}\n```\n\n", record.output.render()));

        self.append_to_log(&content)
    }

    /// Log the end of a loop pass.
    ///
    /// # Arguments
    /// * `loop_name` - Name of the loop agent.
    /// * `pass` - Pass number, starting at 1.
    /// * `stop` - Result of the exit condition.
    pub fn log_loop_pass(&self, loop_name: &str, pass: u32, stop: bool) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let content = format!(
            "### Loop Pass {} - {}\n\n**Loop:** {}\n**Exit condition:** {}\n\n",
            pass,
            now.to_rfc3339(),
            loop_name,
            stop
        );
        self.append_to_log(&content)
    }

    /// Log a planning decision.
    ///
    /// # Arguments
    /// * `step` - Planning step number, starting at 1.
    /// * `raw` - Decision as produced by the planner.
    /// * `interpreted` - How the supervisor read it.
    pub fn log_planning_decision(&self, step: u32, raw: &str, interpreted: &str) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let content = format!(
            "### Planning Step {} - {}\n\n**Decision:** {}\n**Raw:**\n```\n{}\n```\n\n",
            step,
            now.to_rfc3339(),
            interpreted,
            raw
        );
        self.append_to_log(&content)
    }

    /// Log error with context.
    ///
    /// # Arguments
    /// * `error` - Error message.
    /// * `context` - Additional context information.
    pub fn log_error(
        &self,
        error: &str,
        context: Option<&BTreeMap<String, serde_json::Value>>,
    ) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let mut content = format!(
            "### Error - {}\n\n**Error:** {}\n\n",
            now.to_rfc3339(),
            error
        );

        if let Some(ctx) = context {
            content.push_str(&format!(
                "**Context:** {}\n\n",
                serde_json::to_string_pretty(ctx).unwrap_or_default()
            ));
        }

        self.append_to_log(&content)?;
        error!(target: "aok::observability", "{}", error);
        Ok(())
    }

    /// Log run completion.
    ///
    /// # Arguments
    /// * `outcome` - Terminal state reached.
    /// * `invocations` - Number of invocations in the ledger.
    pub fn log_completion(&self, outcome: &str, invocations: usize) -> Result<()> {
        let now: DateTime<Utc> = Utc::now();
        let content = format!(
            "### Run Completed - {}\n\n**Outcome:** {}\n**Invocations:** {}\n\n---\n\n",
            now.to_rfc3339(),
            outcome,
            invocations
        );

        self.append_to_log(&content)?;
        info!(target: "aok::observability", "Run completed: {}", outcome);
        Ok(())
    }

    /// Get the log file path.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Get the log level.
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}
