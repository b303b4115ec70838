//! Controller-side hook into the optional run log.
//!
//! Log write failures are reported through `tracing` and never abort a run.

use crate::scope::AgentInvocation;
use serde_json::Value;
use std::collections::BTreeMap;

#[cfg(feature = "observability")]
use crate::observability::Logger;
#[cfg(feature = "observability")]
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub(crate) struct Journal {
    #[cfg(feature = "observability")]
    logger: Option<Arc<Logger>>,
}

#[cfg(feature = "observability")]
fn report(result: anyhow::Result<()>) {
    if let Err(e) = result {
        tracing::warn!(target: "aok::observability", "Failed to write run log: {:#}", e);
    }
}

#[cfg(feature = "observability")]
impl Journal {
    pub(crate) fn new(logger: Option<Arc<Logger>>) -> Self {
        Self { logger }
    }

    pub(crate) fn run_start(&self, kind: &str, goal: Option<&str>, config: &BTreeMap<String, Value>) {
        if let Some(logger) = &self.logger {
            report(logger.log_run_start(kind, goal, config));
        }
    }

    pub(crate) fn invocation(&self, record: Option<&AgentInvocation>) {
        if let (Some(logger), Some(record)) = (&self.logger, record) {
            report(logger.log_invocation(record));
        }
    }

    pub(crate) fn loop_pass(&self, loop_name: &str, pass: u32, stop: bool) {
        if let Some(logger) = &self.logger {
            report(logger.log_loop_pass(loop_name, pass, stop));
        }
    }

    pub(crate) fn planning_decision(&self, step: u32, raw: &str, interpreted: &str) {
        if let Some(logger) = &self.logger {
            report(logger.log_planning_decision(step, raw, interpreted));
        }
    }

    pub(crate) fn error(&self, message: &str) {
        if let Some(logger) = &self.logger {
            report(logger.log_error(message, None));
        }
    }

    pub(crate) fn completion(&self, outcome: &str, invocations: usize) {
        if let Some(logger) = &self.logger {
            report(logger.log_completion(outcome, invocations));
        }
    }
}

#[cfg(not(feature = "observability"))]
impl Journal {
    pub(crate) fn run_start(&self, _kind: &str, _goal: Option<&str>, _config: &BTreeMap<String, Value>) {}

    pub(crate) fn invocation(&self, _record: Option<&AgentInvocation>) {}

    pub(crate) fn loop_pass(&self, _loop_name: &str, _pass: u32, _stop: bool) {}

    pub(crate) fn planning_decision(&self, _step: u32, _raw: &str, _interpreted: &str) {}

    pub(crate) fn error(&self, _message: &str) {}

    pub(crate) fn completion(&self, _outcome: &str, _invocations: usize) {}
}
