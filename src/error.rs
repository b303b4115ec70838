//! Error types for agent orchestration.

use crate::scope::ValueKind;
use thiserror::Error;

/// Result alias for orchestration operations.
pub type AgenticResult<T> = Result<T, AgenticError>;

/// Errors that can occur while running agents over a scope.
///
/// `BudgetExhausted` is deliberately absent: running out of invocations is a
/// terminal outcome reported through [`crate::SupervisorState`], not a failure.
///
/// # Example
///
/// ```
/// use aok::AgenticError;
///
/// let error = AgenticError::missing_input("editStory", "story");
/// assert!(error.to_string().contains("editStory"));
/// assert!(error.to_string().contains("story"));
/// ```
#[derive(Debug, Error)]
pub enum AgenticError {
	/// A declared input key has no value in scope and no default.
	#[error("missing input '{key}' for agent {agent}")]
	MissingInput {
		/// Agent whose input could not be resolved.
		agent: String,
		/// Scope key that had no value.
		key: String,
	},

	/// A stored value cannot satisfy the type a reader asked for.
	#[error("type mismatch for '{key}': expected {expected}, found {found}")]
	TypeMismatch {
		/// Scope key that was read.
		key: String,
		/// Kind the reader asked for.
		expected: ValueKind,
		/// Kind actually stored.
		found: ValueKind,
	},

	/// The agent's underlying callable failed.
	#[error("agent {agent} failed: {message}")]
	AgentExecution {
		/// Name of the failing agent.
		agent: String,
		/// Rendered failure chain.
		message: String,
	},

	/// The supervisor's planning step produced an action it cannot carry out.
	#[error("planning failure: {reason} (raw decision: {raw})")]
	PlanningFailure {
		/// Why the decision was rejected.
		reason: String,
		/// The offending decision, verbatim.
		raw: String,
	},

	/// Response selection found no record for the output key.
	#[error("no invocation produced '{key}'")]
	EmptyLedger {
		/// Output key that was selected on.
		key: String,
	},

	/// The requested agent is not registered.
	#[error("agent not found: {name}")]
	AgentNotFound {
		/// Name that was looked up.
		name: String,
	},

	/// An agent with the same name is already registered.
	#[error("agent already registered: {name}")]
	DuplicateAgent {
		/// Name of the duplicate agent.
		name: String,
	},

	/// A builder or configuration invariant was violated.
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),
}

impl AgenticError {
	/// Create a MissingInput error.
	pub fn missing_input(agent: impl Into<String>, key: impl Into<String>) -> Self {
		Self::MissingInput {
			agent: agent.into(),
			key: key.into(),
		}
	}

	/// Create a TypeMismatch error.
	pub fn type_mismatch(key: impl Into<String>, expected: ValueKind, found: ValueKind) -> Self {
		Self::TypeMismatch {
			key: key.into(),
			expected,
			found,
		}
	}

	/// Create an AgentExecution error from the callable's failure.
	pub fn agent_execution(agent: impl Into<String>, error: &anyhow::Error) -> Self {
		Self::AgentExecution {
			agent: agent.into(),
			message: format!("{:#}", error),
		}
	}

	/// Create a PlanningFailure error carrying the raw decision.
	pub fn planning_failure(reason: impl Into<String>, raw: impl Into<String>) -> Self {
		Self::PlanningFailure {
			reason: reason.into(),
			raw: raw.into(),
		}
	}

	/// Create an EmptyLedger error.
	pub fn empty_ledger(key: impl Into<String>) -> Self {
		Self::EmptyLedger { key: key.into() }
	}

	/// Create an AgentNotFound error.
	pub fn agent_not_found(name: impl Into<String>) -> Self {
		Self::AgentNotFound { name: name.into() }
	}

	/// Create a DuplicateAgent error.
	pub fn duplicate_agent(name: impl Into<String>) -> Self {
		Self::DuplicateAgent { name: name.into() }
	}

	/// Create an InvalidConfiguration error.
	pub fn invalid_configuration(message: impl Into<String>) -> Self {
		Self::InvalidConfiguration(message.into())
	}

	/// Whether this error came out of the planning step.
	pub fn is_planning_failure(&self) -> bool {
		matches!(self, Self::PlanningFailure { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_missing_input_error() {
		let error = AgenticError::missing_input("scoreStyle", "story");
		assert!(error.to_string().contains("scoreStyle"));
		assert!(error.to_string().contains("'story'"));
	}

	#[test]
	fn test_type_mismatch_error() {
		let error = AgenticError::type_mismatch("score", ValueKind::Number, ValueKind::Text);
		let message = error.to_string();
		assert!(message.contains("score"));
		assert!(message.contains("expected number"));
		assert!(message.contains("found text"));
	}

	#[test]
	fn test_agent_execution_keeps_context_chain() {
		let source = anyhow::anyhow!("connection reset").context("calling model");
		let error = AgenticError::agent_execution("generateStory", &source);
		let message = error.to_string();
		assert!(message.contains("generateStory"));
		assert!(message.contains("calling model"));
		assert!(message.contains("connection reset"));
	}

	#[test]
	fn test_planning_failure_carries_raw() {
		let error = AgenticError::planning_failure("unknown agent 'x'", "{\"agent\":\"x\"}");
		assert!(error.is_planning_failure());
		assert!(error.to_string().contains("{\"agent\":\"x\"}"));
	}

	#[test]
	fn test_empty_ledger_error() {
		let error = AgenticError::empty_ledger("story");
		assert!(error.to_string().contains("story"));
		assert!(!error.is_planning_failure());
	}

	#[test]
	fn test_error_is_send_sync() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<AgenticError>();
	}
}
