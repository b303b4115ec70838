//! Agent invoker - runs one agent against a scope.

use super::{Agent, AgentDescriptor};
use crate::error::{AgenticError, AgenticResult};
use crate::scope::{AgentInvocation, AgenticScope, Arguments, StateValue};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Wraps an agent with the read-call-write-record cycle.
///
/// Each [`invoke`](Self::invoke):
/// 1. resolves every declared input from scope (defaults apply when absent)
/// 2. calls the agent
/// 3. writes the result under the agent's output key
/// 4. appends an [`AgentInvocation`] to the ledger
///
/// A failing agent writes nothing and records nothing; the failure is
/// returned as [`AgenticError::AgentExecution`] without retrying.
#[derive(Clone)]
pub struct AgentInvoker {
	agent: Arc<dyn Agent>,
}

impl fmt::Debug for AgentInvoker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AgentInvoker")
			.field("agent", &self.agent.name())
			.finish()
	}
}

impl AgentInvoker {
	/// Wrap an agent.
	pub fn new(agent: Arc<dyn Agent>) -> Self {
		Self { agent }
	}

	/// The wrapped agent's name.
	pub fn name(&self) -> &str {
		self.agent.name()
	}

	/// The wrapped agent's descriptor.
	pub fn descriptor(&self) -> &AgentDescriptor {
		self.agent.descriptor()
	}

	/// The wrapped agent.
	pub fn agent(&self) -> &Arc<dyn Agent> {
		&self.agent
	}

	/// Resolve the declared inputs from scope.
	pub fn resolve_inputs(&self, scope: &AgenticScope) -> AgenticResult<Arguments> {
		let descriptor = self.agent.descriptor();
		let mut arguments = Arguments::new();
		for input in &descriptor.inputs {
			let value = match (scope.read_state_opt(&input.name), &input.default) {
				(Some(value), _) => value,
				(None, Some(default)) => default.clone(),
				(None, None) => {
					return Err(AgenticError::missing_input(&descriptor.name, &input.name));
				}
			};
			arguments.insert(input.name.clone(), value);
		}
		Ok(arguments)
	}

	/// Run the agent once and return its output.
	pub async fn invoke(&self, scope: &AgenticScope) -> AgenticResult<StateValue> {
		let descriptor = self.agent.descriptor();
		let arguments = self.resolve_inputs(scope)?;

		debug!(
			target: "aok::invoker",
			agent = %descriptor.name,
			inputs = ?arguments.keys().collect::<Vec<_>>(),
			"invoking agent"
		);

		let output = match self.agent.execute(&arguments, scope).await {
			Ok(output) => output,
			Err(error) => {
				warn!(target: "aok::invoker", agent = %descriptor.name, "agent failed: {:#}", error);
				// Failures from nested controllers keep their original classification.
				return Err(match error.downcast::<AgenticError>() {
					Ok(agentic) => agentic,
					Err(other) => AgenticError::agent_execution(&descriptor.name, &other),
				});
			}
		};

		scope.write_state(descriptor.output_key.clone(), output.clone());
		let sequence = scope.record_invocation(AgentInvocation::new(
			descriptor.name.clone(),
			arguments,
			descriptor.output_key.clone(),
			output.clone(),
		));

		debug!(
			target: "aok::invoker",
			agent = %descriptor.name,
			output_key = %descriptor.output_key,
			sequence,
			"agent completed"
		);
		Ok(output)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::agent::AgentBuilder;

	fn echo_agent() -> AgentInvoker {
		let agent = AgentBuilder::new("echo")
			.input("text")
			.input_with_default("suffix", "!")
			.output_name("echoed")
			.build(|args| async move {
				let text = args.get("text").map(|v| v.render()).unwrap_or_default();
				let suffix = args.get("suffix").map(|v| v.render()).unwrap_or_default();
				Ok(format!("{}{}", text, suffix))
			})
			.unwrap();
		AgentInvoker::new(Arc::new(agent))
	}

	#[tokio::test]
	async fn test_invoke_reads_writes_and_records() {
		let scope = AgenticScope::new();
		scope.write_state("text", "hi");

		let invoker = echo_agent();
		let output = invoker.invoke(&scope).await.unwrap();

		assert_eq!(output, StateValue::from("hi!"));
		assert_eq!(scope.read_state("echoed", "").unwrap(), "hi!");

		let calls = scope.invocations("echo");
		assert_eq!(calls.len(), 1);
		assert_eq!(calls[0].input.get("text"), Some(&StateValue::from("hi")));
		assert_eq!(calls[0].input.get("suffix"), Some(&StateValue::from("!")));
		assert_eq!(calls[0].output_key, "echoed");
	}

	#[tokio::test]
	async fn test_missing_input() {
		let scope = AgenticScope::new();
		let err = echo_agent().invoke(&scope).await.unwrap_err();

		match err {
			AgenticError::MissingInput { agent, key } => {
				assert_eq!(agent, "echo");
				assert_eq!(key, "text");
			}
			other => panic!("Expected MissingInput, got {:?}", other),
		}
		assert!(scope.ledger().is_empty());
	}

	#[tokio::test]
	async fn test_failure_writes_nothing() {
		let agent = AgentBuilder::new("broken")
			.output_name("result")
			.build(|_args| async { Err::<StateValue, _>(anyhow::anyhow!("model unavailable")) })
			.unwrap();
		let invoker = AgentInvoker::new(Arc::new(agent));

		let scope = AgenticScope::new();
		let err = invoker.invoke(&scope).await.unwrap_err();

		assert!(matches!(err, AgenticError::AgentExecution { ref agent, .. } if agent == "broken"));
		assert!(err.to_string().contains("model unavailable"));
		assert!(!scope.contains_key("result"));
		assert!(scope.invocations("broken").is_empty());
	}

	#[tokio::test]
	async fn test_nested_agentic_error_passes_through() {
		let agent = AgentBuilder::new("nested")
			.output_name("result")
			.build(|_args| async {
				Err::<StateValue, _>(anyhow::Error::new(AgenticError::missing_input("inner", "k")))
			})
			.unwrap();
		let invoker = AgentInvoker::new(Arc::new(agent));

		let err = invoker.invoke(&AgenticScope::new()).await.unwrap_err();
		assert!(matches!(err, AgenticError::MissingInput { ref agent, .. } if agent == "inner"));
	}

	#[tokio::test]
	async fn test_repeated_invocations_are_all_recorded() {
		let scope = AgenticScope::new();
		scope.write_state("text", "a");
		let invoker = echo_agent();

		invoker.invoke(&scope).await.unwrap();
		scope.write_state("text", "b");
		invoker.invoke(&scope).await.unwrap();

		let calls = scope.invocations("echo");
		assert_eq!(calls.len(), 2);
		assert_eq!(calls[1].output, StateValue::from("b!"));
		assert!(calls[0].sequence < calls[1].sequence);
	}
}
