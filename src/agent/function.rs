//! Closure-backed agents and the agent builder.

use super::{Agent, AgentDescriptor, InputKey, LlmAgent, OutputKind};
use crate::error::{AgenticError, AgenticResult};
use crate::provider::ChatModel;
use crate::scope::{AgenticScope, Arguments, StateValue};
use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type AgentFn = Arc<dyn Fn(Arguments) -> BoxFuture<'static, Result<StateValue>> + Send + Sync>;

/// An agent whose work is an async closure over its resolved inputs.
#[derive(Clone)]
pub struct FnAgent {
	descriptor: AgentDescriptor,
	func: AgentFn,
}

impl fmt::Debug for FnAgent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FnAgent")
			.field("descriptor", &self.descriptor)
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl Agent for FnAgent {
	fn descriptor(&self) -> &AgentDescriptor {
		&self.descriptor
	}

	async fn execute(&self, arguments: &Arguments, _scope: &AgenticScope) -> Result<StateValue> {
		(self.func)(arguments.clone()).await
	}
}

/// Builder for [`FnAgent`] and [`LlmAgent`].
///
/// Replaces declarative agent interfaces: the name, ordered input keys and
/// output key are given explicitly and the callable is a plain value.
#[derive(Debug, Clone)]
pub struct AgentBuilder {
	name: String,
	description: String,
	inputs: Vec<InputKey>,
	output_name: Option<String>,
	system_message: Option<String>,
	user_message: Option<String>,
	output_kind: OutputKind,
}

impl AgentBuilder {
	/// Start building an agent with the given name.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: String::new(),
			inputs: Vec::new(),
			output_name: None,
			system_message: None,
			user_message: None,
			output_kind: OutputKind::Text,
		}
	}

	/// Description shown to planners.
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	/// Declare a required input key.
	pub fn input(mut self, key: impl Into<String>) -> Self {
		self.inputs.push(InputKey::required(key));
		self
	}

	/// Declare an input key with a default.
	pub fn input_with_default(mut self, key: impl Into<String>, default: impl Into<StateValue>) -> Self {
		self.inputs.push(InputKey::with_default(key, default));
		self
	}

	/// Scope key the result is written to.
	pub fn output_name(mut self, key: impl Into<String>) -> Self {
		self.output_name = Some(key.into());
		self
	}

	/// System prompt for model-backed agents.
	pub fn system_message(mut self, template: impl Into<String>) -> Self {
		self.system_message = Some(template.into());
		self
	}

	/// User prompt template for model-backed agents; `{{key}}` placeholders
	/// are filled from the resolved inputs.
	pub fn user_message(mut self, template: impl Into<String>) -> Self {
		self.user_message = Some(template.into());
		self
	}

	/// How a model reply is converted into a state value.
	pub fn output_kind(mut self, kind: OutputKind) -> Self {
		self.output_kind = kind;
		self
	}

	fn descriptor(&self) -> AgenticResult<AgentDescriptor> {
		if self.name.trim().is_empty() {
			return Err(AgenticError::invalid_configuration("agent name must not be empty"));
		}
		let output_key = self.output_name.clone().ok_or_else(|| {
			AgenticError::invalid_configuration(format!("agent {} has no output name", self.name))
		})?;
		Ok(AgentDescriptor {
			name: self.name.clone(),
			description: self.description.clone(),
			inputs: self.inputs.clone(),
			output_key,
		})
	}

	/// Build a closure-backed agent.
	pub fn build<F, Fut, V>(self, func: F) -> AgenticResult<FnAgent>
	where
		F: Fn(Arguments) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<V>> + Send + 'static,
		V: Into<StateValue>,
	{
		let descriptor = self.descriptor()?;
		let func: AgentFn = Arc::new(move |args: Arguments| {
			let fut = func(args);
			Box::pin(async move { fut.await.map(Into::into) }) as BoxFuture<'static, Result<StateValue>>
		});
		Ok(FnAgent { descriptor, func })
	}

	/// Build an agent backed by a chat model.
	pub fn build_llm(self, model: Arc<dyn ChatModel>) -> AgenticResult<LlmAgent> {
		let descriptor = self.descriptor()?;
		let user_message = self.user_message.ok_or_else(|| {
			AgenticError::invalid_configuration(format!(
				"agent {} has no user message template",
				descriptor.name
			))
		})?;
		Ok(LlmAgent::new(
			descriptor,
			model,
			self.system_message,
			user_message,
			self.output_kind,
		))
	}
}
