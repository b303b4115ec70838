//! Model-backed agents.

use super::{Agent, AgentDescriptor};
use crate::provider::{ChatModel, ChatRequest};
use crate::scope::{AgenticScope, Arguments, StateValue};
use crate::template;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// How a model reply is turned into a state value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputKind {
	/// The trimmed reply text.
	#[default]
	Text,
	/// The first number found in the reply (e.g. a score).
	Number,
	/// `true`/`yes` or `false`/`no`, case-insensitive.
	Boolean,
	/// The first JSON object or array in the reply.
	Json,
}

impl OutputKind {
	/// Parse a model reply into a value of this kind.
	pub fn parse(&self, reply: &str) -> Result<StateValue> {
		let trimmed = reply.trim();
		match self {
			Self::Text => Ok(StateValue::Text(trimmed.to_string())),
			Self::Number => {
				let re = number_regex();
				let found = re
					.find(trimmed)
					.ok_or_else(|| anyhow!("no number in model reply: {}", trimmed))?;
				let number: f64 = found
					.as_str()
					.parse()
					.with_context(|| format!("invalid number '{}'", found.as_str()))?;
				Ok(StateValue::Number(number))
			}
			Self::Boolean => {
				let lowered = trimmed.to_lowercase();
				lowered
					.split(|c: char| !c.is_alphanumeric())
					.find_map(|word| match word {
						"true" | "yes" => Some(StateValue::Boolean(true)),
						"false" | "no" => Some(StateValue::Boolean(false)),
						_ => None,
					})
					.ok_or_else(|| anyhow!("no boolean in model reply: {}", trimmed))
			}
			Self::Json => {
				let json = extract_json(trimmed)
					.ok_or_else(|| anyhow!("no JSON in model reply: {}", trimmed))?;
				let value: serde_json::Value =
					serde_json::from_str(json).context("model reply is not valid JSON")?;
				Ok(StateValue::from(value))
			}
		}
	}
}

fn number_regex() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number pattern"))
}

/// Slice from the first `{` or `[` to the matching last `}` or `]`.
pub(crate) fn extract_json(text: &str) -> Option<&str> {
	let start = text.find(|c: char| c == '{' || c == '[')?;
	let close = if text[start..].starts_with('{') { '}' } else { ']' };
	let end = text.rfind(close)?;
	(end > start).then(|| &text[start..=end])
}

/// Slice from the first `{` to the last `}`.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
	let start = text.find('{')?;
	let end = text.rfind('}')?;
	(end > start).then(|| &text[start..=end])
}

/// An agent that renders a prompt from its inputs and asks a chat model.
pub struct LlmAgent {
	descriptor: AgentDescriptor,
	model: Arc<dyn ChatModel>,
	system_message: Option<String>,
	user_message: String,
	output_kind: OutputKind,
}

impl fmt::Debug for LlmAgent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LlmAgent")
			.field("descriptor", &self.descriptor)
			.field("model", &self.model.model_name())
			.field("output_kind", &self.output_kind)
			.finish()
	}
}

impl LlmAgent {
	pub(crate) fn new(
		descriptor: AgentDescriptor,
		model: Arc<dyn ChatModel>,
		system_message: Option<String>,
		user_message: String,
		output_kind: OutputKind,
	) -> Self {
		Self {
			descriptor,
			model,
			system_message,
			user_message,
			output_kind,
		}
	}

	/// Build the request sent for the given inputs.
	pub fn render_request(&self, arguments: &Arguments) -> ChatRequest {
		let user = template::render_arguments(&self.user_message, arguments);
		let request = ChatRequest::user(user);
		match &self.system_message {
			Some(system) => request.with_system(template::render_arguments(system, arguments)),
			None => request,
		}
	}
}

#[async_trait]
impl Agent for LlmAgent {
	fn descriptor(&self) -> &AgentDescriptor {
		&self.descriptor
	}

	async fn execute(&self, arguments: &Arguments, _scope: &AgenticScope) -> Result<StateValue> {
		let request = self.render_request(arguments);
		debug!(
			target: "aok::agent",
			agent = %self.descriptor.name,
			model = %self.model.model_name(),
			"calling chat model"
		);
		let reply = self
			.model
			.chat(request)
			.await
			.with_context(|| format!("chat model {} failed", self.model.model_name()))?;
		self.output_kind.parse(&reply)
	}
}
