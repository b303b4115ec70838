//! Agent descriptor - the declared contract of an agent over scope.

use crate::scope::StateValue;
use serde::Serialize;
use serde_json::{json, Value};

/// A declared input key, optionally with a default.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InputKey {
	/// Scope key the input is read from.
	pub name: String,

	/// Value used when the key is absent from scope.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default: Option<StateValue>,
}

impl InputKey {
	/// A required input.
	pub fn required(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			default: None,
		}
	}

	/// An input that falls back to `default`.
	pub fn with_default(name: impl Into<String>, default: impl Into<StateValue>) -> Self {
		Self {
			name: name.into(),
			default: Some(default.into()),
		}
	}

	/// Whether the invoker fails when the key is absent.
	pub fn is_required(&self) -> bool {
		self.default.is_none()
	}
}

/// Name, inputs and output of an agent.
///
/// Descriptors are what the supervisor shows its planner, so the
/// description should explain what the agent does and when to use it.
///
/// # Example
///
/// ```
/// use aok::agent::{AgentDescriptor, InputKey};
///
/// let descriptor = AgentDescriptor::new("editStory", "story")
///     .with_description("Edits a story to better fit a given style")
///     .with_input(InputKey::required("story"))
///     .with_input(InputKey::required("style"));
///
/// assert_eq!(descriptor.input_names(), vec!["story", "style"]);
/// assert_eq!(descriptor.to_planner_json()["output"], "story");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AgentDescriptor {
	/// Unique agent name.
	///
	/// Ledger entries and planner decisions refer to the agent by this name.
	pub name: String,

	/// Human-readable description for planner consumption.
	pub description: String,

	/// Declared inputs, in call order.
	pub inputs: Vec<InputKey>,

	/// Scope key the agent's result is written to.
	pub output_key: String,
}

impl AgentDescriptor {
	/// Create a descriptor with no inputs and an empty description.
	pub fn new(name: impl Into<String>, output_key: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: String::new(),
			inputs: Vec::new(),
			output_key: output_key.into(),
		}
	}

	/// Set the description using builder pattern.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	/// Append an input using builder pattern.
	pub fn with_input(mut self, input: InputKey) -> Self {
		self.inputs.push(input);
		self
	}

	/// Names of the declared inputs.
	pub fn input_names(&self) -> Vec<&str> {
		self.inputs.iter().map(|i| i.name.as_str()).collect()
	}

	/// Look up a declared input by name.
	pub fn input(&self, name: &str) -> Option<&InputKey> {
		self.inputs.iter().find(|i| i.name == name)
	}

	/// JSON shape presented to the planner.
	pub fn to_planner_json(&self) -> Value {
		json!({
			"name": self.name,
			"description": self.description,
			"inputs": self.input_names(),
			"output": self.output_key,
		})
	}
}
