//! Registry of agents available to a controller.

use super::{Agent, AgentDescriptor, AgentInvoker};
use crate::error::{AgenticError, AgenticResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Agents keyed by name, kept in registration order.
///
/// Registration order is the order candidates are presented to a planner.
///
/// # Example
///
/// ```
/// use aok::agent::{AgentBuilder, AgentRegistry};
/// use std::sync::Arc;
///
/// let ping = AgentBuilder::new("ping")
///     .output_name("pong")
///     .build(|_args| async { Ok("pong") })
///     .unwrap();
///
/// let mut registry = AgentRegistry::new();
/// registry.register(Arc::new(ping)).unwrap();
///
/// assert!(registry.contains("ping"));
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct AgentRegistry {
	invokers: Vec<AgentInvoker>,
	index: HashMap<String, usize>,
}

impl AgentRegistry {
	/// Create a new empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register an agent.
	///
	/// Returns an error if an agent with the same name already exists.
	pub fn register(&mut self, agent: Arc<dyn Agent>) -> AgenticResult<()> {
		let name = agent.name().to_string();
		if self.index.contains_key(&name) {
			return Err(AgenticError::duplicate_agent(name));
		}
		self.index.insert(name, self.invokers.len());
		self.invokers.push(AgentInvoker::new(agent));
		Ok(())
	}

	/// Get the invoker for an agent by name.
	pub fn get(&self, name: &str) -> Option<&AgentInvoker> {
		self.index.get(name).map(|&i| &self.invokers[i])
	}

	/// Check if an agent exists.
	pub fn contains(&self, name: &str) -> bool {
		self.index.contains_key(name)
	}

	/// Get the number of registered agents.
	pub fn len(&self) -> usize {
		self.invokers.len()
	}

	/// Check if the registry is empty.
	pub fn is_empty(&self) -> bool {
		self.invokers.is_empty()
	}

	/// Agent names in registration order.
	pub fn names(&self) -> Vec<&str> {
		self.invokers.iter().map(|i| i.name()).collect()
	}

	/// Descriptors in registration order.
	pub fn descriptors(&self) -> Vec<&AgentDescriptor> {
		self.invokers.iter().map(|i| i.descriptor()).collect()
	}

	/// Iterate over all invokers in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &AgentInvoker> {
		self.invokers.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::agent::AgentBuilder;

	fn make_agent(name: &str) -> Arc<dyn Agent> {
		Arc::new(
			AgentBuilder::new(name)
				.description(format!("Description for {}", name))
				.output_name("out")
				.build(|_args| async { Ok("done") })
				.unwrap(),
		)
	}

	#[test]
	fn test_new_registry() {
		let registry = AgentRegistry::new();
		assert!(registry.is_empty());
		assert_eq!(registry.len(), 0);
	}

	#[test]
	fn test_register_and_get() {
		let mut registry = AgentRegistry::new();
		registry.register(make_agent("generateStory")).unwrap();

		let invoker = registry.get("generateStory").unwrap();
		assert_eq!(invoker.name(), "generateStory");
		assert!(registry.get("missing").is_none());
	}

	#[test]
	fn test_register_duplicate() {
		let mut registry = AgentRegistry::new();
		registry.register(make_agent("tool")).unwrap();

		match registry.register(make_agent("tool")) {
			Err(AgenticError::DuplicateAgent { name }) => assert_eq!(name, "tool"),
			other => panic!("Expected DuplicateAgent error, got {:?}", other),
		}
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn test_registration_order() {
		let mut registry = AgentRegistry::new();
		for name in ["c", "a", "b"] {
			registry.register(make_agent(name)).unwrap();
		}

		assert_eq!(registry.names(), vec!["c", "a", "b"]);
		let descriptions: Vec<&str> = registry
			.descriptors()
			.iter()
			.map(|d| d.description.as_str())
			.collect();
		assert_eq!(descriptions[0], "Description for c");
		assert_eq!(registry.iter().count(), 3);
	}
}
