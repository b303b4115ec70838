//! Fixed plans derived from a planning instruction.

use crate::agent::AgentRegistry;
use crate::error::{AgenticError, AgenticResult};
use regex::Regex;

/// An invocation order read from a free-text instruction.
///
/// The steps are the registered agent names in the order they are
/// mentioned; a name mentioned twice runs twice. Names match on whole
/// words and are case-sensitive, so `"invoke A then invoke B"` plans
/// `[A, B]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPlan {
    steps: Vec<String>,
}

impl FixedPlan {
    /// Read the plan for `instruction` against the registered agents.
    ///
    /// An instruction naming no registered agent is a planning failure.
    pub fn from_instruction(instruction: &str, registry: &AgentRegistry) -> AgenticResult<Self> {
        let mut mentions: Vec<(usize, &str)> = Vec::new();
        for name in registry.names() {
            let pattern = format!(r"\b{}\b", regex::escape(name));
            let re = Regex::new(&pattern).map_err(|e| {
                AgenticError::invalid_configuration(format!("agent name '{}' cannot be matched: {}", name, e))
            })?;
            mentions.extend(re.find_iter(instruction).map(|m| (m.start(), name)));
        }

        if mentions.is_empty() {
            return Err(AgenticError::planning_failure(
                "planning instruction names no registered agent",
                instruction,
            ));
        }

        mentions.sort_by_key(|(position, _)| *position);
        Ok(Self {
            steps: mentions.into_iter().map(|(_, name)| name.to_string()).collect(),
        })
    }

    /// Agent names in invocation order.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Number of invocations the plan needs.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a plan built by [`FixedPlan::from_instruction`].
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, AgentBuilder};
    use std::sync::Arc;

    fn registry(names: &[&str]) -> AgentRegistry {
        let mut registry = AgentRegistry::new();
        for name in names {
            let agent = AgentBuilder::new(*name)
                .output_name(format!("{}_out", name))
                .build(|_| async { Ok("ok") })
                .unwrap();
            registry.register(Arc::new(agent) as Arc<dyn Agent>).unwrap();
        }
        registry
    }

    #[test]
    fn test_order_of_mention() {
        let registry = registry(&["A", "B"]);
        let plan = FixedPlan::from_instruction("invoke A then invoke B, no looping", &registry).unwrap();
        assert_eq!(plan.steps(), ["A", "B"]);

        let plan = FixedPlan::from_instruction("first B, then A", &registry).unwrap();
        assert_eq!(plan.steps(), ["B", "A"]);
    }

    #[test]
    fn test_whole_words_only() {
        let registry = registry(&["editStory", "edit"]);
        let plan = FixedPlan::from_instruction("call editStory and stop", &registry).unwrap();
        assert_eq!(plan.steps(), ["editStory"]);
    }

    #[test]
    fn test_repeated_mentions_repeat() {
        let registry = registry(&["scoreStyle", "editStory"]);
        let plan =
            FixedPlan::from_instruction("scoreStyle, editStory, then scoreStyle again", &registry).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.steps()[2], "scoreStyle");
    }

    #[test]
    fn test_no_known_agent_is_planning_failure() {
        let registry = registry(&["A"]);
        let err = FixedPlan::from_instruction("just finish", &registry).unwrap_err();
        assert!(err.is_planning_failure());
        assert!(err.to_string().contains("just finish"));
    }
}
