//! Ledger entries for agent calls.

use super::{Arguments, StateValue};
use serde::Serialize;

/// One completed agent call.
///
/// Records are appended by the invoker after the callable succeeds and are
/// never modified afterwards; the scope hands out clones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentInvocation {
    /// Name of the agent that ran.
    pub agent_name: String,
    /// Resolved input arguments, by key.
    pub input: Arguments,
    /// Scope key the output was written to.
    pub output_key: String,
    /// Value the agent produced.
    pub output: StateValue,
    /// Position in the run's global completion order, starting at 0.
    pub sequence: u64,
}

impl AgentInvocation {
    /// Create a record; the sequence is assigned when it is recorded.
    pub fn new(
        agent_name: impl Into<String>,
        input: Arguments,
        output_key: impl Into<String>,
        output: StateValue,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            input,
            output_key: output_key.into(),
            output,
            sequence: 0,
        }
    }

    /// One-line summary used in planning prompts and logs.
    pub fn summary(&self) -> String {
        let args: Vec<String> = self
            .input
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.render()))
            .collect();
        format!(
            "#{} {}({}) -> {} = {}",
            self.sequence,
            self.agent_name,
            args.join(", "),
            self.output_key,
            self.output.render()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let mut input = Arguments::new();
        input.insert("topic".into(), StateValue::from("dragons"));
        let mut record = AgentInvocation::new("generateStory", input, "story", "Once".into());
        record.sequence = 3;

        assert_eq!(
            record.summary(),
            "#3 generateStory(topic=dragons) -> story = Once"
        );
    }
}
