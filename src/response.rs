//! Response selection - picking a run's final value from the ledger.
//!
//! Every strategy is a pure function of the ledger and an output key. Only
//! records whose `output_key` matches take part, in global order.

use crate::error::{AgenticError, AgenticResult};
use crate::scope::{AgentInvocation, StateValue};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Scoring function for [`ResponseStrategy::Scored`].
pub type ScoreFn = Arc<dyn Fn(&StateValue) -> f64 + Send + Sync>;

/// Policy for choosing the final value.
#[derive(Clone, Default)]
pub enum ResponseStrategy {
    /// Output of the chronologically last record for the key.
    #[default]
    Last,
    /// Output of the first record for the key.
    First,
    /// Output with the highest score; ties go to the later record.
    Scored(ScoreFn),
}

impl ResponseStrategy {
    /// Scored strategy from a plain function.
    pub fn scored<F>(score: F) -> Self
    where
        F: Fn(&StateValue) -> f64 + Send + Sync + 'static,
    {
        Self::Scored(Arc::new(score))
    }

    /// Short name for logs and config.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Last => "last",
            Self::First => "first",
            Self::Scored(_) => "scored",
        }
    }
}

impl fmt::Debug for ResponseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ResponseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResponseStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "last" => Ok(Self::Last),
            "first" => Ok(Self::First),
            _ => Err(anyhow::anyhow!("Invalid response strategy: {}", s)),
        }
    }
}

/// Select the final value for `output_key` under `strategy`.
///
/// Fails with [`AgenticError::EmptyLedger`] when no record wrote the key.
pub fn select_response(
    ledger: &[AgentInvocation],
    output_key: &str,
    strategy: &ResponseStrategy,
) -> AgenticResult<StateValue> {
    let mut candidates = ledger.iter().filter(|r| r.output_key == output_key);

    let chosen = match strategy {
        ResponseStrategy::Last => candidates.max_by_key(|r| r.sequence),
        ResponseStrategy::First => candidates.min_by_key(|r| r.sequence),
        ResponseStrategy::Scored(score) => {
            let mut best: Option<(&AgentInvocation, f64)> = None;
            for record in candidates.by_ref() {
                let value = score(&record.output);
                let better = match best {
                    None => true,
                    Some((held, held_score)) => {
                        value > held_score || (value == held_score && record.sequence > held.sequence)
                    }
                };
                if better {
                    best = Some((record, value));
                }
            }
            best.map(|(record, _)| record)
        }
    };

    chosen
        .map(|r| r.output.clone())
        .ok_or_else(|| AgenticError::empty_ledger(output_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Arguments;

    fn record(agent: &str, key: &str, output: &str, sequence: u64) -> AgentInvocation {
        let mut r = AgentInvocation::new(agent, Arguments::new(), key, StateValue::from(output));
        r.sequence = sequence;
        r
    }

    fn ledger() -> Vec<AgentInvocation> {
        vec![
            record("generateStory", "story", "draft", 0),
            record("scoreStyle", "score", "0.3", 1),
            record("editStory", "story", "edited once", 2),
            record("scoreStyle", "score", "0.9", 3),
            record("editStory", "story", "edited twice", 4),
        ]
    }

    #[test]
    fn test_last() {
        let value = select_response(&ledger(), "story", &ResponseStrategy::Last).unwrap();
        assert_eq!(value, StateValue::from("edited twice"));
    }

    #[test]
    fn test_first() {
        let value = select_response(&ledger(), "story", &ResponseStrategy::First).unwrap();
        assert_eq!(value, StateValue::from("draft"));
    }

    #[test]
    fn test_scored_prefers_highest_then_latest() {
        let by_length = ResponseStrategy::scored(|v| v.render().len() as f64);
        let value = select_response(&ledger(), "story", &by_length).unwrap();
        assert_eq!(value, StateValue::from("edited twice"));

        let flat = ResponseStrategy::scored(|_| 1.0);
        let value = select_response(&ledger(), "story", &flat).unwrap();
        assert_eq!(value, StateValue::from("edited twice"));
    }

    #[test]
    fn test_empty_ledger_for_key() {
        let err = select_response(&ledger(), "summary", &ResponseStrategy::Last).unwrap_err();
        assert!(matches!(err, AgenticError::EmptyLedger { ref key } if key == "summary"));

        assert!(select_response(&[], "story", &ResponseStrategy::First).is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("LAST".parse::<ResponseStrategy>().unwrap().name(), "last");
        assert_eq!("first".parse::<ResponseStrategy>().unwrap().name(), "first");
        assert!("summary".parse::<ResponseStrategy>().is_err());
    }
}
