//! Final value of a run together with the scope it ran in.

use crate::scope::{AgenticScope, StateValue};

/// Result of `invoke_with_state`: the selected value, the run's scope for
/// inspection, and the controller's terminal outcome.
#[derive(Debug, Clone)]
pub struct ResultWithScope<O> {
    /// Value chosen for the controller's output key.
    pub result: StateValue,
    /// Scope the run used; holds the full state and ledger.
    pub scope: AgenticScope,
    /// How the run ended.
    pub outcome: O,
}

impl<O> ResultWithScope<O> {
    /// Bundle a run's result.
    pub fn new(result: StateValue, scope: AgenticScope, outcome: O) -> Self {
        Self {
            result,
            scope,
            outcome,
        }
    }

    /// Drop the scope and outcome, keeping only the value.
    pub fn into_result(self) -> StateValue {
        self.result
    }
}
