//! Agentic scope - shared state and invocation ledger for one run
//!
//! A scope is created per orchestration run and handed by reference to every
//! agent the run invokes. It holds:
//! - the state map (key -> [`StateValue`]) agents read inputs from and write
//!   outputs to
//! - the ledger of [`AgentInvocation`] records in completion order
//!
//! Cloning an [`AgenticScope`] clones the handle, not the contents. The
//! storage is lock-guarded so a handle can cross threads, but two runs must
//! never share one scope.

mod invocation;
mod value;

pub use invocation::AgentInvocation;
pub use value::{Arguments, FromStateValue, StateDefault, StateValue, ValueKind};

use crate::error::{AgenticError, AgenticResult};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug)]
struct ScopeInner {
    id: Uuid,
    state: RwLock<HashMap<String, StateValue>>,
    ledger: RwLock<Vec<AgentInvocation>>,
}

/// Shared state container plus invocation ledger.
///
/// # Example
///
/// ```
/// use aok::AgenticScope;
///
/// let scope = AgenticScope::new();
/// scope.write_state("score", 0.4);
///
/// assert_eq!(scope.read_state("score", 0.0).unwrap(), 0.4);
/// assert_eq!(scope.read_state("missing", "fallback").unwrap(), "fallback");
/// assert!(scope.invocations("scoreStyle").is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct AgenticScope {
    inner: Arc<ScopeInner>,
}

// Writes are single assignments, so a poisoned lock still holds consistent data.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl AgenticScope {
    /// Create an empty scope for a new run.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                id: Uuid::new_v4(),
                state: RwLock::new(HashMap::new()),
                ledger: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Create a scope pre-seeded with state.
    pub fn with_state(state: Arguments) -> Self {
        let scope = Self::new();
        scope.write_states(state);
        scope
    }

    /// Unique id of this run's scope.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Whether two handles point at the same scope.
    pub fn same_scope(&self, other: &AgenticScope) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Write a value, overwriting any previous one.
    pub fn write_state(&self, key: impl Into<String>, value: impl Into<StateValue>) {
        let key = key.into();
        let value = value.into();
        debug!(target: "aok::scope", scope = %self.inner.id, key = %key, kind = %value.kind(), "write state");
        write_lock(&self.inner.state).insert(key, value);
    }

    /// Write several values at once.
    pub fn write_states(&self, values: Arguments) {
        let mut state = write_lock(&self.inner.state);
        for (key, value) in values {
            state.insert(key, value);
        }
    }

    /// Read a value, falling back to `default` when the key is absent.
    ///
    /// The default's type decides the returned type. A present value of a
    /// different kind is a [`AgenticError::TypeMismatch`].
    pub fn read_state<D: StateDefault>(&self, key: &str, default: D) -> AgenticResult<D::Output> {
        let state = read_lock(&self.inner.state);
        match state.get(key) {
            None => Ok(default.into_output()),
            Some(value) => D::Output::from_state(value).ok_or_else(|| {
                AgenticError::type_mismatch(key, <D::Output as FromStateValue>::KIND, value.kind())
            }),
        }
    }

    /// Read the raw value, if any.
    pub fn read_state_opt(&self, key: &str) -> Option<StateValue> {
        read_lock(&self.inner.state).get(key).cloned()
    }

    /// Deserialize a value into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent and a TypeMismatch when the
    /// stored value does not fit `T`.
    pub fn read_state_as<T: DeserializeOwned>(&self, key: &str) -> AgenticResult<Option<T>> {
        let Some(value) = self.read_state_opt(key) else {
            return Ok(None);
        };
        serde_json::from_value(value.to_json())
            .map(Some)
            .map_err(|_| AgenticError::type_mismatch(key, ValueKind::Structured, value.kind()))
    }

    /// Whether a value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        read_lock(&self.inner.state).contains_key(key)
    }

    /// Copy of the whole state map, sorted by key.
    pub fn state_snapshot(&self) -> BTreeMap<String, StateValue> {
        read_lock(&self.inner.state)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Append a record to the ledger and return its sequence number.
    pub fn record_invocation(&self, mut record: AgentInvocation) -> u64 {
        let mut ledger = write_lock(&self.inner.ledger);
        let sequence = ledger.len() as u64;
        record.sequence = sequence;
        debug!(
            target: "aok::scope",
            scope = %self.inner.id,
            agent = %record.agent_name,
            sequence,
            "record invocation"
        );
        ledger.push(record);
        sequence
    }

    /// Records for one agent in invocation order; empty if it never ran.
    pub fn invocations(&self, agent_name: &str) -> Vec<AgentInvocation> {
        read_lock(&self.inner.ledger)
            .iter()
            .filter(|r| r.agent_name == agent_name)
            .cloned()
            .collect()
    }

    /// Records that wrote `output_key`, in global order.
    pub fn invocations_for_key(&self, output_key: &str) -> Vec<AgentInvocation> {
        read_lock(&self.inner.ledger)
            .iter()
            .filter(|r| r.output_key == output_key)
            .cloned()
            .collect()
    }

    /// Every record in global completion order.
    pub fn ledger(&self) -> Vec<AgentInvocation> {
        read_lock(&self.inner.ledger).clone()
    }

    /// Most recent record, if any.
    pub fn last_invocation(&self) -> Option<AgentInvocation> {
        read_lock(&self.inner.ledger).last().cloned()
    }

    /// Total number of recorded invocations.
    pub fn invocation_count(&self) -> usize {
        read_lock(&self.inner.ledger).len()
    }
}

impl Default for AgenticScope {
    fn default() -> Self {
        Self::new()
    }
}
