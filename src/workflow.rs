//! Workflow loop - repeats an ordered list of agents until convergence.
//!
//! A [`LoopAgent`] runs every sub-agent in order (one *pass*), then checks
//! its exit condition against the scope. The check happens only between
//! passes, so each sub-agent always sees the writes of the previous pass.
//!
//! # Example
//!
//! ```
//! use aok::agent::AgentBuilder;
//! use aok::workflow::{LoopBuilder, LoopState};
//! use aok::{AgenticScope, StateValue};
//! use std::sync::Arc;
//!
//! # async fn example() -> aok::AgenticResult<()> {
//! let bump = AgentBuilder::new("bump")
//!     .input_with_default("count", 0)
//!     .output_name("count")
//!     .build(|args| async move {
//!         let count = args.get("count").and_then(|v| v.as_number()).unwrap_or(0.0);
//!         Ok(StateValue::from(count + 1.0))
//!     })?;
//!
//! let counter = LoopBuilder::new("counter")
//!     .sub_agent(Arc::new(bump))
//!     .max_iterations(10)
//!     .exit_condition(|scope| scope.read_state("count", 0.0).unwrap_or(0.0) >= 3.0)
//!     .build()?;
//!
//! let scope = AgenticScope::new();
//! let report = counter.run(&scope).await?;
//! assert_eq!(report.state, LoopState::Converged);
//! assert_eq!(report.passes, 3);
//! # Ok(())
//! # }
//! ```

use crate::agent::{Agent, AgentDescriptor, AgentInvoker, InputKey};
use crate::error::{AgenticError, AgenticResult};
use crate::journal::Journal;
use crate::result::ResultWithScope;
use crate::scope::{AgenticScope, Arguments, StateValue};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

#[cfg(feature = "config")]
use crate::config::Configuration;
#[cfg(feature = "observability")]
use crate::observability::Logger;

/// Default pass limit when none is configured.
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

/// Stop predicate, called with the scope and the number of the pass that
/// just finished (starting at 1).
pub type ExitCondition = Arc<dyn Fn(&AgenticScope, u32) -> bool + Send + Sync>;

/// Where a loop run is, or how it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Executing the given pass.
    Running(u32),
    /// The exit condition held after a pass.
    Converged,
    /// The pass limit was reached without the exit condition holding.
    Exhausted,
}

impl LoopState {
    /// Whether the loop has stopped.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running(_))
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running(pass) => write!(f, "running (pass {})", pass),
            Self::Converged => write!(f, "converged"),
            Self::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Outcome of one loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    /// Terminal state reached.
    pub state: LoopState,
    /// Number of full passes performed.
    pub passes: u32,
}

/// Builder for [`LoopAgent`].
pub struct LoopBuilder {
    name: String,
    description: String,
    sub_agents: Vec<Arc<dyn Agent>>,
    max_iterations: u32,
    exit_condition: Option<ExitCondition>,
    output_name: Option<String>,
    #[cfg(feature = "observability")]
    logger: Option<Arc<Logger>>,
}

impl fmt::Debug for LoopBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopBuilder")
            .field("name", &self.name)
            .field(
                "sub_agents",
                &self.sub_agents.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .field("max_iterations", &self.max_iterations)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl LoopBuilder {
    /// Start building a loop with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            sub_agents: Vec::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            exit_condition: None,
            output_name: None,
            #[cfg(feature = "observability")]
            logger: None,
        }
    }

    /// Seed the pass limit from the `[workflow]` configuration section.
    #[cfg(feature = "config")]
    pub fn from_config(name: impl Into<String>, config: &Configuration) -> Self {
        Self::new(name).max_iterations(config.workflow.max_iterations)
    }

    /// Human-readable description, shown to planners.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append one sub-agent to the pass order.
    pub fn sub_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.sub_agents.push(agent);
        self
    }

    /// Append several sub-agents to the pass order.
    pub fn sub_agents(mut self, agents: impl IntoIterator<Item = Arc<dyn Agent>>) -> Self {
        self.sub_agents.extend(agents);
        self
    }

    /// Maximum number of full passes.
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Stop predicate over the scope.
    pub fn exit_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn(&AgenticScope) -> bool + Send + Sync + 'static,
    {
        self.exit_condition = Some(Arc::new(move |scope: &AgenticScope, _pass: u32| condition(scope)));
        self
    }

    /// Stop predicate that also sees the number of the finished pass.
    pub fn exit_condition_with_pass<F>(mut self, condition: F) -> Self
    where
        F: Fn(&AgenticScope, u32) -> bool + Send + Sync + 'static,
    {
        self.exit_condition = Some(Arc::new(condition));
        self
    }

    /// Scope key holding the loop's result; defaults to the output key of
    /// the last sub-agent.
    pub fn output_name(mut self, key: impl Into<String>) -> Self {
        self.output_name = Some(key.into());
        self
    }

    /// Mirror loop events into a markdown run log.
    #[cfg(feature = "observability")]
    pub fn logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Validate and build the loop.
    pub fn build(self) -> AgenticResult<LoopAgent> {
        if self.name.trim().is_empty() {
            return Err(AgenticError::invalid_configuration("loop name must not be empty"));
        }
        if self.max_iterations == 0 {
            return Err(AgenticError::invalid_configuration(format!(
                "loop {} must allow at least one iteration",
                self.name
            )));
        }
        let last = self.sub_agents.last().ok_or_else(|| {
            AgenticError::invalid_configuration(format!("loop {} has no sub-agents", self.name))
        })?;

        let output_key = match self.output_name {
            Some(key) => {
                if !self.sub_agents.iter().any(|a| a.output_key() == key) {
                    return Err(AgenticError::invalid_configuration(format!(
                        "loop {} output '{}' is not written by any sub-agent",
                        self.name, key
                    )));
                }
                key
            }
            None => last.output_key().to_string(),
        };

        let mut descriptor = AgentDescriptor::new(self.name, output_key).with_description(self.description);
        for input in external_inputs(&self.sub_agents) {
            descriptor = descriptor.with_input(input);
        }

        Ok(LoopAgent {
            descriptor,
            invokers: self.sub_agents.into_iter().map(AgentInvoker::new).collect(),
            max_iterations: self.max_iterations,
            exit_condition: self.exit_condition,
            #[cfg(feature = "observability")]
            journal: Journal::new(self.logger),
            #[cfg(not(feature = "observability"))]
            journal: Journal::default(),
        })
    }
}

/// Inputs the loop needs from outside: keys read by a sub-agent before any
/// earlier sub-agent in the pass writes them.
fn external_inputs(agents: &[Arc<dyn Agent>]) -> Vec<InputKey> {
    let mut produced: HashSet<&str> = HashSet::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut inputs = Vec::new();
    for agent in agents {
        for input in &agent.descriptor().inputs {
            if !produced.contains(input.name.as_str()) && seen.insert(input.name.as_str()) {
                inputs.push(input.clone());
            }
        }
        produced.insert(agent.output_key());
    }
    inputs
}

/// A composite agent running its sub-agents in repeated passes.
///
/// Registered with a supervisor it behaves like any other agent: its output
/// is the value of its output key once the loop stops.
#[derive(Clone)]
pub struct LoopAgent {
    descriptor: AgentDescriptor,
    invokers: Vec<AgentInvoker>,
    max_iterations: u32,
    exit_condition: Option<ExitCondition>,
    journal: Journal,
}

impl fmt::Debug for LoopAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopAgent")
            .field("name", &self.descriptor.name)
            .field("sub_agents", &self.sub_agent_names())
            .field("max_iterations", &self.max_iterations)
            .finish_non_exhaustive()
    }
}

impl LoopAgent {
    /// Sub-agent names in pass order.
    pub fn sub_agent_names(&self) -> Vec<&str> {
        self.invokers.iter().map(|i| i.name()).collect()
    }

    /// Configured pass limit.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Run passes against `scope` until the exit condition holds or the
    /// pass limit is reached.
    ///
    /// A sub-agent failure stops the loop immediately; writes made by
    /// earlier invocations stay in the scope.
    pub async fn run(&self, scope: &AgenticScope) -> AgenticResult<LoopReport> {
        let name = &self.descriptor.name;
        let mut pass = 0;

        loop {
            pass += 1;
            debug!(target: "aok::workflow", agent = %name, state = %LoopState::Running(pass), "starting pass");

            for invoker in &self.invokers {
                if let Err(e) = invoker.invoke(scope).await {
                    self.journal.error(&format!("loop {} pass {}: {}", name, pass, e));
                    return Err(e);
                }
                self.journal.invocation(scope.last_invocation().as_ref());
            }

            let stop = self
                .exit_condition
                .as_ref()
                .map(|condition| condition(scope, pass))
                .unwrap_or(false);
            self.journal.loop_pass(name, pass, stop);

            let state = if stop {
                LoopState::Converged
            } else if pass >= self.max_iterations {
                LoopState::Exhausted
            } else {
                continue;
            };

            info!(target: "aok::workflow", agent = %name, passes = pass, "loop {}", state);
            return Ok(LoopReport { state, passes: pass });
        }
    }

    /// Seed a fresh scope with `arguments`, run the loop and return its
    /// output value with the scope and report.
    pub async fn invoke_with_state(&self, arguments: Arguments) -> AgenticResult<ResultWithScope<LoopReport>> {
        let scope = AgenticScope::with_state(arguments);
        let config: BTreeMap<String, serde_json::Value> = [
            ("max_iterations".to_string(), serde_json::json!(self.max_iterations)),
            ("sub_agents".to_string(), serde_json::json!(self.sub_agent_names())),
        ]
        .into_iter()
        .collect();
        self.journal.run_start("loop", None, &config);

        let report = self.run(&scope).await?;
        let result = self.output(&scope)?;
        self.journal.completion(&report.state.to_string(), scope.invocation_count());
        Ok(ResultWithScope::new(result, scope, report))
    }

    fn output(&self, scope: &AgenticScope) -> AgenticResult<StateValue> {
        scope
            .read_state_opt(&self.descriptor.output_key)
            .ok_or_else(|| AgenticError::empty_ledger(&self.descriptor.output_key))
    }
}

#[async_trait]
impl Agent for LoopAgent {
    fn descriptor(&self) -> &AgentDescriptor {
        &self.descriptor
    }

    async fn execute(&self, _arguments: &Arguments, scope: &AgenticScope) -> Result<StateValue> {
        self.run(scope).await?;
        Ok(self.output(scope)?)
    }
}
