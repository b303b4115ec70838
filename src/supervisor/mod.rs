//! Supervisor - plans which agent to run next until the goal is met.
//!
//! Each run alternates between a planning step and an invoking step:
//!
//! 1. the goal is written to scope under [`REQUEST_KEY`]
//! 2. with a fixed planning instruction, the agents it names run in order
//!    and the planner (if any) only confirms completion
//! 3. otherwise the [`Planner`] sees the goal, the candidate agents and the
//!    ledger, and answers "invoke X" or "done"
//! 4. every invocation counts against `max_agents_invocations`; when the
//!    budget is spent the run stops as [`SupervisorState::BudgetExhausted`]
//!    and still returns a best-effort value
//!
//! Repeated identical proposals are executed every time. The budget is the
//! only cycle guard.

mod plan;
mod planner;

pub use plan::FixedPlan;
pub use planner::{LlmPlanner, Planner, PlannerDecision, PlanningRequest};

use crate::agent::{Agent, AgentRegistry};
use crate::error::{AgenticError, AgenticResult};
use crate::journal::Journal;
use crate::response::{select_response, ResponseStrategy};
use crate::result::ResultWithScope;
use crate::scope::{AgenticScope, Arguments, StateValue};
use crate::template::render_scope;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[cfg(feature = "config")]
use crate::config::Configuration;
#[cfg(feature = "observability")]
use crate::observability::Logger;

/// Default invocation budget when none is configured.
pub const DEFAULT_MAX_AGENTS_INVOCATIONS: u32 = 10;

/// Scope key the run's goal is written to.
pub const REQUEST_KEY: &str = "request";

/// Seeds the scope and produces the goal text of a run.
pub type RequestGenerator = Arc<dyn Fn(&AgenticScope) -> String + Send + Sync>;

/// How a supervisor run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// The planner (or a completed fixed plan) declared the goal met.
    Done,
    /// The invocation budget ran out first.
    BudgetExhausted,
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "done"),
            Self::BudgetExhausted => write!(f, "budget exhausted"),
        }
    }
}

/// Outcome of one supervisor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorReport {
    /// Terminal state reached.
    pub state: SupervisorState,
    /// Invocations the supervisor made (a composite counts once).
    pub invocations: u32,
}

/// Builder for [`SupervisorAgent`].
pub struct SupervisorBuilder {
    sub_agents: Vec<Arc<dyn Agent>>,
    planner: Option<Arc<dyn Planner>>,
    max_agents_invocations: u32,
    response_strategy: ResponseStrategy,
    planning_instruction: Option<String>,
    request_generator: Option<RequestGenerator>,
    output_name: Option<String>,
    #[cfg(feature = "observability")]
    logger: Option<Arc<Logger>>,
}

impl fmt::Debug for SupervisorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupervisorBuilder")
            .field(
                "sub_agents",
                &self.sub_agents.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .field("max_agents_invocations", &self.max_agents_invocations)
            .field("response_strategy", &self.response_strategy)
            .field("planning_instruction", &self.planning_instruction)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl Default for SupervisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SupervisorBuilder {
    /// Start with default budget and the `Last` strategy.
    pub fn new() -> Self {
        Self {
            sub_agents: Vec::new(),
            planner: None,
            max_agents_invocations: DEFAULT_MAX_AGENTS_INVOCATIONS,
            response_strategy: ResponseStrategy::Last,
            planning_instruction: None,
            request_generator: None,
            output_name: None,
            #[cfg(feature = "observability")]
            logger: None,
        }
    }

    /// Seed budget, strategy, instruction and output name from the
    /// `[supervisor]` configuration section.
    #[cfg(feature = "config")]
    pub fn from_config(config: &Configuration) -> AgenticResult<Self> {
        let section = &config.supervisor;
        let strategy = config
            .response_strategy()
            .map_err(|e| AgenticError::invalid_configuration(format!("{:#}", e)))?;

        let mut builder = Self::new()
            .max_agents_invocations(section.max_agents_invocations)
            .response_strategy(strategy);
        builder.planning_instruction = section.planning_instruction.clone();
        builder.output_name = section.output_name.clone();
        Ok(builder)
    }

    /// Add one candidate agent.
    pub fn sub_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.sub_agents.push(agent);
        self
    }

    /// Add several candidate agents.
    pub fn sub_agents(mut self, agents: impl IntoIterator<Item = Arc<dyn Agent>>) -> Self {
        self.sub_agents.extend(agents);
        self
    }

    /// Planning collaborator. Required unless a planning instruction is set.
    pub fn planner(mut self, planner: Arc<dyn Planner>) -> Self {
        self.planner = Some(planner);
        self
    }

    /// Invocation budget per run.
    pub fn max_agents_invocations(mut self, max: u32) -> Self {
        self.max_agents_invocations = max;
        self
    }

    /// How the final value is chosen from the ledger.
    pub fn response_strategy(mut self, strategy: ResponseStrategy) -> Self {
        self.response_strategy = strategy;
        self
    }

    /// Fixed instruction naming the agents to run, in order. `{key}`
    /// placeholders are filled from scope.
    pub fn planning_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.planning_instruction = Some(instruction.into());
        self
    }

    /// Function producing the goal from the (seeded) scope.
    pub fn request_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn(&AgenticScope) -> String + Send + Sync + 'static,
    {
        self.request_generator = Some(Arc::new(generator));
        self
    }

    /// Scope key holding the run's answer.
    pub fn output_name(mut self, key: impl Into<String>) -> Self {
        self.output_name = Some(key.into());
        self
    }

    /// Mirror supervisor events into a markdown run log.
    #[cfg(feature = "observability")]
    pub fn logger(mut self, logger: Arc<Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Validate and build the supervisor.
    pub fn build(self) -> AgenticResult<SupervisorAgent> {
        if self.max_agents_invocations == 0 {
            return Err(AgenticError::invalid_configuration(
                "supervisor must allow at least one agent invocation",
            ));
        }
        if self.sub_agents.is_empty() {
            return Err(AgenticError::invalid_configuration("supervisor has no sub-agents"));
        }
        if self.planner.is_none() && self.planning_instruction.is_none() {
            return Err(AgenticError::invalid_configuration(
                "supervisor needs a planner or a planning instruction",
            ));
        }
        let output_key = self
            .output_name
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AgenticError::invalid_configuration("supervisor has no output name"))?;

        let mut registry = AgentRegistry::new();
        for agent in self.sub_agents {
            registry.register(agent)?;
        }

        Ok(SupervisorAgent {
            registry,
            planner: self.planner,
            max_agents_invocations: self.max_agents_invocations,
            response_strategy: self.response_strategy,
            planning_instruction: self.planning_instruction,
            request_generator: self.request_generator,
            output_key,
            #[cfg(feature = "observability")]
            journal: Journal::new(self.logger),
            #[cfg(not(feature = "observability"))]
            journal: Journal::default(),
        })
    }
}

/// Dynamic orchestrator over a set of candidate agents.
///
/// # Example
///
/// ```
/// use aok::agent::{Agent, AgentBuilder};
/// use aok::supervisor::{SupervisorBuilder, SupervisorState};
/// use std::sync::Arc;
///
/// # async fn example() -> aok::AgenticResult<()> {
/// let outline = AgentBuilder::new("outline")
///     .input("request")
///     .output_name("outline")
///     .build(|args| async move { Ok(format!("outline of {}", args["request"])) })?;
/// let draft = AgentBuilder::new("draft")
///     .input("outline")
///     .output_name("draft")
///     .build(|args| async move { Ok(format!("draft from {}", args["outline"])) })?;
///
/// let supervisor = SupervisorBuilder::new()
///     .sub_agents([Arc::new(outline) as Arc<dyn Agent>, Arc::new(draft)])
///     .planning_instruction("run outline, then draft")
///     .max_agents_invocations(2)
///     .output_name("draft")
///     .build()?;
///
/// let run = supervisor.invoke("a lighthouse story").await?;
/// assert_eq!(run.outcome.state, SupervisorState::Done);
/// assert_eq!(run.result.render(), "draft from outline of a lighthouse story");
/// # Ok(())
/// # }
/// ```
pub struct SupervisorAgent {
    registry: AgentRegistry,
    planner: Option<Arc<dyn Planner>>,
    max_agents_invocations: u32,
    response_strategy: ResponseStrategy,
    planning_instruction: Option<String>,
    request_generator: Option<RequestGenerator>,
    output_key: String,
    journal: Journal,
}

impl fmt::Debug for SupervisorAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupervisorAgent")
            .field("agents", &self.registry.names())
            .field("max_agents_invocations", &self.max_agents_invocations)
            .field("response_strategy", &self.response_strategy)
            .field("planning_instruction", &self.planning_instruction)
            .field("output_key", &self.output_key)
            .finish_non_exhaustive()
    }
}

fn planning_error(error: anyhow::Error) -> AgenticError {
    match error.downcast::<AgenticError>() {
        Ok(agentic) => agentic,
        Err(other) => AgenticError::planning_failure(format!("planner failed: {:#}", other), ""),
    }
}

impl SupervisorAgent {
    /// Candidate agent names in registration order.
    pub fn agent_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Scope key the answer is read from.
    pub fn output_key(&self) -> &str {
        &self.output_key
    }

    /// Invocation budget per run.
    pub fn max_agents_invocations(&self) -> u32 {
        self.max_agents_invocations
    }

    /// Run against a fresh scope.
    pub async fn invoke(&self, request: impl Into<String>) -> AgenticResult<ResultWithScope<SupervisorReport>> {
        self.invoke_with_scope(AgenticScope::new(), request).await
    }

    /// Run against a caller-provided scope.
    ///
    /// The caller's handle still sees every write made before a failure.
    pub async fn invoke_with_scope(
        &self,
        scope: AgenticScope,
        request: impl Into<String>,
    ) -> AgenticResult<ResultWithScope<SupervisorReport>> {
        scope.write_state(REQUEST_KEY, request.into());
        self.run(scope).await
    }

    /// Seed a fresh scope with `arguments` and derive the goal with the
    /// request generator.
    pub async fn invoke_with_state(&self, arguments: Arguments) -> AgenticResult<ResultWithScope<SupervisorReport>> {
        if self.request_generator.is_none() {
            return Err(AgenticError::invalid_configuration(
                "invoke_with_state needs a request generator",
            ));
        }
        self.run(AgenticScope::with_state(arguments)).await
    }

    async fn run(&self, scope: AgenticScope) -> AgenticResult<ResultWithScope<SupervisorReport>> {
        let goal = match &self.request_generator {
            Some(generator) => generator(&scope),
            None => scope.read_state(REQUEST_KEY, "")?,
        };
        scope.write_state(REQUEST_KEY, goal.clone());

        let config: BTreeMap<String, serde_json::Value> = [
            ("agents".to_string(), json!(self.registry.names())),
            ("max_agents_invocations".to_string(), json!(self.max_agents_invocations)),
            ("response_strategy".to_string(), json!(self.response_strategy.name())),
            ("planning_instruction".to_string(), json!(self.planning_instruction)),
            ("output_name".to_string(), json!(self.output_key)),
        ]
        .into_iter()
        .collect();
        self.journal.run_start("supervisor", Some(&goal), &config);
        info!(target: "aok::supervisor", scope = %scope.id(), goal = %goal, "supervisor run started");

        let (report, output_key) = match self.drive(&scope, &goal).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.journal.error(&e.to_string());
                warn!(target: "aok::supervisor", scope = %scope.id(), "supervisor run failed: {}", e);
                return Err(e);
            }
        };

        let result = self.select_result(&scope, &output_key, report.state)?;
        self.journal.completion(&report.state.to_string(), scope.invocation_count());
        info!(
            target: "aok::supervisor",
            scope = %scope.id(),
            invocations = report.invocations,
            "supervisor run {}",
            report.state
        );
        Ok(ResultWithScope::new(result, scope, report))
    }

    /// The plan/invoke cycle. Returns the report and the key to answer from.
    async fn drive(&self, scope: &AgenticScope, goal: &str) -> AgenticResult<(SupervisorReport, String)> {
        let mut invocations: u32 = 0;
        let mut step: u32 = 0;

        if let Some(instruction) = &self.planning_instruction {
            let rendered = render_scope(instruction, scope);
            let plan = FixedPlan::from_instruction(&rendered, &self.registry)?;
            step += 1;
            self.journal
                .planning_decision(step, &rendered, &format!("fixed plan: {}", plan.steps().join(" -> ")));
            debug!(target: "aok::supervisor", steps = ?plan.steps(), "fixed plan");

            for name in plan.steps() {
                if invocations >= self.max_agents_invocations {
                    return Ok((self.report(SupervisorState::BudgetExhausted, invocations), self.output_key.clone()));
                }
                self.invoke_agent(scope, name, &rendered).await?;
                invocations += 1;
            }

            let confirmed = match &self.planner {
                Some(planner) => planner
                    .confirm_completion(&self.planning_request(goal, scope, invocations))
                    .await
                    .map_err(planning_error)?,
                None => true,
            };
            if confirmed {
                return Ok((self.report(SupervisorState::Done, invocations), self.output_key.clone()));
            }
            debug!(target: "aok::supervisor", "fixed plan not confirmed, planning dynamically");
        }

        let planner = self.planner.as_ref().ok_or_else(|| {
            AgenticError::invalid_configuration("supervisor needs a planner to continue past its fixed plan")
        })?;

        loop {
            if invocations >= self.max_agents_invocations {
                return Ok((self.report(SupervisorState::BudgetExhausted, invocations), self.output_key.clone()));
            }

            step += 1;
            let request = self.planning_request(goal, scope, invocations);
            let decision = planner.plan(&request).await.map_err(planning_error)?;
            let raw = decision.to_raw();
            self.journal.planning_decision(step, &raw, &decision.to_string());
            debug!(target: "aok::supervisor", step, decision = %decision, "planning decision");

            match decision {
                PlannerDecision::Done { output_key } => {
                    let key = output_key.unwrap_or_else(|| self.output_key.clone());
                    return Ok((self.report(SupervisorState::Done, invocations), key));
                }
                PlannerDecision::Invoke { agent, arguments } => {
                    if !self.registry.contains(&agent) {
                        return Err(AgenticError::planning_failure(
                            format!("unknown agent '{}'", agent),
                            raw,
                        ));
                    }
                    scope.write_states(arguments);
                    self.invoke_agent(scope, &agent, &raw).await?;
                    invocations += 1;
                }
            }
        }
    }

    async fn invoke_agent(&self, scope: &AgenticScope, name: &str, raw: &str) -> AgenticResult<StateValue> {
        let invoker = self
            .registry
            .get(name)
            .ok_or_else(|| AgenticError::planning_failure(format!("unknown agent '{}'", name), raw))?;
        let output = invoker.invoke(scope).await?;
        self.journal.invocation(scope.last_invocation().as_ref());
        Ok(output)
    }

    fn planning_request(&self, goal: &str, scope: &AgenticScope, invocations: u32) -> PlanningRequest {
        PlanningRequest {
            goal: goal.to_string(),
            candidates: self.registry.descriptors().into_iter().cloned().collect(),
            ledger: scope.ledger(),
            remaining_budget: self.max_agents_invocations.saturating_sub(invocations),
        }
    }

    fn report(&self, state: SupervisorState, invocations: u32) -> SupervisorReport {
        SupervisorReport { state, invocations }
    }

    /// Final value: the response strategy over the ledger, then the scope
    /// value for the key, then (when the budget ran out) the latest output.
    fn select_result(&self, scope: &AgenticScope, output_key: &str, state: SupervisorState) -> AgenticResult<StateValue> {
        let ledger = scope.ledger();
        match select_response(&ledger, output_key, &self.response_strategy) {
            Ok(value) => Ok(value),
            Err(e) => {
                if let Some(value) = scope.read_state_opt(output_key) {
                    return Ok(value);
                }
                match (state, ledger.last()) {
                    (SupervisorState::BudgetExhausted, Some(last)) => Ok(last.output.clone()),
                    _ => Err(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentBuilder;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedPlanner {
        decisions: Mutex<Vec<PlannerDecision>>,
        seen: Mutex<Vec<PlanningRequest>>,
    }

    impl ScriptedPlanner {
        fn new(decisions: Vec<PlannerDecision>) -> Arc<Self> {
            Arc::new(Self {
                decisions: Mutex::new(decisions.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Planner for ScriptedPlanner {
        async fn plan(&self, request: &PlanningRequest) -> Result<PlannerDecision> {
            self.seen.lock().unwrap().push(request.clone());
            self.decisions
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| anyhow::anyhow!("script exhausted"))
        }
    }

    fn echo(name: &str, input: &str, output: &str) -> Arc<dyn Agent> {
        let tag = name.to_string();
        let key = input.to_string();
        Arc::new(
            AgentBuilder::new(name)
                .input(input)
                .output_name(output)
                .build(move |args| {
                    let text = format!("{}({})", tag, args.get(&key).map(|v| v.render()).unwrap_or_default());
                    async move { Ok(text) }
                })
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_dynamic_planning_until_done() {
        let planner = ScriptedPlanner::new(vec![
            PlannerDecision::invoke("outline"),
            PlannerDecision::invoke("draft"),
            PlannerDecision::done(),
        ]);
        let supervisor = SupervisorBuilder::new()
            .sub_agents([echo("outline", "request", "outline"), echo("draft", "outline", "draft")])
            .planner(planner.clone())
            .output_name("draft")
            .build()
            .unwrap();

        let run = supervisor.invoke("lighthouses").await.unwrap();
        assert_eq!(run.outcome, SupervisorReport { state: SupervisorState::Done, invocations: 2 });
        assert_eq!(run.result, StateValue::from("draft(outline(lighthouses))"));

        let seen = planner.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].goal, "lighthouses");
        assert!(seen[0].ledger.is_empty());
        assert_eq!(seen[2].ledger.len(), 2);
        assert_eq!(seen[2].remaining_budget, 8);
    }

    #[tokio::test]
    async fn test_planner_arguments_written_before_invoke() {
        let planner = ScriptedPlanner::new(vec![
            PlannerDecision::invoke("outline").with_argument("request", "dragons"),
            PlannerDecision::done_with("outline"),
        ]);
        let supervisor = SupervisorBuilder::new()
            .sub_agent(echo("outline", "request", "outline"))
            .planner(planner)
            .output_name("draft")
            .build()
            .unwrap();

        let run = supervisor.invoke("lighthouses").await.unwrap();
        assert_eq!(run.result, StateValue::from("outline(dragons)"));
        assert_eq!(run.scope.invocations("outline")[0].input["request"], StateValue::from("dragons"));
    }

    #[tokio::test]
    async fn test_unknown_agent_is_planning_failure() {
        let planner = ScriptedPlanner::new(vec![PlannerDecision::invoke("translate")]);
        let supervisor = SupervisorBuilder::new()
            .sub_agent(echo("outline", "request", "outline"))
            .planner(planner)
            .output_name("outline")
            .build()
            .unwrap();

        let scope = AgenticScope::new();
        let err = supervisor.invoke_with_scope(scope.clone(), "x").await.unwrap_err();
        match err {
            AgenticError::PlanningFailure { reason, raw } => {
                assert!(reason.contains("translate"));
                assert!(raw.contains("\"agent\":\"translate\""));
            }
            other => panic!("Expected PlanningFailure, got {:?}", other),
        }
        assert_eq!(scope.read_state(REQUEST_KEY, "").unwrap(), "x");
        assert!(scope.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_planner_transport_error_is_planning_failure() {
        let planner = ScriptedPlanner::new(vec![]);
        let supervisor = SupervisorBuilder::new()
            .sub_agent(echo("outline", "request", "outline"))
            .planner(planner)
            .output_name("outline")
            .build()
            .unwrap();

        let err = supervisor.invoke("x").await.unwrap_err();
        assert!(err.is_planning_failure());
        assert!(err.to_string().contains("script exhausted"));
    }

    #[tokio::test]
    async fn test_request_generator_sets_goal() {
        let planner = ScriptedPlanner::new(vec![PlannerDecision::invoke("outline"), PlannerDecision::done()]);
        let supervisor = SupervisorBuilder::new()
            .sub_agent(echo("outline", "request", "outline"))
            .planner(planner.clone())
            .request_generator(|scope| {
                format!("Write about {}", scope.read_state("topic", "nothing").unwrap_or_default())
            })
            .output_name("outline")
            .build()
            .unwrap();

        let mut seed = Arguments::new();
        seed.insert("topic".to_string(), StateValue::from("tides"));
        let run = supervisor.invoke_with_state(seed).await.unwrap();

        assert_eq!(run.result, StateValue::from("outline(Write about tides)"));
        assert_eq!(planner.seen.lock().unwrap()[0].goal, "Write about tides");
    }

    #[tokio::test]
    async fn test_invoke_with_state_requires_generator() {
        let supervisor = SupervisorBuilder::new()
            .sub_agent(echo("outline", "request", "outline"))
            .planning_instruction("outline")
            .output_name("outline")
            .build()
            .unwrap();

        let err = supervisor.invoke_with_state(Arguments::new()).await.unwrap_err();
        assert!(matches!(err, AgenticError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn test_unconfirmed_fixed_plan_falls_back_to_planner() {
        struct Unconvinced;

        #[async_trait]
        impl Planner for Unconvinced {
            async fn plan(&self, _request: &PlanningRequest) -> Result<PlannerDecision> {
                Ok(PlannerDecision::invoke("outline"))
            }

            async fn confirm_completion(&self, _request: &PlanningRequest) -> Result<bool> {
                Ok(false)
            }
        }

        let supervisor = SupervisorBuilder::new()
            .sub_agent(echo("outline", "request", "outline"))
            .planner(Arc::new(Unconvinced))
            .planning_instruction("outline once")
            .max_agents_invocations(3)
            .output_name("outline")
            .build()
            .unwrap();

        let run = supervisor.invoke("x").await.unwrap();
        assert_eq!(run.outcome.state, SupervisorState::BudgetExhausted);
        assert_eq!(run.outcome.invocations, 3);
        assert_eq!(run.scope.invocations("outline").len(), 3);
    }

    #[test]
    fn test_builder_validation() {
        let no_output = SupervisorBuilder::new()
            .sub_agent(echo("a", "request", "a"))
            .planning_instruction("a")
            .build();
        assert!(matches!(no_output, Err(AgenticError::InvalidConfiguration(_))));

        let no_planner = SupervisorBuilder::new()
            .sub_agent(echo("a", "request", "a"))
            .output_name("a")
            .build();
        assert!(matches!(no_planner, Err(AgenticError::InvalidConfiguration(_))));

        let zero_budget = SupervisorBuilder::new()
            .sub_agent(echo("a", "request", "a"))
            .planning_instruction("a")
            .max_agents_invocations(0)
            .output_name("a")
            .build();
        assert!(matches!(zero_budget, Err(AgenticError::InvalidConfiguration(_))));

        let duplicate = SupervisorBuilder::new()
            .sub_agents([echo("a", "request", "a"), echo("a", "request", "b")])
            .planning_instruction("a")
            .output_name("a")
            .build();
        assert!(matches!(duplicate, Err(AgenticError::DuplicateAgent { .. })));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_config() {
        let mut config = Configuration::default();
        config.supervisor.max_agents_invocations = 4;
        config.supervisor.response_strategy = "first".to_string();
        config.supervisor.planning_instruction = Some("a".to_string());
        config.supervisor.output_name = Some("a".to_string());

        let supervisor = SupervisorBuilder::from_config(&config)
            .unwrap()
            .sub_agent(echo("a", "request", "a"))
            .build()
            .unwrap();
        assert_eq!(supervisor.max_agents_invocations(), 4);
        assert_eq!(supervisor.output_key(), "a");
    }
}
