//! Planning collaborator for the supervisor.

use crate::agent::{extract_json_object, AgentDescriptor, OutputKind};
use crate::error::AgenticError;
use crate::provider::{ChatModel, ChatRequest};
use crate::scope::{AgentInvocation, Arguments, StateValue};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Everything the planner sees at one planning step.
#[derive(Debug, Clone)]
pub struct PlanningRequest {
    /// Natural-language goal of the run.
    pub goal: String,
    /// Agents the supervisor can invoke.
    pub candidates: Vec<AgentDescriptor>,
    /// Invocations so far, in global order.
    pub ledger: Vec<AgentInvocation>,
    /// Invocations left before the budget runs out.
    pub remaining_budget: u32,
}

/// One planning decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum PlannerDecision {
    /// Invoke `agent`, first writing `arguments` into scope.
    Invoke {
        /// Name of a registered agent.
        agent: String,
        /// Values to write into scope before the call.
        arguments: Arguments,
    },
    /// The goal is met. `output_key` overrides the supervisor's output name.
    Done {
        /// Scope key holding the final answer, if the planner names one.
        #[serde(skip_serializing_if = "Option::is_none")]
        output_key: Option<String>,
    },
}

impl PlannerDecision {
    /// Invoke an agent without extra arguments.
    pub fn invoke(agent: impl Into<String>) -> Self {
        Self::Invoke {
            agent: agent.into(),
            arguments: Arguments::new(),
        }
    }

    /// Finish, using the supervisor's output name.
    pub fn done() -> Self {
        Self::Done { output_key: None }
    }

    /// Finish, reading the answer from `output_key`.
    pub fn done_with(output_key: impl Into<String>) -> Self {
        Self::Done {
            output_key: Some(output_key.into()),
        }
    }

    /// Add a scope argument to an `Invoke` decision.
    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<StateValue>) -> Self {
        if let Self::Invoke { arguments, .. } = &mut self {
            arguments.insert(key.into(), value.into());
        }
        self
    }

    /// Decision as JSON text, the form planners exchange.
    pub fn to_raw(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
    }

    /// Interpret a JSON decision.
    ///
    /// Accepts `{"action":"invoke","agent":..,"arguments":{..}}` and
    /// `{"action":"done","output_key":..}`; anything else is a
    /// planning failure carrying `raw`.
    pub fn from_json(value: &Value, raw: &str) -> Result<Self, AgenticError> {
        let object = value
            .as_object()
            .ok_or_else(|| AgenticError::planning_failure("decision is not a JSON object", raw))?;
        let action = object
            .get("action")
            .and_then(Value::as_str)
            .ok_or_else(|| AgenticError::planning_failure("decision has no action", raw))?;

        match action.to_lowercase().as_str() {
            "invoke" => {
                let agent = object
                    .get("agent")
                    .and_then(Value::as_str)
                    .filter(|name| !name.trim().is_empty())
                    .ok_or_else(|| AgenticError::planning_failure("invoke decision has no agent", raw))?;
                let arguments = match object.get("arguments") {
                    None | Some(Value::Null) => Arguments::new(),
                    Some(Value::Object(map)) => map
                        .iter()
                        .map(|(k, v)| (k.clone(), StateValue::from(v.clone())))
                        .collect(),
                    Some(_) => {
                        return Err(AgenticError::planning_failure(
                            "invoke arguments must be a JSON object",
                            raw,
                        ))
                    }
                };
                Ok(Self::Invoke {
                    agent: agent.to_string(),
                    arguments,
                })
            }
            "done" => Ok(Self::Done {
                output_key: object
                    .get("output_key")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            other => Err(AgenticError::planning_failure(
                format!("unknown action '{}'", other),
                raw,
            )),
        }
    }
}

impl fmt::Display for PlannerDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoke { agent, arguments } if arguments.is_empty() => write!(f, "invoke {}", agent),
            Self::Invoke { agent, arguments } => {
                let keys: Vec<&str> = arguments.keys().map(String::as_str).collect();
                write!(f, "invoke {} with {}", agent, keys.join(", "))
            }
            Self::Done { output_key: Some(key) } => write!(f, "done ({})", key),
            Self::Done { output_key: None } => write!(f, "done"),
        }
    }
}

/// Chooses the supervisor's next step.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Decide what to do next.
    ///
    /// Returning an [`AgenticError`] (wrapped in `anyhow`) keeps its
    /// classification; any other error becomes a planning failure.
    async fn plan(&self, request: &PlanningRequest) -> Result<PlannerDecision>;

    /// Whether a completed fixed plan has met the goal.
    async fn confirm_completion(&self, _request: &PlanningRequest) -> Result<bool> {
        Ok(true)
    }
}

const PLANNER_SYSTEM_MESSAGE: &str = "You are the planner of a team of agents. \
At each step you either pick one agent to invoke next or declare the goal met. \
Reply with a single JSON object and nothing else: \
{\"action\":\"invoke\",\"agent\":\"<name>\",\"arguments\":{\"<key>\":<value>}} \
or {\"action\":\"done\",\"output_key\":\"<key holding the answer>\"}.";

/// A planner backed by a chat model.
pub struct LlmPlanner {
    model: Arc<dyn ChatModel>,
    system_message: String,
}

impl fmt::Debug for LlmPlanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmPlanner")
            .field("model", &self.model.model_name())
            .finish_non_exhaustive()
    }
}

impl LlmPlanner {
    /// Planner using the default planning prompt.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            system_message: PLANNER_SYSTEM_MESSAGE.to_string(),
        }
    }

    /// Replace the planning system prompt.
    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = system_message.into();
        self
    }

    /// Render the user prompt for one planning step.
    pub fn render_prompt(&self, request: &PlanningRequest) -> String {
        let agents: Vec<Value> = request.candidates.iter().map(|d| d.to_planner_json()).collect();
        let agents = serde_json::to_string_pretty(&agents).unwrap_or_default();

        let history = if request.ledger.is_empty() {
            "(none)".to_string()
        } else {
            request
                .ledger
                .iter()
                .map(|r| format!("- {}", r.summary()))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "Goal: {}\n\nAvailable agents:\n{}\n\nInvocations so far:\n{}\n\nInvocations left: {}\n\nWhat is the next step?",
            request.goal, agents, history, request.remaining_budget
        )
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn plan(&self, request: &PlanningRequest) -> Result<PlannerDecision> {
        let chat = ChatRequest::user(self.render_prompt(request)).with_system(self.system_message.clone());
        let reply = self
            .model
            .chat(chat)
            .await
            .with_context(|| format!("planning with {}", self.model.model_name()))?;
        debug!(target: "aok::supervisor", reply = %reply, "planner reply");

        let json = extract_json_object(&reply)
            .ok_or_else(|| AgenticError::planning_failure("reply contains no JSON object", &reply))?;
        let value: Value = serde_json::from_str(json)
            .map_err(|e| AgenticError::planning_failure(format!("malformed JSON: {}", e), &reply))?;
        let decision = PlannerDecision::from_json(&value, &reply)?;

        if let PlannerDecision::Invoke { agent, .. } = &decision {
            if !request.candidates.iter().any(|d| &d.name == agent) {
                return Err(AgenticError::planning_failure(format!("unknown agent '{}'", agent), &reply).into());
            }
        }
        Ok(decision)
    }

    async fn confirm_completion(&self, request: &PlanningRequest) -> Result<bool> {
        let history = request
            .ledger
            .iter()
            .map(|r| format!("- {}", r.summary()))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!(
            "Goal: {}\n\nInvocations so far:\n{}\n\nHas the goal been met? Answer yes or no.",
            request.goal, history
        );
        let reply = self.model.chat(ChatRequest::user(prompt)).await?;
        let answer = OutputKind::Boolean
            .parse(&reply)
            .map_err(|e| AgenticError::planning_failure(format!("completion check: {}", e), &reply))?;
        Ok(answer.as_bool().unwrap_or(false))
    }
}
