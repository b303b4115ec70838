//! Agent Orchestration Kit (AOK) - coordinating agents over shared state
//!
//! AOK runs named agents against a per-run [`AgenticScope`] (a key/value
//! state map plus a ledger of every invocation) under two strategies:
//!
//! - **`workflow`** - a loop repeating an ordered list of agents until an
//!   exit condition holds between passes, bounded by a pass limit
//! - **`supervisor`** - a plan/invoke cycle where a planner picks the next
//!   agent until it declares the goal met or the invocation budget runs out
//!
//! Supporting modules:
//!
//! - **`agent`** - the agent trait, closure and model-backed agents, and the
//!   invoker that resolves inputs and records results
//! - **`response`** - strategies for picking the final value from the ledger
//! - **`config`** - TOML configuration and `.env` loading (feature `config`)
//! - **`observability`** - markdown run log (feature `observability`)
//!
//! # Features
//!
//! ```toml
//! [dependencies]
//! aok = { version = "0.1", default-features = false }
//! # Or enable the ambient modules:
//! aok = { version = "0.1", features = ["config", "observability"] }
//! ```
//!
//! # Example: a review loop
//!
//! ```
//! use aok::agent::{Agent, AgentBuilder};
//! use aok::workflow::LoopBuilder;
//! use aok::{AgenticScope, Arguments, StateValue};
//! use std::sync::Arc;
//!
//! # async fn example() -> aok::AgenticResult<()> {
//! let scorer = AgentBuilder::new("scoreStyle")
//!     .input("story")
//!     .output_name("score")
//!     .build(|args| async move {
//!         let words = args["story"].render().split_whitespace().count();
//!         Ok(StateValue::from(words as f64 / 10.0))
//!     })?;
//! let editor = AgentBuilder::new("editStory")
//!     .input("story")
//!     .output_name("story")
//!     .build(|args| async move { Ok(format!("{} again", args["story"])) })?;
//!
//! let review = LoopBuilder::new("styleReviewLoop")
//!     .sub_agents([Arc::new(scorer) as Arc<dyn Agent>, Arc::new(editor)])
//!     .max_iterations(5)
//!     .exit_condition(|scope| scope.read_state("score", 0.0).unwrap_or(0.0) >= 0.8)
//!     .build()?;
//!
//! let mut seed = Arguments::new();
//! seed.insert("story".to_string(), StateValue::from("once upon a time"));
//! let run = review.invoke_with_state(seed).await?;
//! println!("{} after {} passes", run.result, run.outcome.passes);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Agents, their descriptors and the invoker
pub mod agent;

/// Error types
pub mod error;

/// Chat model abstraction used by model-backed agents and planners
pub mod provider;

/// Response selection strategies
pub mod response;

/// Run results
pub mod result;

/// Shared state and invocation ledger
pub mod scope;

/// Supervisor controller
pub mod supervisor;

/// Placeholder interpolation for prompts and instructions
pub mod template;

/// Loop controller
pub mod workflow;

/// Configuration management (enabled with the `config` feature)
#[cfg(feature = "config")]
pub mod config;

/// Observability utilities (enabled with the `observability` feature)
#[cfg(feature = "observability")]
pub mod observability;

mod journal;

pub use error::{AgenticError, AgenticResult};
pub use response::ResponseStrategy;
pub use result::ResultWithScope;
pub use scope::{AgentInvocation, AgenticScope, Arguments, StateValue, ValueKind};
pub use supervisor::{SupervisorReport, SupervisorState};
pub use workflow::{LoopReport, LoopState};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::agent::{Agent, AgentBuilder, AgentDescriptor, AgentInvoker, InputKey, LlmAgent, OutputKind};
    pub use crate::error::{AgenticError, AgenticResult};
    pub use crate::provider::{ChatModel, ChatRequest};
    pub use crate::response::{select_response, ResponseStrategy};
    pub use crate::result::ResultWithScope;
    pub use crate::scope::{AgentInvocation, AgenticScope, Arguments, StateValue, ValueKind};
    pub use crate::supervisor::{
        LlmPlanner, Planner, PlannerDecision, PlanningRequest, SupervisorAgent, SupervisorBuilder,
        SupervisorReport, SupervisorState,
    };
    pub use crate::workflow::{LoopAgent, LoopBuilder, LoopReport, LoopState};

    #[cfg(feature = "config")]
    pub use crate::config::{Configuration, ConfigurationLoader, EnvironmentLoader};

    #[cfg(feature = "observability")]
    pub use crate::observability::Logger;
}
