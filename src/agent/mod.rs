//! Agents - named units of work over a scope.
//!
//! An agent declares which scope keys it reads and which key it writes
//! ([`AgentDescriptor`]); the callable itself is stateless. Three kinds ship
//! with the crate:
//!
//! - [`FnAgent`] wraps an async closure (built with [`AgentBuilder::build`])
//! - [`LlmAgent`] renders a prompt and calls a [`crate::provider::ChatModel`]
//! - [`crate::workflow::LoopAgent`] is a composite running other agents
//!
//! Agents are always run through an [`AgentInvoker`], which resolves inputs
//! from scope, writes the output back and appends the ledger record.
//!
//! # Quick Start
//!
//! ```
//! use aok::agent::{AgentBuilder, AgentInvoker};
//! use aok::{AgenticScope, StateValue};
//! use std::sync::Arc;
//!
//! # async fn example() -> aok::AgenticResult<()> {
//! let shout = AgentBuilder::new("shout")
//!     .description("Upper-cases the text")
//!     .input("text")
//!     .output_name("loud")
//!     .build(|args| async move {
//!         let text = args.get("text").map(|v| v.render()).unwrap_or_default();
//!         Ok(StateValue::from(text.to_uppercase()))
//!     })?;
//!
//! let scope = AgenticScope::new();
//! scope.write_state("text", "hello");
//!
//! let invoker = AgentInvoker::new(Arc::new(shout));
//! invoker.invoke(&scope).await?;
//! assert_eq!(scope.read_state("loud", "")?, "HELLO");
//! # Ok(())
//! # }
//! ```

mod descriptor;
mod function;
mod invoker;
mod llm;
mod registry;

pub use descriptor::{AgentDescriptor, InputKey};
pub use function::{AgentBuilder, FnAgent};
pub use invoker::AgentInvoker;
pub use llm::{LlmAgent, OutputKind};
pub(crate) use llm::extract_json_object;
pub use registry::AgentRegistry;

use crate::scope::{AgenticScope, Arguments, StateValue};
use anyhow::Result;
use async_trait::async_trait;

/// A callable unit of work.
///
/// `execute` receives the inputs already resolved by the invoker. Composite
/// agents additionally use `scope` to drive their sub-agents; leaf agents
/// should not write to it directly.
#[async_trait]
pub trait Agent: Send + Sync {
	/// Declared contract of this agent.
	fn descriptor(&self) -> &AgentDescriptor;

	/// Run the agent and return the value for its output key.
	async fn execute(&self, arguments: &Arguments, scope: &AgenticScope) -> Result<StateValue>;

	/// Agent name, shorthand for `descriptor().name`.
	fn name(&self) -> &str {
		&self.descriptor().name
	}

	/// Output key, shorthand for `descriptor().output_key`.
	fn output_key(&self) -> &str {
		&self.descriptor().output_key
	}
}
