//! Model provider abstraction.
//!
//! The completion provider is an external collaborator: this crate only
//! defines the call it makes. Transport, credentials and retries belong to
//! the implementation behind the trait.

use anyhow::Result;
use async_trait::async_trait;

/// A single completion request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    /// Optional system prompt.
    pub system: Option<String>,
    /// User message.
    pub user: String,
}

impl ChatRequest {
    /// Request with only a user message.
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            system: None,
            user: message.into(),
        }
    }

    /// Attach a system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Core trait for a completion provider
///
/// Used both by [`crate::agent::LlmAgent`] for individual agent work and by
/// [`crate::supervisor::LlmPlanner`] for planning decisions. Calls are
/// treated as blocking black boxes; any timeout belongs to the transport.
///
/// # Example
///
/// ```ignore
/// use aok::provider::{ChatModel, ChatRequest};
///
/// async fn ask(model: &dyn ChatModel) -> anyhow::Result<String> {
///     model.chat(ChatRequest::user("Write a haiku about lighthouses")).await
/// }
/// ```
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Produce a free-text completion.
    async fn chat(&self, request: ChatRequest) -> Result<String>;

    /// Model identifier for logs.
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoModel;

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn chat(&self, request: ChatRequest) -> Result<String> {
            Ok(format!(
                "{}|{}",
                request.system.unwrap_or_default(),
                request.user
            ))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_chat_request_builder() {
        let model = EchoModel;
        let reply = model
            .chat(ChatRequest::user("hello").with_system("be brief"))
            .await
            .unwrap();
        assert_eq!(reply, "be brief|hello");
        assert_eq!(model.model_name(), "echo");
    }

    #[test]
    fn test_dyn_chat_model() {
        fn takes_dyn(_model: &dyn ChatModel) {}
        takes_dyn(&EchoModel);
    }
}
