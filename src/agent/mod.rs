//! Conversational-agent seam and translator.
//!
//! The agent backend is an opaque request/response service: one request
//! string in, one reply out. [`Translator`] composes the instruction prefix
//! with the source text and treats anything other than a non-empty reply as
//! failure. Single attempt per call, no timeout beyond the transport's own.

use crate::types::{Error, Result, TranslatorConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Separator between the instruction prefix and the source text
/// ("the content follows:").
const PROMPT_SEPARATOR: &str = "\n\n内容如下：\n";

/// Reply from a conversational agent. Shapes vary per backend, so every
/// field is optional; absence of `speech` counts as failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Plain-text reply, if the agent produced one.
    #[serde(default)]
    pub speech: Option<String>,

    /// Backend-reported error, if any.
    #[serde(default)]
    pub error: Option<String>,
}

/// Outbound call into the host's conversational-agent capability.
#[async_trait]
pub trait ConversationAgent: Send + Sync {
    /// Send `text` to the agent identified by `agent_id`.
    ///
    /// Transport errors are returned as `Err`; a delivered-but-unusable
    /// reply comes back as `Ok` with a partial [`AgentResponse`].
    async fn converse(&self, text: &str, agent_id: &str) -> Result<AgentResponse>;
}

/// Composes translation prompts and delegates to a [`ConversationAgent`].
pub struct Translator {
    agent: Arc<dyn ConversationAgent>,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator").finish_non_exhaustive()
    }
}

impl Translator {
    pub fn new(agent: Arc<dyn ConversationAgent>) -> Self {
        Self { agent }
    }

    /// Translate `text` using the agent and prompt from `config`.
    ///
    /// Returns the non-empty translated string, or an error for transport
    /// failures, backend errors, and empty replies alike.
    pub async fn translate(&self, config: &TranslatorConfig, text: &str) -> Result<String> {
        let request = format!("{}{}{}", config.prompt, PROMPT_SEPARATOR, text);

        let response = self.agent.converse(&request, &config.agent_id).await?;

        if let Some(error) = response.error {
            return Err(Error::agent(error));
        }

        match response.speech {
            Some(speech) if !speech.trim().is_empty() => Ok(speech),
            _ => Err(Error::EmptyTranslation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    /// Agent that records requests and returns a canned response.
    struct ScriptedAgent {
        response: AgentResponse,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedAgent {
        fn replying(speech: &str) -> Self {
            Self {
                response: AgentResponse {
                    speech: Some(speech.to_string()),
                    error: None,
                },
                requests: Mutex::new(Vec::new()),
            }
        }

        fn with_response(response: AgentResponse) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ConversationAgent for ScriptedAgent {
        async fn converse(&self, text: &str, agent_id: &str) -> Result<AgentResponse> {
            self.requests
                .lock()
                .await
                .push((text.to_string(), agent_id.to_string()));
            Ok(self.response.clone())
        }
    }

    #[tokio::test]
    async fn test_prompt_composition() {
        let agent = Arc::new(ScriptedAgent::replying("修复了问题X"));
        let translator = Translator::new(agent.clone());
        let config = TranslatorConfig::new("conversation.glm");

        let result = translator.translate(&config, "Fixed bug X").await.unwrap();
        assert_eq!(result, "修复了问题X");

        let requests = agent.requests.lock().await;
        assert_eq!(requests.len(), 1);
        let (request, agent_id) = &requests[0];
        assert!(request.starts_with(&config.prompt));
        assert!(request.ends_with("内容如下：\nFixed bug X"));
        assert_eq!(agent_id, "conversation.glm");
    }

    #[tokio::test]
    async fn test_empty_speech_is_failure() {
        let agent = Arc::new(ScriptedAgent::replying("   "));
        let translator = Translator::new(agent);
        let config = TranslatorConfig::new("conversation.glm");

        let result = translator.translate(&config, "Fixed bug X").await;
        assert!(matches!(result, Err(Error::EmptyTranslation)));
    }

    #[tokio::test]
    async fn test_missing_speech_is_failure() {
        let agent = Arc::new(ScriptedAgent::with_response(AgentResponse::default()));
        let translator = Translator::new(agent);
        let config = TranslatorConfig::new("conversation.glm");

        let result = translator.translate(&config, "Fixed bug X").await;
        assert!(matches!(result, Err(Error::EmptyTranslation)));
    }

    #[tokio::test]
    async fn test_backend_error_is_failure() {
        let agent = Arc::new(ScriptedAgent::with_response(AgentResponse {
            speech: Some("partial".to_string()),
            error: Some("model overloaded".to_string()),
        }));
        let translator = Translator::new(agent);
        let config = TranslatorConfig::new("conversation.glm");

        let result = translator.translate(&config, "Fixed bug X").await;
        assert!(matches!(result, Err(Error::Agent(_))));
    }

    #[test]
    fn test_partial_response_deserializes() {
        // Backends with unknown shapes must not break deserialization
        let response: AgentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.speech.is_none());
        assert!(response.error.is_none());
    }
}
