//! Configuration structures.
//!
//! Configuration is supplied by the host at setup time and may be replaced at
//! runtime via [`crate::TranslationCoordinator::update_config`], so option
//! changes take effect without a restart.

use serde::{Deserialize, Serialize};

/// Built-in instruction prefix: translate software update summaries into
/// concise idiomatic Chinese, keep version numbers and proper nouns, output
/// the translation only.
pub const DEFAULT_PROMPT: &str = "你是一位专业的软件更新日志翻译专家。请将以下软件更新摘要翻译为简洁、地道的中文。\
保留版本号和关键专有名词（如集成名称、组件名称）。\
输出结果仅包含翻译后的文本，不要有任何开场白或解释。";

/// Translator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Identifier of the conversational agent that performs translations.
    pub agent_id: String,

    /// Instruction prefix prepended to every translation request.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Re-apply the cached translation when the upstream integration reverts
    /// the entity's `release_summary` attribute.
    #[serde(default = "default_replace_original")]
    pub replace_original: bool,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_replace_original() -> bool {
    true
}

impl TranslatorConfig {
    /// Configuration with the built-in prompt for the given agent.
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            prompt: default_prompt(),
            replace_original: true,
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_applied() {
        let config = TranslatorConfig::new("conversation.glm");
        assert_eq!(config.agent_id, "conversation.glm");
        assert_eq!(config.prompt, DEFAULT_PROMPT);
        assert!(config.replace_original);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: TranslatorConfig =
            serde_json::from_str(r#"{"agent_id": "conversation.glm"}"#).unwrap();
        assert_eq!(config.prompt, DEFAULT_PROMPT);
        assert!(config.replace_original);
    }
}
