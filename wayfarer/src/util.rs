//! Small convenience constructors for common types.

use std::sync::Arc;

use crate::{
    AdapterFactory, ChatContext, HistoryWindow, Message, ProviderId, SafeChatHooks,
    ToolRegistry, TracingChatHooks, render_system_prompt,
};

pub fn user_message(content: impl Into<String>) -> Message {
    Message::user(content)
}

pub fn assistant_message(content: impl Into<String>) -> Message {
    Message::assistant(content)
}

/// Parses a provider id, also accepting common aliases.
pub fn parse_provider_id(value: &str) -> Option<ProviderId> {
    match value.trim().to_ascii_lowercase().as_str() {
        "claude" => Some(ProviderId::Anthropic),
        "gemini" => Some(ProviderId::Google),
        "glm" | "bigmodel" => Some(ProviderId::Zhipu),
        "local" => Some(ProviderId::Ollama),
        "ark" | "volcengine" => Some(ProviderId::Doubao),
        other => other.parse().ok(),
    }
}

/// Factory wired the way most applications want it: tracing hooks isolated
/// from panics, the travel persona prompt and the default history window.
pub fn travel_factory(tools: ToolRegistry, context: &ChatContext) -> AdapterFactory {
    AdapterFactory::new(Arc::new(tools))
        .with_hooks(Arc::new(SafeChatHooks::new(TracingChatHooks)))
        .with_system_prompt(render_system_prompt(context))
        .with_history_window(HistoryWindow::default())
}

#[cfg(test)]
mod tests {
    use crate::{ProviderConfig, ProviderId, Role};

    use super::*;

    #[test]
    fn parse_provider_id_supports_aliases() {
        assert_eq!(parse_provider_id("openai"), Some(ProviderId::OpenAi));
        assert_eq!(parse_provider_id(" Claude "), Some(ProviderId::Anthropic));
        assert_eq!(parse_provider_id("GLM"), Some(ProviderId::Zhipu));
        assert_eq!(parse_provider_id("openrouter"), Some(ProviderId::OpenRouter));
        assert_eq!(parse_provider_id("mistral"), None);
    }

    #[test]
    fn message_helpers_apply_roles() {
        assert_eq!(user_message("hello").role, Role::User);
        assert_eq!(assistant_message("hi").role, Role::Assistant);
    }

    #[test]
    fn travel_factory_builds_configured_adapters() {
        let factory = travel_factory(ToolRegistry::new(), &ChatContext::default().with_days(3));
        let adapter = factory
            .get_or_create(ProviderConfig::new(ProviderId::Ollama, ""))
            .expect("ollama should build");

        assert_eq!(adapter.provider_id(), ProviderId::Ollama);
        assert!(factory.current().is_some());
    }
}
