//! Backend drivers, one per provider family.

#[cfg(feature = "provider-anthropic")]
pub mod anthropic;
#[cfg(feature = "provider-ollama")]
pub mod ollama;
#[cfg(feature = "provider-openai")]
pub mod openai;

#[cfg(any(feature = "provider-openai", feature = "provider-ollama"))]
use serde_json::{Value, json};

use crate::{ProviderConstructor, ProviderId};
#[cfg(any(feature = "provider-openai", feature = "provider-ollama"))]
use crate::ToolDeclaration;

/// Constructor table for every provider compiled into this build.
pub fn builtin_constructors() -> Vec<(ProviderId, ProviderConstructor)> {
    let mut constructors: Vec<(ProviderId, ProviderConstructor)> = Vec::new();

    #[cfg(feature = "provider-openai")]
    {
        for id in [
            ProviderId::OpenAi,
            ProviderId::Google,
            ProviderId::DeepSeek,
            ProviderId::Zhipu,
            ProviderId::OpenRouter,
        ] {
            constructors.push((id, openai::OpenAiCompatibleProvider::construct));
        }
        constructors.push((ProviderId::Doubao, openai::OpenAiCompatibleProvider::construct_doubao));
    }

    #[cfg(feature = "provider-anthropic")]
    constructors.push((ProviderId::Anthropic, anthropic::AnthropicProvider::construct));

    #[cfg(feature = "provider-ollama")]
    constructors.push((ProviderId::Ollama, ollama::OllamaProvider::construct));

    constructors
}

/// Tool entry in the OpenAI `function` dialect, shared with Ollama.
#[cfg(any(feature = "provider-openai", feature = "provider-ollama"))]
pub(crate) fn function_tool(declaration: &ToolDeclaration) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": declaration.name,
            "description": declaration.description,
            "parameters": declaration.parameters.to_json_schema(),
        }
    })
}
