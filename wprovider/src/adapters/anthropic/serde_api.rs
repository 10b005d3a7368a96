//! Messages API payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{ModelRequest, ModelResponse, ProviderError, ProviderId, Role, TokenUsage, ToolCall};

#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiMessage {
    pub role: &'static str,
    pub content: String,
}

/// System-role messages are folded into the top-level `system` field.
pub(crate) fn build_api_request(request: ModelRequest, stream: bool) -> MessagesRequest {
    let max_tokens = request.max_tokens();
    let mut system_parts = request.system_prompt.into_iter().collect::<Vec<_>>();
    let mut messages = Vec::with_capacity(request.messages.len());

    for message in request.messages {
        match message.role {
            Role::System => system_parts.push(message.content),
            role => messages.push(ApiMessage {
                role: role.as_str(),
                content: message.content,
            }),
        }
    }

    let tools = (!request.tools.is_empty()).then(|| {
        request
            .tools
            .iter()
            .map(|declaration| {
                json!({
                    "name": declaration.name,
                    "description": declaration.description,
                    "input_schema": declaration.parameters.to_json_schema(),
                })
            })
            .collect::<Vec<_>>()
    });

    MessagesRequest {
        model: request.model,
        max_tokens,
        messages,
        system: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
        temperature: request.options.temperature,
        tools,
        stream,
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub content: Vec<ResponseBlock>,
    #[serde(default)]
    pub usage: Option<ResponseUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ResponseBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

pub(crate) fn parse_response(requested_model: String, body: &str) -> Result<ModelResponse, ProviderError> {
    let parsed = serde_json::from_str::<MessagesResponse>(body).map_err(|err| {
        ProviderError::malformed_response(format!("anthropic response is not a message: {err}"))
    })?;

    let mut content = String::new();
    let mut tool_calls = Vec::new();
    for block in parsed.content {
        match block {
            ResponseBlock::Text { text } => content.push_str(&text),
            ResponseBlock::ToolUse { id, name, input } => tool_calls.push(ToolCall {
                id,
                name,
                arguments: input.to_string(),
            }),
            ResponseBlock::Other => {}
        }
    }

    let usage = parsed
        .usage
        .map(|usage| TokenUsage {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
        })
        .unwrap_or_default();

    Ok(ModelResponse {
        provider: ProviderId::Anthropic,
        model: parsed.model.unwrap_or(requested_model),
        content,
        tool_calls,
        usage,
    })
}
