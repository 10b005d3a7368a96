//! Ollama `/api/chat` payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::function_tool;
use crate::{ModelRequest, ModelResponse, ProviderError, ProviderId, TokenUsage, ToolCall};

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<SamplingOptions>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SamplingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

pub(crate) fn build_api_request(request: ModelRequest, include_tools: bool, stream: bool) -> ChatRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system_prompt) = request.system_prompt {
        messages.push(ApiMessage {
            role: "system",
            content: system_prompt,
        });
    }
    messages.extend(request.messages.into_iter().map(|message| ApiMessage {
        role: message.role.as_str(),
        content: message.content,
    }));

    let tools = (include_tools && !request.tools.is_empty())
        .then(|| request.tools.iter().map(function_tool).collect::<Vec<_>>());

    let options = (!request.options.is_empty()).then_some(SamplingOptions {
        temperature: request.options.temperature,
        num_predict: request.options.max_tokens,
    });

    ChatRequest {
        model: request.model,
        messages,
        tools,
        options,
        stream,
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub message: ResponseMessage,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseToolCall {
    pub function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

pub(crate) fn parse_response(requested_model: String, body: &str) -> Result<ModelResponse, ProviderError> {
    let parsed = serde_json::from_str::<ChatResponse>(body).map_err(|err| {
        ProviderError::malformed_response(format!("ollama response is not a chat message: {err}"))
    })?;

    let tool_calls = parsed
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, call)| ToolCall {
            id: format!("call_{index}"),
            name: call.function.name,
            arguments: match call.function.arguments {
                Value::Null => "{}".to_string(),
                arguments => arguments.to_string(),
            },
        })
        .collect::<Vec<_>>();

    Ok(ModelResponse {
        provider: ProviderId::Ollama,
        model: parsed.model.unwrap_or(requested_model),
        content: parsed.message.content,
        tool_calls,
        usage: TokenUsage {
            input_tokens: parsed.prompt_eval_count.unwrap_or_default(),
            output_tokens: parsed.eval_count.unwrap_or_default(),
        },
    })
}
