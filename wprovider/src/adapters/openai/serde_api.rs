//! Chat-completions payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::adapters::function_tool;
use crate::{ModelRequest, ModelResponse, ProviderError, ProviderId, TokenUsage, ToolCall};

use super::provider::SamplingExtras;

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ApiMessage {
    pub role: &'static str,
    pub content: String,
}

pub(crate) fn build_api_request(
    request: ModelRequest,
    sampling: Option<SamplingExtras>,
    stream: bool,
) -> ChatCompletionRequest {
    let max_tokens = Some(request.max_tokens());
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

    let tools = (!request.tools.is_empty())
        .then(|| request.tools.iter().map(function_tool).collect::<Vec<_>>());

    ChatCompletionRequest {
        model: request.model,
        messages,
        tools,
        temperature: request.options.temperature,
        max_tokens,
        top_p: sampling.map(|extras| extras.top_p),
        frequency_penalty: sampling.map(|extras| extras.frequency_penalty),
        presence_penalty: sampling.map(|extras| extras.presence_penalty),
        stream,
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<ApiChoice>,
    #[serde(default)]
    pub usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiChoice {
    pub message: ApiAssistantMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiAssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ApiToolCall>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiToolCall {
    pub id: String,
    pub function: ApiToolFunction,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiToolFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

pub(crate) fn parse_response(
    provider: ProviderId,
    requested_model: String,
    body: &str,
) -> Result<ModelResponse, ProviderError> {
    let parsed = serde_json::from_str::<ChatCompletionResponse>(body).map_err(|err| {
        ProviderError::malformed_response(format!("{provider} response is not a chat completion: {err}"))
    })?;

    let choice = parsed.choices.into_iter().next().ok_or_else(|| {
        ProviderError::malformed_response(format!("{provider} response did not include choices"))
    })?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCall {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments,
        })
        .collect::<Vec<_>>();

    let usage = parsed
        .usage
        .map(|usage| TokenUsage {
            input_tokens: usage.prompt_tokens,
            output_tokens: usage.completion_tokens,
        })
        .unwrap_or_default();

    Ok(ModelResponse {
        provider,
        model: parsed.model.unwrap_or(requested_model),
        content: choice.message.content.unwrap_or_default(),
        tool_calls,
        usage,
    })
}
