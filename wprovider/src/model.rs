//! Provider-agnostic request, response, and message model types.
//!
//! ```rust
//! use wprovider::{Message, ModelRequest, ProviderErrorKind, ProviderId, Role};
//!
//! let provider: ProviderId = "deepseek".parse().expect("known provider");
//! assert_eq!(provider.default_model(), "deepseek-chat");
//!
//! let ok = ModelRequest::new("deepseek-chat", vec![Message::user("plan 3 days in Chengdu")]);
//! assert!(ok.validate().is_ok());
//! assert_eq!(ok.messages[0].role, Role::User);
//!
//! let err = ModelRequest::new("  ", vec![Message::user("hi")])
//!     .validate()
//!     .expect_err("blank model should fail");
//! assert_eq!(err.kind, ProviderErrorKind::Configuration);
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value, json};
use wcommon::GenerationOptions;

use crate::ProviderError;

pub const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderId {
    Anthropic,
    OpenAi,
    Google,
    DeepSeek,
    Zhipu,
    Ollama,
    Doubao,
    OpenRouter,
}

/// Wire dialect shared by a group of providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFamily {
    OpenAiCompatible,
    Anthropic,
    Ollama,
}

impl ProviderId {
    pub const ALL: [ProviderId; 8] = [
        Self::Anthropic,
        Self::OpenAi,
        Self::Google,
        Self::DeepSeek,
        Self::Zhipu,
        Self::Ollama,
        Self::Doubao,
        Self::OpenRouter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Google => "google",
            Self::DeepSeek => "deepseek",
            Self::Zhipu => "zhipu",
            Self::Ollama => "ollama",
            Self::Doubao => "doubao",
            Self::OpenRouter => "openrouter",
        }
    }

    pub fn family(self) -> ProviderFamily {
        match self {
            Self::Anthropic => ProviderFamily::Anthropic,
            Self::Ollama => ProviderFamily::Ollama,
            _ => ProviderFamily::OpenAiCompatible,
        }
    }

    pub fn default_endpoint(self) -> &'static str {
        match self {
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Google => "https://generativelanguage.googleapis.com/v1beta/openai",
            Self::DeepSeek => "https://api.deepseek.com/v1",
            Self::Zhipu => "https://open.bigmodel.cn/api/paas/v4",
            Self::Ollama => "http://localhost:11434",
            Self::Doubao => "https://ark.cn-beijing.volces.com/api/v3",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-3-5-sonnet-20241022",
            Self::OpenAi => "gpt-3.5-turbo",
            Self::Google => "gemini-pro",
            Self::DeepSeek => "deepseek-chat",
            Self::Zhipu => "glm-4",
            Self::Ollama => "llama3",
            Self::Doubao => "doubao-seed-1-6-251015",
            Self::OpenRouter => "openai/gpt-3.5-turbo",
        }
    }

    pub fn default_temperature(self) -> f32 {
        match self {
            Self::OpenAi | Self::Anthropic => 1.0,
            _ => 0.7,
        }
    }

    /// Sampling values sent when neither the call nor the config sets them.
    /// The local backend keeps its own server-side defaults.
    pub fn default_options(self) -> GenerationOptions {
        match self {
            Self::Ollama => GenerationOptions::default(),
            _ => GenerationOptions::default()
                .with_max_tokens(DEFAULT_MAX_TOKENS)
                .with_temperature(self.default_temperature()),
        }
    }

    /// Local backends accept requests without a credential.
    pub fn requires_credential(self) -> bool {
        self != Self::Ollama
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| ProviderError::unsupported_provider(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: now_millis(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

impl ParameterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub kind: ParameterKind,
    pub description: String,
    pub allowed: Option<Vec<String>>,
}

impl ParameterSpec {
    pub fn new(kind: ParameterKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            allowed: None,
        }
    }

    fn to_json(&self) -> Value {
        let mut spec = Map::new();
        spec.insert("type".to_string(), json!(self.kind.as_str()));
        if !self.description.is_empty() {
            spec.insert("description".to_string(), json!(self.description));
        }
        if let Some(allowed) = &self.allowed {
            spec.insert("enum".to_string(), json!(allowed));
        }
        Value::Object(spec)
    }
}

/// Object-shaped parameter schema. Properties keep declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterSchema {
    pub properties: Vec<(String, ParameterSpec)>,
    pub required: Vec<String>,
}

impl ParameterSchema {
    pub fn property(&self, name: &str) -> Option<&ParameterSpec> {
        self.properties
            .iter()
            .find(|(property, _)| property == name)
            .map(|(_, spec)| spec)
    }

    pub fn to_json_schema(&self) -> Value {
        let properties = self
            .properties
            .iter()
            .map(|(name, spec)| (name.clone(), spec.to_json()))
            .collect::<Map<String, Value>>();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}

/// Declarative description of a callable tool offered to a backend.
///
/// ```rust
/// use wprovider::ToolDeclaration;
///
/// let declaration = ToolDeclaration::new("search_guides", "Search travel guides")
///     .string_param("keyword", "Search keyword")
///     .enum_param("sort", "Sort order", ["latest", "popular"])
///     .required("keyword");
///
/// let schema = declaration.parameters.to_json_schema();
/// assert_eq!(schema["required"][0], "keyword");
/// assert_eq!(schema["properties"]["sort"]["enum"][1], "popular");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

impl ToolDeclaration {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParameterSchema::default(),
        }
    }

    /// Adds or replaces a property, keeping its original position on replace.
    pub fn param(mut self, name: impl Into<String>, spec: ParameterSpec) -> Self {
        let name = name.into();
        match self
            .parameters
            .properties
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            Some((_, existing)) => *existing = spec,
            None => self.parameters.properties.push((name, spec)),
        }
        self
    }

    pub fn string_param(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(name, ParameterSpec::new(ParameterKind::String, description))
    }

    pub fn number_param(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(name, ParameterSpec::new(ParameterKind::Number, description))
    }

    pub fn boolean_param(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(name, ParameterSpec::new(ParameterKind::Boolean, description))
    }

    pub fn enum_param<I, S>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        allowed: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = ParameterSpec::new(ParameterKind::String, description);
        spec.allowed = Some(allowed.into_iter().map(Into::into).collect());
        self.param(name, spec)
    }

    pub fn required(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.parameters.required.contains(&name) {
            self.parameters.required.push(name);
        }
        self
    }
}

/// Fully assembled tool call from a non-streaming response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
    pub tools: Vec<ToolDeclaration>,
    pub options: GenerationOptions,
}

impl ModelRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            system_prompt: None,
            tools: Vec::new(),
            options: GenerationOptions::default(),
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDeclaration>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn max_tokens(&self) -> u32 {
        self.options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::configuration("model must not be empty"));
        }

        if self.messages.is_empty() {
            return Err(ProviderError::configuration(
                "at least one message is required",
            ));
        }

        validate_options(&self.options)
    }
}

pub(crate) fn validate_options(options: &GenerationOptions) -> Result<(), ProviderError> {
    if let Some(max_tokens) = options.max_tokens
        && max_tokens == 0
    {
        return Err(ProviderError::configuration(
            "max_tokens must be greater than zero",
        ));
    }

    if let Some(temperature) = options.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        return Err(ProviderError::configuration(
            "temperature must be in the inclusive range 0.0..=2.0",
        ));
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub provider: ProviderId,
    pub model: String,
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: TokenUsage,
}
