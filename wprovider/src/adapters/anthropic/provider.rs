//! Anthropic Messages API driver.

use std::sync::Arc;

use crate::decode::retag_stream;
use crate::{
    BoxedEventStream, HttpRequest, HttpTransport, ModelProvider, ModelRequest, ModelResponse,
    ProviderConfig, ProviderError, ProviderFuture, ProviderId, SecretString,
};

use super::events::event_stream;
use super::serde_api::{build_api_request, parse_response};

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Clone)]
pub struct AnthropicProvider {
    endpoint: String,
    credential: SecretString,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            endpoint: config.endpoint().to_string(),
            credential: config.credential.clone(),
            transport,
        }
    }

    pub fn construct(
        config: &ProviderConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Arc<dyn ModelProvider>, ProviderError> {
        config.validate()?;
        Ok(Arc::new(Self::new(config, transport)))
    }

    pub(crate) fn build_http_request(
        &self,
        request: ModelRequest,
        stream: bool,
    ) -> Result<HttpRequest, ProviderError> {
        let body = serde_json::to_value(build_api_request(request, stream))
            .map_err(|err| ProviderError::configuration(err.to_string()))?;

        let mut http = HttpRequest::new(format!("{}/messages", self.endpoint), body)
            .with_header("x-api-key", self.credential.expose())
            .with_header("anthropic-version", ANTHROPIC_VERSION);
        if stream {
            http = http.with_header("accept", "text/event-stream");
        }
        Ok(http)
    }
}

impl ModelProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let model = request.model.clone();
            tracing::debug!(provider = %ProviderId::Anthropic, model = %model, tools = request.tools.len(), "sending message request");

            let http = self.build_http_request(request, false)?;
            let body = self.transport.post_json(http).await?;
            parse_response(model, &body)
        })
    }

    fn stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            tracing::debug!(provider = %ProviderId::Anthropic, model = %request.model, tools = request.tools.len(), "opening message stream");

            let http = self.build_http_request(request, true)?;
            let bytes = self.transport.post_stream(http).await?;
            Ok(retag_stream(event_stream(bytes)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ByteStream, Message, ToolDeclaration};

    #[derive(Debug)]
    struct NoopTransport;

    impl HttpTransport for NoopTransport {
        fn post_json<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> ProviderFuture<'a, Result<String, ProviderError>> {
            Box::pin(async { Err(ProviderError::transport("not used")) })
        }

        fn post_stream<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> ProviderFuture<'a, Result<ByteStream<'a>, ProviderError>> {
            Box::pin(async { Err(ProviderError::transport("not used")) })
        }
    }

    #[test]
    fn request_uses_native_headers_system_field_and_input_schema() {
        let config = ProviderConfig::new(ProviderId::Anthropic, "sk-ant");
        let provider = AnthropicProvider::new(&config, Arc::new(NoopTransport));

        let request = ModelRequest::new(
            "claude-3-5-sonnet-20241022",
            vec![Message::system("Be brief."), Message::user("hi")],
        )
        .with_system_prompt("You are a travel assistant.")
        .with_tools(vec![ToolDeclaration::new("get_weather", "Weather").string_param("city", "City")]);

        let http = provider
            .build_http_request(request, true)
            .expect("request should build");

        assert_eq!(http.url, "https://api.anthropic.com/v1/messages");
        assert_eq!(http.header("x-api-key"), Some("sk-ant"));
        assert_eq!(http.header("anthropic-version"), Some(ANTHROPIC_VERSION));
        assert!(http.header("authorization").is_none());
        assert_eq!(http.body["system"], "You are a travel assistant.\n\nBe brief.");
        assert_eq!(http.body["messages"].as_array().map(Vec::len), Some(1));
        assert_eq!(http.body["tools"][0]["input_schema"]["type"], "object");
        assert_eq!(http.body["max_tokens"], 4096);
    }

    #[test]
    fn response_concatenates_text_blocks() {
        let body = r#"{"model":"claude","content":[{"type":"text","text":"Day 1"},{"type":"tool_use","id":"t1","name":"get_weather","input":{"city":"Chengdu"}},{"type":"text","text":", Day 2"}],"usage":{"input_tokens":4,"output_tokens":6}}"#;
        let response = parse_response("requested".into(), body).expect("response should parse");

        assert_eq!(response.content, "Day 1, Day 2");
        assert_eq!(response.tool_calls[0].arguments, "{\"city\":\"Chengdu\"}");
        assert_eq!(response.usage.total(), 10);
    }
}
