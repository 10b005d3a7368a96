//! Ollama native chat driver.

use std::sync::Arc;

use crate::decode::{NdjsonDecoder, decode_stream};
use crate::{
    BoxedEventStream, HttpRequest, HttpTransport, ModelProvider, ModelRequest, ModelResponse,
    ProviderCapabilities, ProviderConfig, ProviderError, ProviderFuture, ProviderId,
};

use super::serde_api::{build_api_request, parse_response};

#[derive(Debug, Clone)]
pub struct OllamaProvider {
    endpoint: String,
    transport: Arc<dyn HttpTransport>,
    tools: bool,
}

impl OllamaProvider {
    pub fn new(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            endpoint: config.endpoint().to_string(),
            transport,
            tools: true,
        }
    }

    /// For local models without function-calling support.
    pub fn without_tools(mut self) -> Self {
        self.tools = false;
        self
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
        let body = serde_json::to_value(build_api_request(request, self.tools, stream))
            .map_err(|err| ProviderError::configuration(err.to_string()))?;
        Ok(HttpRequest::new(format!("{}/api/chat", self.endpoint), body))
    }
}

impl ModelProvider for OllamaProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities { tools: self.tools }
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let model = request.model.clone();
            tracing::debug!(provider = %ProviderId::Ollama, model = %model, "sending local chat request");

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
            tracing::debug!(provider = %ProviderId::Ollama, model = %request.model, "opening local chat stream");

            let http = self.build_http_request(request, true)?;
            let bytes = self.transport.post_stream(http).await?;
            Ok(decode_stream(bytes, NdjsonDecoder::new()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ByteStream, Message, ToolDeclaration};
    use wcommon::GenerationOptions;

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

    fn request() -> ModelRequest {
        ModelRequest::new("llama3", vec![Message::user("hi")])
            .with_system_prompt("system")
            .with_tools(vec![ToolDeclaration::new("get_weather", "Weather")])
    }

    #[test]
    fn request_targets_native_chat_endpoint_without_auth() {
        let config = ProviderConfig::new(ProviderId::Ollama, "");
        let provider = OllamaProvider::new(&config, Arc::new(NoopTransport));
        let http = provider
            .build_http_request(request(), true)
            .expect("request should build");

        assert_eq!(http.url, "http://localhost:11434/api/chat");
        assert!(http.headers.is_empty());
        assert_eq!(http.body["messages"][0]["role"], "system");
        assert_eq!(http.body["tools"][0]["function"]["name"], "get_weather");
        assert!(http.body.get("options").is_none());
    }

    #[test]
    fn explicit_sampling_maps_to_options_and_tools_can_be_disabled() {
        let config = ProviderConfig::new(ProviderId::Ollama, "");
        let provider = OllamaProvider::new(&config, Arc::new(NoopTransport)).without_tools();
        assert!(!provider.capabilities().tools);

        let request = request().with_options(GenerationOptions::default().with_max_tokens(256));
        let http = provider
            .build_http_request(request, false)
            .expect("request should build");

        assert!(http.body.get("tools").is_none());
        assert_eq!(http.body["options"]["num_predict"], 256);
        assert!(http.body["options"].get("temperature").is_none());
    }

    #[test]
    fn response_reads_message_and_eval_counts() {
        let response = parse_response(
            "llama3".into(),
            r#"{"message":{"role":"assistant","content":"Hi"},"done":true,"prompt_eval_count":3,"eval_count":2}"#,
        )
        .expect("response should parse");

        assert_eq!(response.content, "Hi");
        assert_eq!(response.usage.total(), 5);
        assert!(parse_response("llama3".into(), r#"{"done":true}"#).is_err());
    }
}
