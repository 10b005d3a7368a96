//! OpenAI-compatible driver shared by every chat-completions backend.

use std::sync::Arc;

use crate::decode::{SseDecoder, TextMode, decode_stream};
use crate::{
    BoxedEventStream, HttpRequest, HttpTransport, ModelProvider, ModelRequest, ModelResponse,
    ProviderConfig, ProviderError, ProviderFuture, ProviderId, SecretString,
};

use super::serde_api::{build_api_request, parse_response};

/// Fixed sampling parameters some backends expect on every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingExtras {
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl SamplingExtras {
    pub const DOUBAO: SamplingExtras = SamplingExtras {
        top_p: 0.9,
        frequency_penalty: 0.1,
        presence_penalty: 0.1,
    };
}

#[derive(Clone)]
pub struct OpenAiCompatibleProvider {
    id: ProviderId,
    endpoint: String,
    credential: SecretString,
    transport: Arc<dyn HttpTransport>,
    text_mode: TextMode,
    sampling: Option<SamplingExtras>,
}

impl std::fmt::Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint)
            .field("text_mode", &self.text_mode)
            .field("sampling", &self.sampling)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatibleProvider {
    pub fn new(config: &ProviderConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            id: config.provider,
            endpoint: config.endpoint().to_string(),
            credential: config.credential.clone(),
            transport,
            text_mode: TextMode::Incremental,
            sampling: None,
        }
    }

    pub fn with_text_mode(mut self, text_mode: TextMode) -> Self {
        self.text_mode = text_mode;
        self
    }

    pub fn with_sampling_extras(mut self, sampling: SamplingExtras) -> Self {
        self.sampling = Some(sampling);
        self
    }

    pub fn construct(
        config: &ProviderConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Arc<dyn ModelProvider>, ProviderError> {
        config.validate()?;
        Ok(Arc::new(Self::new(config, transport)))
    }

    pub fn construct_doubao(
        config: &ProviderConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Arc<dyn ModelProvider>, ProviderError> {
        config.validate()?;
        Ok(Arc::new(
            Self::new(config, transport).with_sampling_extras(SamplingExtras::DOUBAO),
        ))
    }

    pub(crate) fn build_http_request(
        &self,
        request: ModelRequest,
        stream: bool,
    ) -> Result<HttpRequest, ProviderError> {
        let api_request = build_api_request(request, self.sampling, stream);
        let body = serde_json::to_value(&api_request)
            .map_err(|err| ProviderError::configuration(err.to_string()))?;

        let mut http = HttpRequest::new(format!("{}/chat/completions", self.endpoint), body)
            .with_bearer(self.credential.expose());
        if stream {
            http = http.with_header("accept", "text/event-stream");
        }
        Ok(http)
    }
}

impl ModelProvider for OpenAiCompatibleProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let model = request.model.clone();
            tracing::debug!(provider = %self.id, model = %model, tools = request.tools.len(), "sending chat completion");

            let http = self.build_http_request(request, false)?;
            let body = self.transport.post_json(http).await?;
            parse_response(self.id, model, &body)
        })
    }

    fn stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            tracing::debug!(provider = %self.id, model = %request.model, tools = request.tools.len(), "opening chat completion stream");

            let http = self.build_http_request(request, true)?;
            let bytes = self.transport.post_stream(http).await?;
            let decoder = SseDecoder::new().with_text_mode(self.text_mode);
            Ok(decode_stream(bytes, decoder))
        })
    }
}
