use std::sync::Arc;

use wcommon::BoxFuture;

use crate::{
    BoxedEventStream, HttpTransport, ModelRequest, ModelResponse, ProviderConfig, ProviderError,
    ProviderId,
};

pub type ProviderFuture<'a, T> = BoxFuture<'a, T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Whether the wire protocol can carry a tool catalog.
    pub tools: bool,
}

impl Default for ProviderCapabilities {
    fn default() -> Self {
        Self { tools: true }
    }
}

pub trait ModelProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::default()
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>>;

    fn stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>>;
}

/// Builds a driver for one validated configuration.
pub type ProviderConstructor =
    fn(&ProviderConfig, Arc<dyn HttpTransport>) -> Result<Arc<dyn ModelProvider>, ProviderError>;
