//! Stable provider construction surface for facade consumers.

use std::sync::Arc;
use std::time::Duration;

use wprovider::adapters::builtin_constructors;

use crate::{
    DEFAULT_TIMEOUT, HttpTransport, ModelProvider, ProviderConfig, ProviderError, ProviderId,
    ReqwestTransport,
};

/// Builds a standalone driver over a reqwest client with the default timeout.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    build_provider_with_timeout(config, DEFAULT_TIMEOUT)
}

pub fn build_provider_with_timeout(
    config: &ProviderConfig,
    timeout: Duration,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    let transport = Arc::new(ReqwestTransport::with_timeout(timeout)?);
    build_provider_with_transport(config, transport)
}

pub fn build_provider_with_transport(
    config: &ProviderConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    config.validate()?;

    let constructor = builtin_constructors()
        .into_iter()
        .find_map(|(provider, constructor)| (provider == config.provider).then_some(constructor))
        .ok_or_else(|| ProviderError::unsupported_provider(config.provider))?;

    constructor(config, transport)
}

/// Providers compiled into this build.
pub fn supported_providers() -> Vec<ProviderId> {
    builtin_constructors()
        .into_iter()
        .map(|(provider, _)| provider)
        .collect()
}
