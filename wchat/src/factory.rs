//! Single-slot adapter factory keyed by provider connection.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use wchat::{AdapterFactory, ChatErrorKind};
//! use wprovider::{ProviderConfig, ProviderId};
//! use wtooling::ToolRegistry;
//!
//! let factory = AdapterFactory::without_constructors(Arc::new(ToolRegistry::new()));
//! let error = factory
//!     .get_or_create(ProviderConfig::new(ProviderId::OpenAi, "sk-test"))
//!     .err()
//!     .expect("no constructors are registered");
//!
//! assert_eq!(error.kind, ChatErrorKind::UnsupportedProvider);
//! assert!(factory.current().is_none());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use wprovider::adapters::builtin_constructors;
use wprovider::{
    DEFAULT_TIMEOUT, HttpTransport, ProviderConfig, ProviderConstructor, ProviderError, ProviderId,
    ReqwestTransport,
};
use wtooling::ToolRegistry;

use crate::{ChatAdapter, ChatError, ChatHooks, HistoryWindow, NoopChatHooks, ToolNotices};

/// Builds adapters through registered constructors and keeps the last one.
///
/// The slot holds exactly one adapter. Concurrent callers with different
/// configurations overwrite each other; streams already opened keep the
/// adapter they captured.
pub struct AdapterFactory {
    constructors: HashMap<ProviderId, ProviderConstructor>,
    tools: Arc<ToolRegistry>,
    transport: Option<Arc<dyn HttpTransport>>,
    hooks: Arc<dyn ChatHooks>,
    system_prompt: Option<String>,
    history_window: Option<HistoryWindow>,
    notices: ToolNotices,
    slot: Mutex<Option<Arc<ChatAdapter>>>,
}

impl AdapterFactory {
    /// Factory with a constructor for every built-in provider.
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        let mut factory = Self::without_constructors(tools);
        for (provider, constructor) in builtin_constructors() {
            factory.register_constructor(provider, constructor);
        }
        factory
    }

    pub fn without_constructors(tools: Arc<ToolRegistry>) -> Self {
        Self {
            constructors: HashMap::new(),
            tools,
            transport: None,
            hooks: Arc::new(NoopChatHooks),
            system_prompt: None,
            history_window: None,
            notices: ToolNotices::default(),
            slot: Mutex::new(None),
        }
    }

    /// Adds or replaces the construction rule for `provider`.
    pub fn register_constructor(&mut self, provider: ProviderId, constructor: ProviderConstructor) {
        self.constructors.insert(provider, constructor);
    }

    pub fn supports(&self, provider: ProviderId) -> bool {
        self.constructors.contains_key(&provider)
    }

    /// Shared transport for every adapter. Without one, each adapter gets a
    /// reqwest client with the default timeout.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ChatHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_history_window(mut self, window: HistoryWindow) -> Self {
        self.history_window = Some(window);
        self
    }

    pub fn with_notices(mut self, notices: ToolNotices) -> Self {
        self.notices = notices;
        self
    }

    /// Returns the cached adapter when provider, credential and endpoint
    /// match the last call, otherwise builds and caches a new one.
    pub fn get_or_create(&self, config: ProviderConfig) -> Result<Arc<ChatAdapter>, ChatError> {
        config.validate()?;

        let mut slot = self.lock_slot();
        if let Some(adapter) = slot.as_ref()
            && adapter.config().same_connection(&config)
        {
            tracing::debug!(provider = %config.provider, "reusing cached chat adapter");
            return Ok(Arc::clone(adapter));
        }

        let adapter = Arc::new(self.build(config)?);
        tracing::info!(
            provider = %adapter.config().provider,
            endpoint = %adapter.config().endpoint(),
            model = %adapter.config().model,
            replaced = slot.is_some(),
            "created chat adapter"
        );

        *slot = Some(Arc::clone(&adapter));
        Ok(adapter)
    }

    /// The adapter built by the last successful `get_or_create`.
    pub fn current(&self) -> Option<Arc<ChatAdapter>> {
        self.lock_slot().clone()
    }

    pub fn clear(&self) {
        self.lock_slot().take();
    }

    fn build(&self, config: ProviderConfig) -> Result<ChatAdapter, ChatError> {
        let constructor = self
            .constructors
            .get(&config.provider)
            .ok_or_else(|| ProviderError::unsupported_provider(config.provider))?;

        let provider = constructor(&config, self.transport()?)?;
        let mut adapter = ChatAdapter::new(config, provider, Arc::clone(&self.tools))
            .with_hooks(Arc::clone(&self.hooks))
            .with_notices(self.notices.clone());

        if let Some(system_prompt) = &self.system_prompt {
            adapter = adapter.with_system_prompt(system_prompt.clone());
        }

        if let Some(window) = self.history_window {
            adapter = adapter.with_history_window(window);
        }

        Ok(adapter)
    }

    fn transport(&self) -> Result<Arc<dyn HttpTransport>, ChatError> {
        match &self.transport {
            Some(transport) => Ok(Arc::clone(transport)),
            None => Ok(Arc::new(ReqwestTransport::with_timeout(DEFAULT_TIMEOUT)?)),
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Arc<ChatAdapter>>> {
        // A panic while holding the slot leaves a valid value behind.
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use wprovider::{BoxedEventStream, ModelProvider, ModelRequest, ModelResponse, ProviderFuture};

    use super::*;
    use crate::ChatErrorKind;

    #[derive(Debug)]
    struct SilentProvider(ProviderId);

    impl ModelProvider for SilentProvider {
        fn id(&self) -> ProviderId {
            self.0
        }

        fn complete<'a>(
            &'a self,
            _request: ModelRequest,
        ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
            Box::pin(async move { Err(ProviderError::transport("offline")) })
        }

        fn stream<'a>(
            &'a self,
            _request: ModelRequest,
        ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
            Box::pin(async move { Err(ProviderError::transport("offline")) })
        }
    }

    fn silent(
        config: &ProviderConfig,
        _transport: Arc<dyn HttpTransport>,
    ) -> Result<Arc<dyn ModelProvider>, ProviderError> {
        Ok(Arc::new(SilentProvider(config.provider)))
    }

    fn factory() -> AdapterFactory {
        let mut factory = AdapterFactory::without_constructors(Arc::new(ToolRegistry::new()));
        factory.register_constructor(ProviderId::DeepSeek, silent);
        factory.register_constructor(ProviderId::Ollama, silent);
        factory
    }

    #[test]
    fn identical_connections_reuse_the_slot() {
        let factory = factory();
        let config = ProviderConfig::new(ProviderId::DeepSeek, "sk-one");

        let first = factory.get_or_create(config.clone()).expect("first build");
        let second = factory.get_or_create(config).expect("second build");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn model_changes_alone_do_not_rebuild() {
        let factory = factory();
        let first = factory
            .get_or_create(ProviderConfig::new(ProviderId::DeepSeek, "sk-one"))
            .expect("first build");
        let second = factory
            .get_or_create(ProviderConfig::new(ProviderId::DeepSeek, "sk-one").with_model("deepseek-coder"))
            .expect("second build");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.config().model, "deepseek-chat");
    }

    #[test]
    fn credential_or_endpoint_changes_rebuild() {
        let factory = factory();
        let first = factory
            .get_or_create(ProviderConfig::new(ProviderId::DeepSeek, "sk-one"))
            .expect("first build");
        let rotated = factory
            .get_or_create(ProviderConfig::new(ProviderId::DeepSeek, "sk-two"))
            .expect("rotated build");
        assert!(!Arc::ptr_eq(&first, &rotated));

        let moved = factory
            .get_or_create(
                ProviderConfig::new(ProviderId::DeepSeek, "sk-two")
                    .with_endpoint("https://proxy.example.test/v1"),
            )
            .expect("moved build");
        assert!(!Arc::ptr_eq(&rotated, &moved));

        let current = factory.current().expect("slot should be filled");
        assert!(Arc::ptr_eq(&current, &moved));
    }

    #[test]
    fn invalid_configs_fail_before_construction() {
        let factory = factory();
        let error = factory
            .get_or_create(ProviderConfig::new(ProviderId::DeepSeek, "  "))
            .err()
            .expect("blank credential should fail");

        assert_eq!(error.kind, ChatErrorKind::Configuration);
        assert!(error.is_invalid_credential());
        assert!(factory.current().is_none());
    }

    #[test]
    fn missing_constructor_is_unsupported_and_keeps_the_slot() {
        let factory = factory();
        let existing = factory
            .get_or_create(ProviderConfig::new(ProviderId::Ollama, ""))
            .expect("ollama needs no credential");

        let error = factory
            .get_or_create(ProviderConfig::new(ProviderId::Zhipu, "zhipu-key"))
            .err()
            .expect("zhipu is not registered");
        assert_eq!(error.kind, ChatErrorKind::UnsupportedProvider);
        assert!(error.message.contains("zhipu"));

        let current = factory.current().expect("slot should survive");
        assert!(Arc::ptr_eq(&current, &existing));

        factory.clear();
        assert!(factory.current().is_none());
    }

    #[test]
    fn builtin_factory_supports_every_provider() {
        let factory = AdapterFactory::new(Arc::new(ToolRegistry::new()));
        for provider in ProviderId::ALL {
            assert!(factory.supports(provider), "{provider} should be supported");
        }
    }
}
