//! Resolved provider configuration and per-call overrides.
//!
//! ```rust
//! use wprovider::{ConfigOverride, ProviderConfig, ProviderId};
//!
//! let config = ProviderConfig::new(ProviderId::DeepSeek, "sk-test").with_temperature(0.3);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.endpoint(), "https://api.deepseek.com/v1");
//!
//! let settings = config.resolve(&ConfigOverride::default().with_max_tokens(512));
//! assert_eq!(settings.model, "deepseek-chat");
//! assert_eq!(settings.options.max_tokens, Some(512));
//! assert_eq!(settings.options.temperature, Some(0.3));
//! ```

use wcommon::GenerationOptions;

use crate::model::validate_options;
use crate::{ProviderError, ProviderId, SecretString};

/// Immutable configuration bound to one adapter instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub provider: ProviderId,
    pub credential: SecretString,
    pub endpoint: Option<String>,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl ProviderConfig {
    pub fn new(provider: ProviderId, credential: impl Into<SecretString>) -> Self {
        Self {
            provider,
            credential: credential.into(),
            endpoint: None,
            model: provider.default_model().to_string(),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Custom endpoint when set and non-blank, else the provider default.
    /// Trailing slashes are removed so paths can be appended directly.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| self.provider.default_endpoint())
            .trim_end_matches('/')
    }

    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.provider.requires_credential() && self.credential.is_blank() {
            return Err(ProviderError::missing_credential(self.provider));
        }

        if self.model.trim().is_empty() {
            return Err(ProviderError::configuration("model must not be empty"));
        }

        validate_options(&self.options())
    }

    /// Two configs share a live adapter when provider, credential and
    /// resolved endpoint all match.
    pub fn same_connection(&self, other: &ProviderConfig) -> bool {
        self.provider == other.provider
            && self.credential == other.credential
            && self.endpoint() == other.endpoint()
    }

    /// Merges an override over this config, then over provider defaults.
    pub fn resolve(&self, call: &ConfigOverride) -> ResolvedSettings {
        let model = call
            .model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(self.model.as_str())
            .to_string();

        ResolvedSettings {
            model,
            options: call.options.or(self.options()).or(self.provider.default_options()),
        }
    }
}

/// Per-call settings layered over the bound config.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigOverride {
    pub model: Option<String>,
    pub options: GenerationOptions,
}

impl ConfigOverride {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options = self.options.with_max_tokens(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options = self.options.with_temperature(temperature);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_none() && self.options.is_empty()
    }
}

impl From<GenerationOptions> for ConfigOverride {
    fn from(options: GenerationOptions) -> Self {
        Self {
            model: None,
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub model: String,
    pub options: GenerationOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn blank_credential_fails_except_for_local_backend() {
        let error = ProviderConfig::new(ProviderId::OpenAi, "  ")
            .validate()
            .expect_err("blank key should fail");
        assert_eq!(error.kind, ProviderErrorKind::Configuration);
        assert!(error.is_invalid_credential());

        assert!(ProviderConfig::new(ProviderId::Ollama, "").validate().is_ok());
    }

    #[test]
    fn validation_checks_model_and_sampling_ranges() {
        let base = ProviderConfig::new(ProviderId::Zhipu, "key");
        assert!(base.clone().with_model(" ").validate().is_err());
        assert!(base.clone().with_max_tokens(0).validate().is_err());
        assert!(base.clone().with_temperature(-0.1).validate().is_err());
        assert!(base.with_temperature(2.0).validate().is_ok());
    }

    #[test]
    fn only_credential_failures_read_as_invalid_credentials() {
        let base = ProviderConfig::new(ProviderId::DeepSeek, "key");
        for config in [
            base.clone().with_model(""),
            base.clone().with_max_tokens(0),
            base.with_temperature(3.5),
        ] {
            let error = config.validate().expect_err("config should be rejected");
            assert_eq!(error.kind, ProviderErrorKind::Configuration);
            assert!(!error.is_invalid_credential(), "{error}");
        }
    }

    #[test]
    fn endpoint_prefers_custom_value_without_trailing_slash() {
        let config = ProviderConfig::new(ProviderId::Ollama, "")
            .with_endpoint("http://10.0.0.2:11434/");
        assert_eq!(config.endpoint(), "http://10.0.0.2:11434");

        let blank = ProviderConfig::new(ProviderId::OpenAi, "k").with_endpoint("   ");
        assert_eq!(blank.endpoint(), "https://api.openai.com/v1");
    }

    #[test]
    fn same_connection_ignores_model_and_sampling() {
        let a = ProviderConfig::new(ProviderId::OpenAi, "k1");
        let b = a.clone().with_model("gpt-4o").with_temperature(0.1);
        let c = a.clone().with_endpoint("https://api.openai.com/v1/");
        let d = ProviderConfig::new(ProviderId::OpenAi, "k2");

        assert!(a.same_connection(&b));
        assert!(a.same_connection(&c));
        assert!(!a.same_connection(&d));
    }

    #[test]
    fn resolve_layers_override_config_then_defaults() {
        let config = ProviderConfig::new(ProviderId::Anthropic, "k").with_max_tokens(1000);

        let plain = config.resolve(&ConfigOverride::default());
        assert_eq!(plain.model, "claude-3-5-sonnet-20241022");
        assert_eq!(plain.options.max_tokens, Some(1000));
        assert_eq!(plain.options.temperature, Some(1.0));

        let call = ConfigOverride::default()
            .with_model("claude-3-haiku")
            .with_temperature(0.2);
        let layered = config.resolve(&call);
        assert_eq!(layered.model, "claude-3-haiku");
        assert_eq!(layered.options.temperature, Some(0.2));
        assert_eq!(layered.options.max_tokens, Some(1000));
    }

    #[test]
    fn local_backend_gets_no_implicit_sampling_defaults() {
        let config = ProviderConfig::new(ProviderId::Ollama, "");
        let settings = config.resolve(&ConfigOverride::default());
        assert!(settings.options.is_empty());
    }
}
