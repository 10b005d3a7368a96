//! Provider drivers, uniform stream events and wire-format decoders.
//!
//! ```rust
//! use wprovider::{ConfigOverride, Message, ModelRequest, ProviderConfig, ProviderId};
//!
//! let config = ProviderConfig::new(ProviderId::Anthropic, "sk-ant-test");
//! config.validate().expect("config should be valid");
//!
//! let settings = config.resolve(&ConfigOverride::default());
//! let request = ModelRequest::new(settings.model, vec![Message::user("plan 3 days in Chengdu")])
//!     .with_options(settings.options);
//! assert!(request.validate().is_ok());
//! ```

pub mod adapters;
mod config;
mod credentials;
pub mod decode;
mod error;
mod model;
mod provider;
mod stream;
mod transport;

pub use config::{ConfigOverride, ProviderConfig, ResolvedSettings};
pub use credentials::SecretString;
pub use error::{MAX_ERROR_BODY_BYTES, ProviderError, ProviderErrorKind};
pub use model::{
    DEFAULT_MAX_TOKENS, Message, ModelRequest, ModelResponse, ParameterKind, ParameterSchema,
    ParameterSpec, ProviderFamily, ProviderId, Role, TokenUsage, ToolCall, ToolDeclaration,
};
pub use provider::{ModelProvider, ProviderCapabilities, ProviderConstructor, ProviderFuture};
pub use stream::{BoxedEventStream, ModelEventStream, StreamEvent, TerminalGuard, VecEventStream};
pub use transport::{ByteStream, DEFAULT_TIMEOUT, HttpRequest, HttpTransport, ReqwestTransport};
