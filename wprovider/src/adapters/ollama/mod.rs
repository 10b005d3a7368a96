mod provider;
mod serde_api;

pub use provider::OllamaProvider;
