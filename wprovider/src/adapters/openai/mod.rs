mod provider;
mod serde_api;

pub use provider::{OpenAiCompatibleProvider, SamplingExtras};
