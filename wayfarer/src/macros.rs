/// Creates a single chat [`Message`](crate::Message) from a role shorthand.
///
/// ```rust
/// use wayfarer::{Role, wf_msg};
///
/// let message = wf_msg!(assistant => "Day 1: Kuanzhai Alley");
/// assert_eq!(message.role, Role::Assistant);
/// assert_eq!(message.content, "Day 1: Kuanzhai Alley");
/// ```
#[macro_export]
macro_rules! wf_msg {
    (system => $content:expr $(,)?) => {
        $crate::Message::system($content)
    };
    (user => $content:expr $(,)?) => {
        $crate::Message::user($content)
    };
    (assistant => $content:expr $(,)?) => {
        $crate::Message::assistant($content)
    };
    ($role:ident => $content:expr $(,)?) => {
        compile_error!("unsupported role: use system, user, or assistant");
    };
}

/// Creates a `Vec<Message>` from role/content pairs.
///
/// ```rust
/// use wayfarer::{Role, wf_messages};
///
/// let messages = wf_messages![
///     user => "plan 3 days in Chengdu",
///     assistant => "Sure. Any preferences?",
///     user => "food",
/// ];
///
/// assert_eq!(messages.len(), 3);
/// assert_eq!(messages[1].role, Role::Assistant);
/// ```
#[macro_export]
macro_rules! wf_messages {
    () => {
        Vec::<$crate::Message>::new()
    };
    ($($role:ident => $content:expr),+ $(,)?) => {
        vec![$($crate::wf_msg!($role => $content)),+]
    };
}

/// Creates a [`ProviderConfig`](crate::ProviderConfig) with provider shorthand support.
///
/// ```rust
/// use wayfarer::{ProviderId, wf_config};
///
/// let config = wf_config!(deepseek, "sk-test", "deepseek-reasoner");
/// assert_eq!(config.provider, ProviderId::DeepSeek);
/// assert_eq!(config.model, "deepseek-reasoner");
///
/// let local = wf_config!(local);
/// assert_eq!(local.provider, ProviderId::Ollama);
/// assert_eq!(local.model, "llama3");
/// ```
#[macro_export]
macro_rules! wf_config {
    (local $(,)?) => {
        $crate::ProviderConfig::new($crate::ProviderId::Ollama, "")
    };
    (local, $model:expr $(,)?) => {
        $crate::wf_config!(local).with_model($model)
    };
    ($provider:ident, $credential:expr $(,)?) => {
        $crate::ProviderConfig::new($crate::wf_provider!($provider), $credential)
    };
    ($provider:ident, $credential:expr, $model:expr $(,)?) => {
        $crate::wf_config!($provider, $credential).with_model($model)
    };
}

/// Maps a provider shorthand to its [`ProviderId`](crate::ProviderId).
///
/// ```rust
/// use wayfarer::{ProviderId, wf_provider};
///
/// assert_eq!(wf_provider!(claude), ProviderId::Anthropic);
/// assert_eq!(wf_provider!(glm), ProviderId::Zhipu);
/// ```
#[macro_export]
macro_rules! wf_provider {
    (openai) => {
        $crate::ProviderId::OpenAi
    };
    (anthropic) => {
        $crate::ProviderId::Anthropic
    };
    (claude) => {
        $crate::ProviderId::Anthropic
    };
    (google) => {
        $crate::ProviderId::Google
    };
    (gemini) => {
        $crate::ProviderId::Google
    };
    (deepseek) => {
        $crate::ProviderId::DeepSeek
    };
    (zhipu) => {
        $crate::ProviderId::Zhipu
    };
    (glm) => {
        $crate::ProviderId::Zhipu
    };
    (ollama) => {
        $crate::ProviderId::Ollama
    };
    (local) => {
        $crate::ProviderId::Ollama
    };
    (doubao) => {
        $crate::ProviderId::Doubao
    };
    (openrouter) => {
        $crate::ProviderId::OpenRouter
    };
    ($other:ident) => {
        compile_error!(concat!("unknown provider shorthand: ", stringify!($other)));
    };
}
