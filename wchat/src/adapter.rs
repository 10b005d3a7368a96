//! Provider-agnostic chat adapter with in-stream tool execution.
//!
//! A streaming exchange moves through these states per tool call:
//! text is forwarded as it arrives, a `ToolCallStart` opens an argument
//! buffer for its id, `ToolCallEnd` marks the buffer complete, and complete
//! calls run in the order their starts were observed. Each run emits a
//! progress notice, then the tool's display text or a failure notice.
//!
//! ```rust
//! use wchat::ToolNotices;
//! use wtooling::ToolError;
//!
//! let notices = ToolNotices::default();
//! assert_eq!(notices.progress("get_weather"), "\n\n🔧 Invoking tool: get_weather...\n\n");
//! assert_eq!(
//!     notices.failure(&ToolError::execution_failed("no data")),
//!     "\n❌ Tool call failed: no data\n"
//! );
//! ```

use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_stream::stream;
use futures_util::StreamExt;
use tokio::runtime::Handle;
use wprovider::{
    ConfigOverride, Message, ModelProvider, ModelRequest, ProviderConfig, ProviderId, StreamEvent,
};
use wtooling::{ToolError, ToolExecutionContext, ToolInvocation, ToolInvocationResult, ToolRegistry};

use crate::{
    ChatChunk, ChatError, ChatHooks, ChatResponse, ChatStream, ChunkOrigin, HistoryWindow,
    NoopChatHooks, StreamOutcome,
};

/// Templates for the text spliced into the stream around tool runs.
/// `{name}` and `{error}` are substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolNotices {
    pub progress: String,
    pub failure: String,
}

impl ToolNotices {
    pub const DEFAULT_PROGRESS: &'static str = "\n\n🔧 Invoking tool: {name}...\n\n";
    pub const DEFAULT_FAILURE: &'static str = "\n❌ Tool call failed: {error}\n";

    pub fn new(progress: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            progress: progress.into(),
            failure: failure.into(),
        }
    }

    pub fn progress(&self, tool_name: &str) -> String {
        self.progress.replace("{name}", tool_name)
    }

    pub fn failure(&self, error: &ToolError) -> String {
        self.failure.replace("{error}", &error.message)
    }
}

impl Default for ToolNotices {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRESS, Self::DEFAULT_FAILURE)
    }
}

/// Binds one provider configuration to its driver and the shared tool registry.
///
/// An adapter is immutable once built; a changed configuration needs a new one.
pub struct ChatAdapter {
    config: ProviderConfig,
    provider: Arc<dyn ModelProvider>,
    tools: Arc<ToolRegistry>,
    hooks: Arc<dyn ChatHooks>,
    system_prompt: Option<String>,
    history_window: Option<HistoryWindow>,
    notices: ToolNotices,
    tool_context: ToolExecutionContext,
}

impl ChatAdapter {
    pub fn new(
        config: ProviderConfig,
        provider: Arc<dyn ModelProvider>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            config,
            provider,
            tools,
            hooks: Arc::new(NoopChatHooks),
            system_prompt: None,
            history_window: None,
            notices: ToolNotices::default(),
            tool_context: ToolExecutionContext::default(),
        }
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

    pub fn with_tool_context(mut self, context: ToolExecutionContext) -> Self {
        self.tool_context = context;
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn provider_id(&self) -> ProviderId {
        self.provider.id()
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Single-shot completion. Tool calls in the response are reported, not run.
    pub async fn chat(
        &self,
        messages: &[Message],
        overrides: ConfigOverride,
    ) -> Result<ChatResponse, ChatError> {
        let request = self.build_request(messages, &overrides)?;
        tracing::debug!(
            provider = %self.provider_id(),
            model = %request.model,
            messages = request.messages.len(),
            "sending chat request"
        );

        let response = self.provider.complete(request).await?;
        Ok(ChatResponse {
            content: response.content,
            usage: response.usage,
            tool_calls: response.tool_calls,
        })
    }

    /// Opens a streaming exchange. Request and connection errors are returned
    /// here; failures after the first byte arrive as the stream's last item.
    ///
    /// Dropping the stream stops delivery and releases the connection. A tool
    /// already running finishes in the background and its result is dropped.
    pub async fn chat_stream<'a>(
        &'a self,
        messages: &[Message],
        overrides: ConfigOverride,
    ) -> Result<ChatStream<'a>, ChatError> {
        let request = self.build_request(messages, &overrides)?;
        let provider = self.provider_id();
        tracing::debug!(
            provider = %provider,
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "opening chat stream"
        );

        self.hooks.on_stream_start(provider, &request.model);
        let mut finish = FinishGuard::new(Arc::clone(&self.hooks), provider);

        let mut events = match self.provider.stream(request).await {
            Ok(events) => events,
            Err(error) => {
                let error = ChatError::from(error);
                finish.fail(&error);
                return Err(error);
            }
        };

        Ok(Box::pin(stream! {
            let mut calls = PendingCalls::default();
            let mut runnable = VecDeque::<PendingCall>::new();
            let mut completed = false;

            'exchange: loop {
                while let Some(call) = runnable.pop_front() {
                    yield Ok(ChatChunk::new(
                        ChunkOrigin::ToolProgress,
                        self.notices.progress(&call.name),
                    ));

                    match self.run_tool(call).await {
                        Ok(Ok(result)) => {
                            yield Ok(ChatChunk::new(ChunkOrigin::ToolResult, result.display_text()));
                        }
                        Ok(Err(error)) => {
                            yield Ok(ChatChunk::new(
                                ChunkOrigin::ToolFailure,
                                self.notices.failure(&error),
                            ));
                        }
                        Err(error) => {
                            finish.fail(&error);
                            yield Err(error);
                            break 'exchange;
                        }
                    }
                }

                if completed {
                    finish.complete();
                    break;
                }

                let Some(event) = events.next().await else {
                    tracing::debug!(provider = %provider, "provider stream ended without a terminal event");
                    runnable.extend(calls.take_all());
                    completed = true;
                    continue;
                };

                match event {
                    StreamEvent::TextDelta(text) => {
                        if !text.is_empty() {
                            yield Ok(ChatChunk::model(text));
                        }
                    }
                    StreamEvent::ToolCallStart { id, name } => calls.start(id, name),
                    StreamEvent::ToolCallArguments { id, fragment } => calls.append(&id, &fragment),
                    StreamEvent::ToolCallEnd { id } => {
                        calls.end(&id);
                        runnable.extend(calls.take_ready());
                    }
                    StreamEvent::Completed => {
                        runnable.extend(calls.take_all());
                        completed = true;
                    }
                    StreamEvent::Failed(error) => {
                        let error = ChatError::from(error);
                        finish.fail(&error);
                        yield Err(error);
                        break;
                    }
                }
            }
        }))
    }

    /// Callback form of [`ChatAdapter::chat_stream`]: `on_chunk` receives each
    /// increment in arrival order.
    pub async fn chat_stream_with<F>(
        &self,
        messages: &[Message],
        mut on_chunk: F,
        overrides: ConfigOverride,
    ) -> Result<(), ChatError>
    where
        F: FnMut(&str),
    {
        let mut stream = self.chat_stream(messages, overrides).await?;
        while let Some(chunk) = stream.next().await {
            on_chunk(&chunk?.text);
        }

        Ok(())
    }

    fn build_request(
        &self,
        messages: &[Message],
        overrides: &ConfigOverride,
    ) -> Result<ModelRequest, ChatError> {
        let settings = self.config.resolve(overrides);
        let messages = match &self.history_window {
            Some(window) => window.apply(messages),
            None => messages.to_vec(),
        };

        let mut request = ModelRequest::new(settings.model, messages).with_options(settings.options);
        if let Some(system_prompt) = &self.system_prompt {
            request = request.with_system_prompt(system_prompt.clone());
        }

        if !self.tools.is_empty() {
            if self.provider.capabilities().tools {
                request = request.with_tools(self.tools.list());
            } else {
                tracing::debug!(
                    provider = %self.provider_id(),
                    "provider cannot carry a tool catalog, omitting it"
                );
            }
        }

        request.validate()?;
        Ok(request)
    }

    async fn run_tool(
        &self,
        call: PendingCall,
    ) -> Result<Result<ToolInvocationResult, ToolError>, ChatError> {
        let provider = self.provider_id();
        self.hooks.on_tool_start(provider, &call.name, &call.id);
        let started = Instant::now();

        let outcome = match ToolInvocation::from_fragments(&call.id, &call.name, &call.arguments) {
            Ok(invocation) => self.spawn_tool(invocation).await?,
            Err(error) => Err(error),
        };

        match &outcome {
            Ok(_) => tracing::debug!(
                provider = %provider,
                tool_name = %call.name,
                invocation_id = %call.id,
                "tool call completed"
            ),
            Err(error) => tracing::warn!(
                provider = %provider,
                tool_name = %call.name,
                invocation_id = %call.id,
                error = %error,
                "tool call failed"
            ),
        }

        self.hooks.on_tool_finish(
            provider,
            &call.name,
            &call.id,
            outcome.as_ref(),
            started.elapsed(),
        );
        Ok(outcome)
    }

    async fn spawn_tool(
        &self,
        invocation: ToolInvocation,
    ) -> Result<Result<ToolInvocationResult, ToolError>, ChatError> {
        let runtime = Handle::try_current()
            .map_err(|_| ChatError::tooling("tool execution requires a tokio runtime"))?;

        let tools = Arc::clone(&self.tools);
        let context = self.tool_context.clone();
        let name = invocation.name.clone();
        let id = invocation.id.clone();

        let task = runtime.spawn(async move { tools.execute(invocation, &context).await });
        Ok(task.await.unwrap_or_else(|error| {
            Err(
                ToolError::execution_failed(format!("tool task ended abnormally: {error}"))
                    .with_tool_name(name)
                    .with_invocation_id(id),
            )
        }))
    }
}

impl Debug for ChatAdapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatAdapter")
            .field("provider", &self.config.provider)
            .field("endpoint", &self.config.endpoint())
            .field("model", &self.config.model)
            .field("tools", &self.tools.len())
            .field("history_window", &self.history_window)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct PendingCall {
    id: String,
    name: String,
    arguments: String,
    complete: bool,
}

/// Argument buffers keyed by correlation id, kept in start order.
#[derive(Debug, Default)]
struct PendingCalls {
    queue: VecDeque<PendingCall>,
}

impl PendingCalls {
    fn start(&mut self, id: String, name: String) {
        if self.find(&id).is_some() {
            tracing::warn!(invocation_id = %id, tool_name = %name, "duplicate tool call start ignored");
            return;
        }

        self.queue.push_back(PendingCall {
            id,
            name,
            arguments: String::new(),
            complete: false,
        });
    }

    fn append(&mut self, id: &str, fragment: &str) {
        match self.find(id) {
            Some(call) if !call.complete => call.arguments.push_str(fragment),
            _ => tracing::warn!(invocation_id = %id, "argument fragment for unknown tool call"),
        }
    }

    fn end(&mut self, id: &str) {
        match self.find(id) {
            Some(call) => call.complete = true,
            None => tracing::warn!(invocation_id = %id, "end for unknown tool call"),
        }
    }

    /// Complete calls at the front of the queue. A complete call waits for
    /// every call started before it.
    fn take_ready(&mut self) -> Vec<PendingCall> {
        let mut ready = Vec::new();
        while self.queue.front().is_some_and(|call| call.complete) {
            if let Some(call) = self.queue.pop_front() {
                ready.push(call);
            }
        }
        ready
    }

    fn take_all(&mut self) -> Vec<PendingCall> {
        self.queue.drain(..).collect()
    }

    fn find(&mut self, id: &str) -> Option<&mut PendingCall> {
        self.queue.iter_mut().find(|call| call.id == id)
    }
}

/// Reports the stream outcome exactly once, including on drop.
struct FinishGuard {
    hooks: Arc<dyn ChatHooks>,
    provider: ProviderId,
    started: Instant,
    finished: bool,
}

impl FinishGuard {
    fn new(hooks: Arc<dyn ChatHooks>, provider: ProviderId) -> Self {
        Self {
            hooks,
            provider,
            started: Instant::now(),
            finished: false,
        }
    }

    fn complete(&mut self) {
        self.report(StreamOutcome::Completed);
    }

    fn fail(&mut self, error: &ChatError) {
        self.report(StreamOutcome::Failed(error));
    }

    fn report(&mut self, outcome: StreamOutcome<'_>) {
        if self.finished {
            return;
        }

        self.finished = true;
        let elapsed: Duration = self.started.elapsed();
        self.hooks.on_stream_finish(self.provider, outcome, elapsed);
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(provider = %self.provider, "chat stream dropped before completion");
            self.report(StreamOutcome::Cancelled);
        }
    }
}
