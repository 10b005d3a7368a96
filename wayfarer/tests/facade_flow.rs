use std::sync::Arc;

use serde_json::json;
use wayfarer::prelude::*;
use wayfarer::{
    BoxedEventStream, ModelRequest, ModelResponse, ProviderFuture, StreamEvent, VecEventStream,
};

#[derive(Debug)]
struct ReplayProvider {
    events: Vec<StreamEvent>,
}

impl ModelProvider for ReplayProvider {
    fn id(&self) -> ProviderId {
        ProviderId::DeepSeek
    }

    fn complete<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            Ok(ModelResponse {
                provider: ProviderId::DeepSeek,
                model: request.model,
                content: "ok".to_string(),
                tool_calls: Vec::new(),
                usage: Default::default(),
            })
        })
    }

    fn stream<'a>(
        &'a self,
        _request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
        let events = self.events.clone();
        Box::pin(async move { Ok(Box::pin(VecEventStream::new(events)) as BoxedEventStream<'a>) })
    }
}

fn tools() -> Arc<ToolRegistry> {
    let mut tools = ToolRegistry::new();
    tools.register_sync_fn(
        ToolDeclaration::new("search_attractions", "Attractions in a city")
            .string_param("city", "City name")
            .required("city"),
        |args, _ctx| {
            let city = wayfarer::required_string(&args, "city")?;
            let summary = format!("{city}: 宽窄巷子, 武侯祠");
            Ok(ToolInvocationResult::new(json!({ "message": summary })))
        },
    );
    Arc::new(tools)
}

#[tokio::test]
async fn facade_types_drive_a_tool_round_trip() {
    let provider = ReplayProvider {
        events: vec![
            StreamEvent::TextDelta("Let me look.".to_string()),
            StreamEvent::ToolCallStart {
                id: "call_1".to_string(),
                name: "search_attractions".to_string(),
            },
            StreamEvent::ToolCallArguments {
                id: "call_1".to_string(),
                fragment: r#"{"city":"成都"}"#.to_string(),
            },
            StreamEvent::ToolCallEnd {
                id: "call_1".to_string(),
            },
            StreamEvent::Completed,
        ],
    };

    let adapter = ChatAdapter::new(wf_config!(deepseek, "sk-test"), Arc::new(provider), tools())
        .with_hooks(Arc::new(SafeChatHooks::new(MetricsChatHooks)));

    let messages = wf_messages![
        user => "plan 2 days in Chengdu",
        assistant => "Sure.",
        user => "what should I see?",
    ];

    let mut visible = String::new();
    adapter
        .chat_stream_with(&messages, |chunk| visible.push_str(chunk), ConfigOverride::default())
        .await
        .expect("exchange should complete");

    assert_eq!(
        visible,
        "Let me look.\n\n🔧 Invoking tool: search_attractions...\n\n成都: 宽窄巷子, 武侯祠"
    );
}

#[tokio::test]
async fn facade_chat_returns_the_final_reply() {
    let provider = ReplayProvider { events: Vec::new() };
    let adapter = ChatAdapter::new(wf_config!(deepseek, "sk-test"), Arc::new(provider), tools());

    let response = adapter
        .chat(&[user_message("hi")], ConfigOverride::default())
        .await
        .expect("chat should succeed");

    assert_eq!(response.content, "ok");
}
