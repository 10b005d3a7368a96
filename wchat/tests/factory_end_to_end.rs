use std::sync::{Arc, Mutex};

use serde_json::json;
use wchat::prelude::*;
use wprovider::{ByteStream, HttpRequest, HttpTransport, ProviderError, ProviderFuture, ToolDeclaration};
use wtooling::optional_string;

#[derive(Debug, Default)]
struct ScriptedTransport {
    chunks: Vec<Vec<u8>>,
    captured: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    fn replaying(body: &[u8], chunk_size: usize) -> Self {
        Self {
            chunks: body.chunks(chunk_size).map(<[u8]>::to_vec).collect(),
            ..Self::default()
        }
    }

    fn last_body(&self) -> serde_json::Value {
        self.captured
            .lock()
            .expect("captured lock")
            .last()
            .map(|request| request.body.clone())
            .expect("a request should have been sent")
    }
}

impl HttpTransport for ScriptedTransport {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            self.captured.lock().expect("captured lock").push(request);
            Err(ProviderError::transport("single-shot calls are not scripted"))
        })
    }

    fn post_stream<'a>(
        &'a self,
        request: HttpRequest,
    ) -> ProviderFuture<'a, Result<ByteStream<'a>, ProviderError>> {
        Box::pin(async move {
            self.captured.lock().expect("captured lock").push(request);
            let chunks = self.chunks.clone().into_iter().map(Ok).collect::<Vec<_>>();
            Ok(Box::pin(futures_util::stream::iter(chunks)) as ByteStream<'a>)
        })
    }
}

fn travel_tools() -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register_sync_fn(
        ToolDeclaration::new("get_weather", "Current weather")
            .string_param("city", "City name")
            .required("city"),
        |args, _ctx| {
            let city = optional_string(&args, "city").unwrap_or_default();
            Ok(ToolInvocationResult::new(json!({ "message": format!("{city}: 晴") })))
        },
    );
    Arc::new(registry)
}

fn sse(records: &[serde_json::Value]) -> Vec<u8> {
    let mut body = String::new();
    for record in records {
        body.push_str(&format!("data: {record}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body.into_bytes()
}

async fn run(factory: &AdapterFactory, config: ProviderConfig) -> String {
    let adapter = factory.get_or_create(config).expect("adapter should build");
    let mut visible = String::new();
    adapter
        .chat_stream_with(
            &[Message::user("成都天气怎么样?")],
            |chunk| visible.push_str(chunk),
            ConfigOverride::default(),
        )
        .await
        .expect("exchange should complete");
    visible
}

#[tokio::test]
async fn openai_compatible_tool_calls_execute_for_every_chunk_size() {
    let body = sse(&[
        json!({"choices": [{"delta": {"content": "Checking"}}]}),
        json!({"choices": [{"delta": {"tool_calls": [
            {"index": 0, "id": "call_w", "function": {"name": "get_weather", "arguments": ""}}
        ]}}]}),
        json!({"choices": [{"delta": {"tool_calls": [
            {"index": 0, "function": {"arguments": "{\"city\":"}}
        ]}}]}),
        json!({"choices": [{"delta": {"tool_calls": [
            {"index": 0, "function": {"arguments": "\"成都\"}"}}
        ]}}]}),
        json!({"choices": [{"delta": {}, "finish_reason": "tool_calls"}]}),
    ]);

    for chunk_size in [1, 2, 3, 7, 64, body.len()] {
        let transport = Arc::new(ScriptedTransport::replaying(&body, chunk_size));
        let factory = AdapterFactory::new(travel_tools()).with_transport(transport.clone());

        let visible = run(&factory, ProviderConfig::new(ProviderId::OpenAi, "sk-test")).await;
        assert_eq!(
            visible,
            "Checking\n\n🔧 Invoking tool: get_weather...\n\n成都: 晴",
            "chunk size {chunk_size}"
        );

        let sent = transport.last_body();
        assert_eq!(sent["stream"], true);
        assert_eq!(sent["tools"][0]["function"]["name"], "get_weather");
    }
}

#[tokio::test]
async fn whole_tool_calls_without_index_each_execute() {
    let body = sse(&[
        json!({"choices": [{"delta": {"tool_calls": [
            {"id": "call_cd", "type": "function", "function": {"name": "get_weather", "arguments": "{\"city\":\"成都\"}"}}
        ]}}]}),
        json!({"choices": [{"delta": {"tool_calls": [
            {"id": "call_cq", "type": "function", "function": {"name": "get_weather", "arguments": "{\"city\":\"重庆\"}"}}
        ]}}]}),
        json!({"choices": [{"delta": {}, "finish_reason": "tool_calls"}]}),
    ]);

    let transport = Arc::new(ScriptedTransport::replaying(&body, 5));
    let factory = AdapterFactory::new(travel_tools()).with_transport(transport);

    let visible = run(&factory, ProviderConfig::new(ProviderId::Google, "gemini-key")).await;
    assert_eq!(
        visible,
        "\n\n🔧 Invoking tool: get_weather...\n\n成都: 晴\n\n🔧 Invoking tool: get_weather...\n\n重庆: 晴"
    );
}

#[tokio::test]
async fn ollama_streams_newline_delimited_json() {
    let body = [
        json!({"message": {"content": "Hi"}, "done": false}).to_string(),
        json!({"message": {"content": ""}, "done": true}).to_string(),
    ]
    .join("\n")
        + "\n";

    for chunk_size in [1, 5, body.len()] {
        let transport = Arc::new(ScriptedTransport::replaying(body.as_bytes(), chunk_size));
        let factory = AdapterFactory::new(travel_tools()).with_transport(transport.clone());

        let visible = run(&factory, ProviderConfig::new(ProviderId::Ollama, "")).await;
        assert_eq!(visible, "Hi");
        assert!(transport.last_body().get("options").is_none());
    }
}

#[tokio::test]
async fn anthropic_tool_use_runs_through_native_events() {
    let events = [
        json!({"type": "message_start", "message": {"model": "claude-3-5-sonnet-20241022", "usage": {"input_tokens": 9, "output_tokens": 1}}}),
        json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
        json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": "好的"}}),
        json!({"type": "content_block_stop", "index": 0}),
        json!({"type": "content_block_start", "index": 1, "content_block": {"type": "tool_use", "id": "toolu_1", "name": "get_weather", "input": {}}}),
        json!({"type": "content_block_delta", "index": 1, "delta": {"type": "input_json_delta", "partial_json": "{\"city\": \"成"}}),
        json!({"type": "content_block_delta", "index": 1, "delta": {"type": "input_json_delta", "partial_json": "都\"}"}}),
        json!({"type": "content_block_stop", "index": 1}),
        json!({"type": "message_delta", "delta": {"stop_reason": "tool_use"}, "usage": {"output_tokens": 20}}),
        json!({"type": "message_stop"}),
    ];
    let body = events
        .iter()
        .map(|event| format!("event: {}\ndata: {event}\n\n", event["type"].as_str().unwrap_or_default()))
        .collect::<String>();

    for chunk_size in [1, 11, body.len()] {
        let transport = Arc::new(ScriptedTransport::replaying(body.as_bytes(), chunk_size));
        let factory = AdapterFactory::new(travel_tools())
            .with_transport(transport.clone())
            .with_system_prompt("be brief");

        let visible = run(&factory, ProviderConfig::new(ProviderId::Anthropic, "sk-ant-test")).await;
        assert_eq!(visible, "好的\n\n🔧 Invoking tool: get_weather...\n\n成都: 晴");

        let sent = transport.last_body();
        assert_eq!(sent["system"], "be brief");
        assert_eq!(sent["tools"][0]["name"], "get_weather");
    }
}

#[tokio::test]
async fn factory_reuses_the_adapter_across_turns() {
    let transport = Arc::new(ScriptedTransport::replaying(&sse(&[]), 16));
    let factory = AdapterFactory::new(travel_tools()).with_transport(transport);

    let config = ProviderConfig::new(ProviderId::Doubao, "ark-key");
    let first = factory.get_or_create(config.clone()).expect("first build");
    let second = factory.get_or_create(config).expect("second build");
    assert!(Arc::ptr_eq(&first, &second));

    let current = factory.current().expect("slot should be filled");
    assert_eq!(current.provider_id(), ProviderId::Doubao);
}
