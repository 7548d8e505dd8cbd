use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use linkbrief::ai::LlmClient;
use linkbrief::core::dedup::DedupCache;
use linkbrief::slack::{InboundEvent, SlackClient};
use linkbrief::worker::BotState;
use linkbrief::worker::handler::handle_message_event;

/// End-to-end router test against a mock web server standing in for the
/// linked pages, the OpenAI endpoint, and Slack's `chat.postMessage`.

fn chat_completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 10, "total_tokens": 20}
    })
}

fn event_with_links(channel: &str, ts: &str, urls: &[String]) -> InboundEvent {
    let items: Vec<serde_json::Value> = urls
        .iter()
        .map(|url| json!({"type": "link", "url": url}))
        .collect();

    InboundEvent {
        channel: channel.to_string(),
        event_ts: ts.to_string(),
        thread_ts: ts.to_string(),
        is_edit: false,
        blocks: vec![json!({
            "type": "rich_text",
            "elements": [{"type": "rich_text_section", "elements": items}]
        })],
    }
}

fn bot_state(server: &MockServer) -> Arc<BotState> {
    Arc::new(BotState {
        dedup: DedupCache::new(100, Duration::from_secs(60)),
        llm: LlmClient::new(
            "test-key".to_string(),
            Some("gpt-4o".to_string()),
            "ja".to_string(),
        )
        .with_api_base(server.uri()),
        slack: SlackClient::new("xoxb-test".to_string())
            .with_post_url(format!("{}/api/chat.postMessage", server.uri())),
    })
}

#[tokio::test]
async fn failing_fetch_does_not_abort_the_sibling_link() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Page Two</title></head>\
             <body><p>Second page body.</p></body></html>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion_body(
            r#"{"summary": "Second page summary", "language": "ja"}"#,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let state = bot_state(&server);
    let links = vec![
        format!("{}/page1", server.uri()),
        format!("{}/page2", server.uri()),
    ];

    handle_message_event(state, event_with_links("C1", "1700000000.000100", &links)).await;

    let requests = server.received_requests().await.unwrap();
    let count = |p: &str| requests.iter().filter(|r| r.url.path() == p).count();

    assert_eq!(count("/page1"), 1, "the failing link must be fetched once");
    assert_eq!(count("/page2"), 1, "the sibling link must still be fetched");
    assert_eq!(
        count("/chat/completions"),
        1,
        "only the fetched page reaches the summarize step"
    );
    assert_eq!(
        count("/api/chat.postMessage"),
        1,
        "the surviving link's summary must still be posted"
    );

    let post = requests
        .iter()
        .find(|r| r.url.path() == "/api/chat.postMessage")
        .expect("a chat.postMessage request");
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["channel"], "C1");
    assert_eq!(body["thread_ts"], "1700000000.000100");
    assert!(
        body["text"]
            .as_str()
            .unwrap()
            .contains("Second page summary"),
        "the posted reply should carry the sibling link's summary"
    );
}

#[tokio::test]
async fn duplicate_event_delivery_runs_the_pipeline_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Page</title></head><body><p>Body.</p></body></html>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion_body(
            r#"{"summary": "A summary", "language": "ja"}"#,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat.postMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let state = bot_state(&server);
    let links = vec![format!("{}/page", server.uri())];
    let event = event_with_links("C1", "1700000000.000200", &links);

    handle_message_event(Arc::clone(&state), event.clone()).await;
    handle_message_event(state, event).await;

    let requests = server.received_requests().await.unwrap();
    let fetches = requests.iter().filter(|r| r.url.path() == "/page").count();
    assert_eq!(fetches, 1, "the redelivered event must be suppressed");
}
