//! Slack Events API receiver.
//!
//! Stateless: every request is verified, dispatched and acknowledged on its own.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;

use super::client::SlackClient;
use super::signature::{self, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::middleware::{add_tracing, handle_panic};

const CAPABILITIES: &str = "• View upcoming posts\n• Add new content ideas\n• Check posting schedule\n• Generate content suggestions";

#[derive(Clone)]
pub struct EventsState {
    client: Arc<SlackClient>,
    signing_secret: Arc<str>,
}

impl EventsState {
    pub fn new(client: SlackClient, signing_secret: &str) -> Self {
        Self {
            client: Arc::new(client),
            signing_secret: Arc::from(signing_secret),
        }
    }
}

pub fn router(state: EventsState) -> Router {
    let router = Router::new()
        .route("/slack/events", post(handle_event))
        .route("/health", get(health))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state);
    add_tracing(router)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    challenge: Option<String>,
    #[serde(default)]
    event: Option<InnerEvent>,
}

#[derive(Debug, Deserialize)]
struct InnerEvent {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    channel: Option<String>,
}

async fn handle_event(
    State(state): State<EventsState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    if let Err(e) = signature::verify(
        &state.signing_secret,
        header(TIMESTAMP_HEADER),
        header(SIGNATURE_HEADER),
        &body,
        chrono::Utc::now().timestamp(),
    ) {
        tracing::warn!(error = %e, "rejected slack request");
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Invalid request" })),
        )
            .into_response();
    }

    let envelope: EventEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable slack payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid payload" })),
            )
                .into_response();
        }
    };

    tracing::info!(kind = %envelope.kind, "received slack event");

    match (envelope.kind.as_str(), envelope.event) {
        ("event_callback", Some(event)) if event.kind == "app_mention" => {
            on_app_mention(&state.client, event).await;
        }
        ("event_callback", Some(event)) if event.kind == "app_home_opened" => {
            on_home_opened(&state.client, event).await;
        }
        ("url_verification", _) => {
            return Json(json!({ "challenge": envelope.challenge })).into_response();
        }
        _ => {}
    }

    Json(json!({ "status": "ok" })).into_response()
}

async fn on_app_mention(client: &SlackClient, event: InnerEvent) {
    let (Some(user), Some(channel)) = (event.user, event.channel) else {
        tracing::warn!("app_mention without user or channel");
        return;
    };

    let greeting = greeting_text(&user);
    if let Err(e) = client
        .post_message(&channel, &greeting, mention_blocks(&user))
        .await
    {
        tracing::error!(error = %e, channel = %channel, "failed to answer mention");
    }
}

async fn on_home_opened(client: &SlackClient, event: InnerEvent) {
    let Some(user) = event.user else {
        tracing::warn!("app_home_opened without user");
        return;
    };

    if let Err(e) = client.publish_view(&user, home_view(&user)).await {
        tracing::error!(error = %e, user = %user, "failed to publish home tab");
    }
}

fn greeting_text(user: &str) -> String {
    format!("Hello <@{user}>! I'm your Social Media Content Calendar bot.")
}

fn mrkdwn_section(text: &str) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": text }
    })
}

pub fn mention_blocks(user: &str) -> Value {
    json!([
        mrkdwn_section(&greeting_text(user)),
        mrkdwn_section(
            "I can help you manage your social media calendar. What would you like to do today?"
        ),
        mrkdwn_section(CAPABILITIES),
    ])
}

pub fn home_view(user: &str) -> Value {
    json!({
        "type": "home",
        "blocks": [
            mrkdwn_section(&format!(
                "👋 Hello <@{user}>! Welcome to your Social Media Content Calendar!"
            )),
            { "type": "divider" },
            mrkdwn_section("Here's what I can help you with:"),
            mrkdwn_section(CAPABILITIES),
            {
                "type": "context",
                "elements": [
                    { "type": "mrkdwn", "text": "🚀 Let's boost your content game!" }
                ]
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SECRET: &str = "test-signing-secret";

    fn signed_request(body: &str, secret: &str) -> Request<Body> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = signature::sign(secret, &timestamp, body.as_bytes());
        Request::builder()
            .method("POST")
            .uri("/slack/events")
            .header("content-type", "application/json")
            .header(TIMESTAMP_HEADER, timestamp)
            .header(SIGNATURE_HEADER, signature)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn app_with(slack_uri: &str) -> Router {
        router(EventsState::new(SlackClient::new("xoxb-test", slack_uri), SECRET))
    }

    #[tokio::test]
    async fn url_verification_echoes_challenge() {
        let app = app_with("http://127.0.0.1:9");
        let body = r#"{"type":"url_verification","challenge":"abc123"}"#;

        let (status, json) = send(app, signed_request(body, SECRET)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "challenge": "abc123" }));
    }

    #[tokio::test]
    async fn signature_is_checked_before_url_verification() {
        let app = app_with("http://127.0.0.1:9");
        let body = r#"{"type":"url_verification","challenge":"abc123"}"#;

        let (status, json) = send(app, signed_request(body, "wrong-secret")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "Invalid request");
    }

    #[tokio::test]
    async fn unsigned_requests_are_rejected() {
        let app = app_with("http://127.0.0.1:9");
        let request = Request::builder()
            .method("POST")
            .uri("/slack/events")
            .body(Body::from(r#"{"type":"event_callback"}"#))
            .unwrap();

        let (status, _) = send(app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn mention_posts_greeting_to_channel() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .and(body_partial_json(json!({
                "channel": "C42",
                "text": "Hello <@U7>! I'm your Social Media Content Calendar bot."
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let body = r#"{"type":"event_callback","event":{"type":"app_mention","user":"U7","channel":"C42"}}"#;
        let (status, json) = send(app_with(&server.uri()), signed_request(body, SECRET)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn home_opened_publishes_home_view() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/views.publish"))
            .and(body_partial_json(json!({ "user_id": "U9", "view": { "type": "home" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let body = r#"{"type":"event_callback","event":{"type":"app_home_opened","user":"U9"}}"#;
        let (status, _) = send(app_with(&server.uri()), signed_request(body, SECRET)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn slack_outage_still_acknowledges_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let body = r#"{"type":"event_callback","event":{"type":"app_mention","user":"U7","channel":"C42"}}"#;
        let (status, json) = send(app_with(&server.uri()), signed_request(body, SECRET)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_events_are_acknowledged() {
        let body = r#"{"type":"event_callback","event":{"type":"reaction_added"}}"#;
        let (status, json) = send(app_with("http://127.0.0.1:9"), signed_request(body, SECRET)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({ "status": "ok" }));
    }

    #[test]
    fn home_view_has_expected_layout() {
        let view = home_view("U1");
        let blocks = view["blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 5);
        assert_eq!(blocks[1]["type"], "divider");
        assert_eq!(blocks[4]["type"], "context");
    }
}
