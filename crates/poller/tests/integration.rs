//! Integration tests against fake Practicum and Telegram HTTP servers.
//!
//! Both upstreams are small axum apps bound to an ephemeral localhost port, so
//! the real `reqwest` transports are exercised end to end:
//!
//! ```bash
//! cargo test -p homework-poller --test integration
//! ```

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{Json, Router};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};

use homework_common::error::{DeliveryError, FetchError};
use homework_notifier::{MessageSender, Notifier, TelegramSender};
use homework_poller::{CycleOutcome, HomeworkSource, PollCycle, PracticumClient};

// ============================================================
// Fake upstreams
// ============================================================

const HOMEWORK_PATH: &str = "/api/user_api/homework_statuses/";
const BOT_TOKEN: &str = "TEST-TOKEN";
const CHAT_ID: &str = "100500";

/// Canned responses plus a log of what the server received.
#[derive(Clone, Default)]
struct Upstream {
    replies: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
    received: Arc<Mutex<Vec<Value>>>,
}

impl Upstream {
    fn reply(&self, status: StatusCode, body: impl Into<String>) {
        self.replies.lock().unwrap().push_back((status, body.into()));
    }

    fn next_reply(&self) -> (StatusCode, String) {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((StatusCode::OK, json!({"ok": true}).to_string()))
    }

    fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

async fn homework_statuses(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    upstream.received.lock().unwrap().push(json!({
        "authorization": authorization,
        "from_date": params.get("from_date"),
    }));
    upstream.next_reply()
}

async fn send_message(
    State(upstream): State<Upstream>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    upstream.received.lock().unwrap().push(body);
    upstream.next_reply()
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn practicum() -> (Upstream, PracticumClient) {
    let upstream = Upstream::default();
    let router = Router::new()
        .route(HOMEWORK_PATH, get(homework_statuses))
        .with_state(upstream.clone());
    let addr = serve(router).await;
    let client = PracticumClient::new(
        reqwest::Client::new(),
        format!("http://{addr}{HOMEWORK_PATH}"),
        "practicum-secret".to_string(),
    );
    (upstream, client)
}

async fn telegram() -> (Upstream, TelegramSender) {
    let upstream = Upstream::default();
    let router = Router::new()
        .route(&format!("/bot{BOT_TOKEN}/sendMessage"), post(send_message))
        .with_state(upstream.clone());
    let addr = serve(router).await;
    let sender = TelegramSender::new(
        reqwest::Client::new(),
        format!("http://{addr}/"),
        BOT_TOKEN.to_string(),
        CHAT_ID.to_string(),
    );
    (upstream, sender)
}

// ============================================================
// PracticumClient
// ============================================================

#[tokio::test]
async fn test_fetch_sends_oauth_header_and_cursor() {
    let (upstream, client) = practicum().await;
    upstream.reply(
        StatusCode::OK,
        json!({"homeworks": [], "current_date": 1700000000}).to_string(),
    );

    let payload = client.fetch(1699999400).await.unwrap();

    assert_eq!(payload, json!({"homeworks": [], "current_date": 1700000000}));
    assert_eq!(
        upstream.received(),
        vec![json!({"authorization": "OAuth practicum-secret", "from_date": "1699999400"})]
    );
}

#[tokio::test]
async fn test_fetch_non_200_is_status_error() {
    let (upstream, client) = practicum().await;
    upstream.reply(StatusCode::SERVICE_UNAVAILABLE, "");

    let err = client.fetch(0).await.unwrap_err();

    assert!(matches!(err, FetchError::Status(503)));
}

#[tokio::test]
async fn test_fetch_non_json_body_is_decode_error() {
    let (upstream, client) = practicum().await;
    upstream.reply(StatusCode::OK, "<html>maintenance</html>");

    let err = client.fetch(0).await.unwrap_err();

    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn test_fetch_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = PracticumClient::new(
        reqwest::Client::new(),
        format!("http://{addr}{HOMEWORK_PATH}"),
        "practicum-secret".to_string(),
    );
    let err = client.fetch(0).await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
}

// ============================================================
// TelegramSender
// ============================================================

#[tokio::test]
async fn test_send_message_posts_chat_and_text() {
    let (upstream, sender) = telegram().await;

    sender.send_message("Привет").await.unwrap();

    assert_eq!(
        upstream.received(),
        vec![json!({"chat_id": CHAT_ID, "text": "Привет"})]
    );
}

#[tokio::test]
async fn test_send_message_rejected() {
    let (upstream, sender) = telegram().await;
    upstream.reply(
        StatusCode::BAD_REQUEST,
        json!({"ok": false, "description": "Bad Request: chat not found"}).to_string(),
    );

    let err = sender.send_message("hello").await.unwrap_err();

    match err {
        DeliveryError::Rejected { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("chat not found"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

// ============================================================
// Full cycle
// ============================================================

#[tokio::test]
async fn test_cycle_relays_status_change_to_chat() {
    let (api, client) = practicum().await;
    let (chat, sender) = telegram().await;
    api.reply(
        StatusCode::OK,
        json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1000
        })
        .to_string(),
    );
    api.reply(
        StatusCode::OK,
        json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1100
        })
        .to_string(),
    );

    let mut cycle = PollCycle::new(client, Notifier::new(sender), 0, Duration::from_secs(600));

    let expected = "Изменился статус проверки работы \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!";
    assert_eq!(
        cycle.run_once().await,
        CycleOutcome::StatusChanged(expected.to_string())
    );
    assert_eq!(cycle.run_once().await, CycleOutcome::StatusUnchanged);

    assert_eq!(cycle.cursor(), 1100);
    assert_eq!(chat.received(), vec![json!({"chat_id": CHAT_ID, "text": expected})]);
    let from_dates: Vec<Value> = api.received().iter().map(|r| r["from_date"].clone()).collect();
    assert_eq!(from_dates, vec![json!("0"), json!("1000")]);
}

#[tokio::test]
async fn test_cycle_reports_malformed_payload_once() {
    let (api, client) = practicum().await;
    let (chat, sender) = telegram().await;
    for _ in 0..2 {
        api.reply(
            StatusCode::OK,
            json!({"homeworks": "not-a-list", "current_date": 2000}).to_string(),
        );
    }

    let mut cycle = PollCycle::new(client, Notifier::new(sender), 1500, Duration::from_secs(600));

    assert!(matches!(cycle.run_once().await, CycleOutcome::Failed(_)));
    assert!(matches!(cycle.run_once().await, CycleOutcome::Failed(_)));

    assert_eq!(cycle.cursor(), 1500);
    let sent = chat.received();
    assert_eq!(sent.len(), 1);
    assert!(
        sent[0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Сбой в работе программы: ")
    );
}

#[tokio::test]
async fn test_cycle_survives_unreachable_chat() {
    let (api, client) = practicum().await;
    let (chat, sender) = telegram().await;
    api.reply(
        StatusCode::OK,
        json!({
            "homeworks": [{"homework_name": "hw1", "status": "rejected"}],
            "current_date": 3000
        })
        .to_string(),
    );
    chat.reply(StatusCode::INTERNAL_SERVER_ERROR, "");

    let mut cycle = PollCycle::new(client, Notifier::new(sender), 0, Duration::from_secs(600));

    assert!(matches!(cycle.run_once().await, CycleOutcome::StatusChanged(_)));
    assert_eq!(cycle.cursor(), 3000);
    assert_eq!(cycle.notifier().last_sent(), None);
}
