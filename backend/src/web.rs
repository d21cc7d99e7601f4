use crate::state::AppState;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::{
    extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use lorawatch_shared::{FeedMessage, WelcomeMsg};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

/// Public router constructor
pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(get_index))
        .route("/healthz", get(healthz))
        .route("/webhook/ttn", post(ttn_webhook))
        .route("/api/recent", get(get_recent))
        .route("/ws", get(ws_handler))
        .nest_service("/static", static_dir)
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// Reply to the TTN webhook. TTN expects a 200 even when nothing was forwarded.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    pub data_broadcasted: bool,
}

async fn healthz() -> &'static str {
    "ok"
}

async fn get_index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::warn!(path=%path.display(), error=%err, "index.html unavailable");
            (StatusCode::NOT_FOUND, "index.html not found").into_response()
        }
    }
}

async fn get_recent(State(state): State<Arc<AppState>>) -> Json<Vec<FeedMessage>> {
    Json(state.recent_messages())
}

/// `uplink_message.decoded_payload`, if the uplink carries one. `{}` counts as a payload.
pub fn decoded_payload(uplink: &Value) -> Option<&Value> {
    uplink
        .get("uplink_message")?
        .get("decoded_payload")
        .filter(|payload| !payload.is_null())
}

async fn ttn_webhook(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<WebhookResponse>, (StatusCode, String)> {
    let uplink: Value = serde_json::from_slice(&body).map_err(|err| {
        tracing::warn!(error=%err, "error decoding JSON from TTN webhook");
        (StatusCode::BAD_REQUEST, "Invalid JSON payload".to_string())
    })?;
    tracing::debug!(uplink=%uplink, "TTN webhook received");

    let Some(payload) = decoded_payload(&uplink) else {
        tracing::info!("no decoded payload found or payload is null");
        return Ok(Json(WebhookResponse {
            status: "Webhook received, but no relevant decoded payload found",
            data_broadcasted: false,
        }));
    };

    tracing::info!(payload=%payload, "broadcasting decoded payload");
    let delivered = state.broadcast(FeedMessage::ttn_data(payload.clone()));
    tracing::debug!(clients = delivered, "feed message delivered");

    Ok(Json(WebhookResponse {
        status: "Webhook received successfully",
        data_broadcasted: true,
    }))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(socket: WebSocket, state: Arc<AppState>) {
    let mut feed_rx = state.feed_tx.subscribe();
    let (mut sender, mut receiver) = socket.split();
    tracing::info!("client connected");

    let welcome = serde_json::to_string(&WelcomeMsg::default()).unwrap_or_default();
    if sender
        .send(Message::Text(Utf8Bytes::from(welcome)))
        .await
        .is_err()
    {
        tracing::info!("client disconnected before welcome");
        return;
    }

    // Task: server -> client
    let send_task = async move {
        loop {
            match feed_rx.recv().await {
                Ok(msg) => {
                    let text = match serde_json::to_string(&msg) {
                        Ok(text) => text,
                        Err(err) => {
                            tracing::error!(error=%err, "failed to encode feed message");
                            continue;
                        }
                    };
                    if let Err(err) = sender.send(Message::Text(Utf8Bytes::from(text))).await {
                        tracing::warn!(error=%err, "error sending to client");
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "client lagging, dropped feed messages");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    // Task: client -> server (logged only)
    let recv_task = async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    tracing::info!(text=%text.as_str(), "received from client");
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error=%err, "WebSocket error");
                    break;
                }
            }
        }
    };

    // Either side ending tears the connection down
    tokio::select! {
        _ = send_task => {}
        _ = recv_task => {}
    }
    tracing::info!("client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use lorawatch_shared::WELCOME_TEXT;
    use serde_json::json;
    use std::net::SocketAddr;
    use std::path::Path;
    use std::time::Duration;
    use tokio_tungstenite::tungstenite;
    use tower::ServiceExt;

    fn test_state(config: Config) -> Arc<AppState> {
        Arc::new(AppState::new(&config))
    }

    fn post_webhook(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook/ttn")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn decoded_payload_accepts_empty_object() {
        let uplink = json!({"uplink_message": {"decoded_payload": {}}});
        assert_eq!(decoded_payload(&uplink), Some(&json!({})));
        assert_eq!(decoded_payload(&json!({"uplink_message": {"decoded_payload": null}})), None);
        assert_eq!(decoded_payload(&json!({"uplink_message": []})), None);
        assert_eq!(decoded_payload(&json!([1, 2])), None);
    }

    #[tokio::test]
    async fn webhook_broadcasts_decoded_payload() {
        let state = test_state(Config::default());
        let mut rx = state.feed_tx.subscribe();
        let body = json!({
            "uplink_message": {
                "decoded_payload": {"transport": {"data": [0, 1, 42.5]}}
            }
        })
        .to_string();

        let resp = router(state.clone()).oneshot(post_webhook(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        assert_eq!(v["data_broadcasted"], true);

        let msg = rx.try_recv().unwrap();
        assert_eq!(msg.ty, "ttn_data");
        assert_eq!(msg.payload["transport"]["data"][2], 42.5);
    }

    #[tokio::test]
    async fn webhook_without_payload_is_acknowledged() {
        let state = test_state(Config::default());
        let body = json!({"end_device_ids": {"device_id": "node-1"}}).to_string();

        let resp = router(state.clone()).oneshot(post_webhook(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        assert_eq!(v["data_broadcasted"], false);
        assert!(state.recent_messages().is_empty());
    }

    #[tokio::test]
    async fn webhook_rejects_invalid_json() {
        let state = test_state(Config::default());
        let resp = router(state).oneshot(post_webhook("{not json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn recent_lists_newest_first() {
        let state = test_state(Config::default());
        state.broadcast(FeedMessage::ttn_data(json!({"seq": 1})));
        state.broadcast(FeedMessage::ttn_data(json!({"seq": 2})));

        let resp = router(state)
            .oneshot(Request::builder().uri("/api/recent").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        assert_eq!(v[0]["payload"]["seq"], 2);
        assert_eq!(v[1]["payload"]["seq"], 1);
    }

    #[tokio::test]
    async fn index_missing_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(Config {
            static_dir: dir.path().join("nope"),
            ..Config::default()
        });
        let resp = router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn index_is_served_from_static_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>feed</h1>").unwrap();
        let state = test_state(Config {
            static_dir: dir.path().to_path_buf(),
            ..Config::default()
        });
        let resp = router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>feed</h1>");
    }

    #[tokio::test]
    async fn healthz_ok() {
        let state = test_state(Config::default());
        let resp = router(state)
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn static_assets_are_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('feed');").unwrap();
        let state = test_state(Config {
            static_dir: dir.path().to_path_buf(),
            ..Config::default()
        });

        let resp = router(state.clone())
            .oneshot(Request::builder().uri("/static/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        assert_eq!(&bytes[..], b"console.log('feed');");

        let resp = router(state)
            .oneshot(Request::builder().uri("/static/missing.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn shipped_index_page_is_served() {
        let state = test_state(Config {
            static_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("static"),
            ..Config::default()
        });
        let resp = router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/ws"));
    }

    async fn serve(state: Arc<AppState>) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });
        addr
    }

    async fn next_json<S>(ws: &mut S) -> Value
    where
        S: futures::Stream<Item = Result<tungstenite::Message, tungstenite::Error>> + Unpin,
    {
        loop {
            let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("socket closed")
                .unwrap();
            if let tungstenite::Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    #[tokio::test]
    async fn ws_sends_welcome_then_forwards_feed() {
        let state = test_state(Config::default());
        let addr = serve(state.clone()).await;
        let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
            .await
            .unwrap();

        let first = next_json(&mut ws).await;
        assert_eq!(first["message"], WELCOME_TEXT);

        // The client subscribed before the welcome went out
        let reading = json!({"transport": {"data": [0, 1, 42.5]}});
        let sent = state.broadcast(FeedMessage::ttn_data(reading));
        assert_eq!(sent, 1);

        let second = next_json(&mut ws).await;
        assert_eq!(second["type"], "ttn_data");
        assert_eq!(second["payload"]["transport"]["data"][2], 42.5);
    }

    #[tokio::test]
    async fn lagging_client_skips_ahead_and_stays_connected() {
        let state = test_state(Config {
            feed_capacity: 2,
            ..Config::default()
        });
        let addr = serve(state.clone()).await;
        let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
            .await
            .unwrap();
        assert_eq!(next_json(&mut ws).await["message"], WELCOME_TEXT);

        // The server task cannot run between these sends, so it falls behind.
        for seq in 0..5 {
            state.broadcast(FeedMessage::ttn_data(json!({ "seq": seq })));
        }

        let mut seen = Vec::new();
        loop {
            let seq = next_json(&mut ws).await["payload"]["seq"].as_i64().unwrap();
            seen.push(seq);
            if seq == 4 {
                break;
            }
        }
        assert!(seen[0] > 0, "expected skipped messages, got {seen:?}");
        assert!(seen.len() < 5);

        state.broadcast(FeedMessage::ttn_data(json!({"seq": 5})));
        assert_eq!(next_json(&mut ws).await["payload"]["seq"], 5);
    }
}
