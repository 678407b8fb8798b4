use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::time;

/// Stands in for the platform receiving the exported results and room status.
#[derive(Clone, Default)]
pub struct WebhookCapture {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl WebhookCapture {
    /// Starts the capturing server and returns it with its base url.
    pub async fn spawn() -> (WebhookCapture, String) {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind the webhook port.");
        let address = listener.local_addr().unwrap();
        let capture = WebhookCapture::default();

        let router = Router::new()
            .route("/*path", post(capture_request))
            .with_state(capture.clone());
        tokio::spawn(async move { axum::serve(listener, router).await });

        (capture, format!("http://{address}"))
    }

    /// Waits until a request on `path` arrives whose body satisfies `predicate`.
    pub async fn wait_for(&self, path: &str, predicate: impl Fn(&Value) -> bool) -> Value {
        for _ in 0..50 {
            let found = self
                .requests
                .lock()
                .unwrap()
                .iter()
                .find(|(request_path, body)| request_path == path && predicate(body))
                .map(|(_, body)| body.clone());
            if let Some(body) = found {
                return body;
            }
            time::sleep(Duration::from_millis(100)).await;
        }
        panic!("No request matching the predicate was received on '{path}'.");
    }
}

async fn capture_request(
    State(capture): State<WebhookCapture>,
    Path(path): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    capture.requests.lock().unwrap().push((path, body));
    StatusCode::OK
}
