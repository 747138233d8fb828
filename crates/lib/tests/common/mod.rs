//! Throwaway HTTP server standing in for the Gemini, Bitrix24 and Telegram endpoints.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request seen by the fake server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    response: String,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

/// Handle to a running fake: its base URL and the requests it has received.
#[derive(Clone)]
pub struct Fake {
    pub base_url: String,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

impl Fake {
    pub fn requests(&self) -> Vec<Recorded> {
        self.seen.lock().unwrap().clone()
    }

    /// Requests whose path ends with `suffix`.
    pub fn requests_to(&self, suffix: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.ends_with(suffix))
            .collect()
    }

    /// Poll until `count` requests ending in `suffix` arrived, or 5s pass.
    pub async fn wait_for(&self, suffix: &str, count: usize) -> Vec<Recorded> {
        for _ in 0..100 {
            let got = self.requests_to(suffix);
            if got.len() >= count {
                return got;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.requests_to(suffix)
    }
}

async fn answer(
    State(state): State<FakeState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.seen.lock().unwrap().push(Recorded {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.response.clone(),
    )
}

/// Serve every path with the same status and body on a free loopback port.
pub async fn spawn_fake(status: StatusCode, response: &str) -> Fake {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState {
        status,
        response: response.to_string(),
        seen: seen.clone(),
    };
    let app = Router::new().fallback(answer).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake server");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Fake {
        base_url: format!("http://{}", addr),
        seen,
    }
}

pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    listener.local_addr().expect("local_addr").port()
}
