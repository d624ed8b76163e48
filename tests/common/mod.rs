#![allow(dead_code)]

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use payment_dashboard::client::PaymentClient;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub delay: Duration,
}

impl Reply {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status"),
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub field: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

#[derive(Debug)]
pub struct BackendState {
    pub upload: Reply,
    pub stats_queue: VecDeque<Reply>,
    pub stats: Reply,
    pub reminders: Reply,
    pub uploads: Vec<ReceivedFile>,
    pub stats_hits: usize,
    pub reminder_bodies: Vec<Value>,
    pub connectivity_hits: usize,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            upload: Reply::new(200, json!({ "message": "ok", "rows": 42, "columns": 5 })),
            stats_queue: VecDeque::new(),
            stats: Reply::new(200, stats_body(10, 6, 3, 1)),
            reminders: Reply::new(200, json!({ "message": "3 reminders generated" })),
            uploads: Vec::new(),
            stats_hits: 0,
            reminder_bodies: Vec::new(),
            connectivity_hits: 0,
        }
    }
}

pub fn stats_body(total: u64, full: u64, partial: u64, none: u64) -> Value {
    json!({
        "total_people": total,
        "paid_full": full,
        "paid_partial": partial,
        "not_paid": none,
    })
}

type Shared = Arc<Mutex<BackendState>>;

/// In-memory stand-in for the payments service.
pub struct FakeBackend {
    pub base_url: String,
    state: Shared,
    task: Option<JoinHandle<()>>,
}

impl FakeBackend {
    /// Serves on the current runtime; stops with the test.
    pub async fn start() -> Self {
        let state: Shared = Arc::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend addr");
        let app = router(Arc::clone(&state));
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend crashed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            task: Some(task),
        }
    }

    /// Serves from a dedicated thread so the backend outlives any single test runtime.
    pub fn start_on_thread() -> Self {
        let state: Shared = Arc::default();
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake backend");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().expect("fake backend addr");
        let app = router(Arc::clone(&state));

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("fake backend runtime");
            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("fake backend crashed");
            });
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            task: None,
        }
    }

    pub fn client(&self) -> PaymentClient {
        PaymentClient::new(self.base_url.clone()).expect("client")
    }

    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().expect("backend state")
    }

    pub fn reset(&self) {
        *self.state() = BackendState::default();
    }

    pub fn set_upload(&self, reply: Reply) {
        self.state().upload = reply;
    }

    pub fn set_stats(&self, reply: Reply) {
        self.state().stats = reply;
    }

    pub fn queue_stats(&self, reply: Reply) {
        self.state().stats_queue.push_back(reply);
    }

    pub fn set_reminders(&self, reply: Reply) {
        self.state().reminders = reply;
    }

    pub fn uploads(&self) -> Vec<ReceivedFile> {
        self.state().uploads.clone()
    }

    pub fn stats_hits(&self) -> usize {
        self.state().stats_hits
    }

    pub fn reminder_hits(&self) -> usize {
        self.state().reminder_bodies.len()
    }

    pub fn connectivity_hits(&self) -> usize {
        self.state().connectivity_hits
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/test", get(connectivity_check))
        .route("/upload", post(upload))
        .route("/payment-stats", get(payment_stats))
        .route("/send-reminders", post(send_reminders))
        .with_state(state)
}

async fn respond(reply: Reply) -> (StatusCode, Json<Value>) {
    if !reply.delay.is_zero() {
        sleep(reply.delay).await;
    }
    (reply.status, Json(reply.body))
}

async fn connectivity_check(State(state): State<Shared>) -> Json<Value> {
    state.lock().expect("backend state").connectivity_hits += 1;
    Json(json!({ "message": "backend reachable" }))
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    let mut received = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content = field.bytes().await.map(|bytes| bytes.to_vec()).unwrap_or_default();
        received.push(ReceivedFile {
            field: name,
            file_name,
            content,
        });
    }

    let reply = {
        let mut guard = state.lock().expect("backend state");
        guard.uploads.extend(received);
        guard.upload.clone()
    };
    respond(reply).await
}

async fn payment_stats(State(state): State<Shared>) -> (StatusCode, Json<Value>) {
    let reply = {
        let mut guard = state.lock().expect("backend state");
        guard.stats_hits += 1;
        match guard.stats_queue.pop_front() {
            Some(reply) => reply,
            None => guard.stats.clone(),
        }
    };
    respond(reply).await
}

async fn send_reminders(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let reply = {
        let mut guard = state.lock().expect("backend state");
        guard.reminder_bodies.push(body);
        guard.reminders.clone()
    };
    respond(reply).await
}

/// A base URL nothing listens on.
pub fn unreachable_client() -> PaymentClient {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    PaymentClient::new(format!("http://127.0.0.1:{port}")).expect("client")
}

pub async fn eventually(what: &str, condition: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(3);
    while !condition() {
        if Instant::now() > deadline {
            panic!("timed out waiting for {what}");
        }
        sleep(Duration::from_millis(20)).await;
    }
}
