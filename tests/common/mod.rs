//! Shared test utilities
#![allow(dead_code)]

use axum::{http::StatusCode, routing::post, Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use voicebot::controller::{
    ControllerEvent, EventSender, Presenter, Surface, UtteranceId,
};
use voicebot::dispatch::{DispatchChannel, DispatchError};
use voicebot::speech::{CaptureChannel, CaptureError, PlaybackChannel};

/// Everything the scripted channels observed
#[derive(Clone, Default)]
pub struct Script {
    pub queries: Arc<Mutex<Vec<String>>>,
    pub replies: Arc<Mutex<VecDeque<Result<String, DispatchError>>>>,
    pub spoken: Arc<Mutex<Vec<String>>>,
    pub capture_starts: Arc<Mutex<usize>>,
    pub capture_stops: Arc<Mutex<usize>>,
    pub capture_aborts: Arc<Mutex<usize>>,
    pub playback_cancels: Arc<Mutex<usize>>,
}

impl Script {
    /// Queue an outcome that the next dispatch posts immediately
    pub fn reply(&self, outcome: Result<String, DispatchError>) {
        self.replies.lock().push_back(outcome);
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().clone()
    }
}

/// Dispatch that records queries and posts queued replies, if any
pub struct ScriptedDispatch(pub Script);

impl DispatchChannel for ScriptedDispatch {
    fn dispatch(&self, query: String, events: EventSender) {
        self.0.queries.lock().push(query);
        if let Some(outcome) = self.0.replies.lock().pop_front() {
            events.send(ControllerEvent::Dispatch(outcome));
        }
    }
}

/// Capture whose results are injected by the test through the event sender
pub struct ScriptedCapture(pub Script);

impl CaptureChannel for ScriptedCapture {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self, _events: &EventSender) -> Result<(), CaptureError> {
        *self.0.capture_starts.lock() += 1;
        Ok(())
    }

    fn stop(&mut self) {
        *self.0.capture_stops.lock() += 1;
    }

    fn abort(&mut self) {
        *self.0.capture_aborts.lock() += 1;
    }
}

/// Playback that records text and hands out increasing utterance ids
pub struct ScriptedPlayback {
    script: Script,
    next: u64,
}

impl ScriptedPlayback {
    pub fn new(script: Script) -> Self {
        Self { script, next: 0 }
    }
}

impl PlaybackChannel for ScriptedPlayback {
    fn is_available(&self) -> bool {
        true
    }

    fn speak(&mut self, text: &str, _events: &EventSender) -> Option<UtteranceId> {
        self.script.spoken.lock().push(text.to_string());
        self.next += 1;
        Some(UtteranceId(self.next))
    }

    fn cancel(&mut self) {
        *self.script.playback_cancels.lock() += 1;
    }
}

/// Presenter that keeps every surface it was shown
#[derive(Default)]
pub struct RecordingPresenter {
    pub surfaces: Vec<Surface>,
}

impl RecordingPresenter {
    pub fn last(&self) -> &Surface {
        self.surfaces.last().expect("no surface presented")
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, surface: &Surface) {
        self.surfaces.push(surface.clone());
    }
}

/// Router mimicking the remote `/query` responder
pub fn query_router() -> Router {
    Router::new()
        .route("/query", post(answer))
        .route("/broken", post(|| async { (StatusCode::OK, "<html>oops</html>") }))
        .route(
            "/missing",
            post(|| async { Json(json!({ "answer": "wrong field" })) }),
        )
        .route(
            "/crash",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "response": "too late" }))
            }),
        )
}

async fn answer(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body.get("query").and_then(Value::as_str) {
        Some(query) if !query.is_empty() => (
            StatusCode::OK,
            Json(json!({ "response": format!("You asked: {}", query) })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No query provided" })),
        ),
    }
}

/// Serve `router` on an ephemeral port and return its base URL
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{}", addr)
}
