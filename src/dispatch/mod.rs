//! Dispatch channel: one request/response exchange per query

pub mod client;

pub use client::{parse_reply, QueryClient};

use crate::controller::{ControllerEvent, EventSender};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Connection failure or timeout
    #[error("{0}")]
    Network(String),

    #[error("HTTP error! status: {status}{}", .detail.as_ref().map(|d| format!(" ({})", d)).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },

    #[error("malformed response: {0}")]
    MalformedPayload(String),
}

/// Sends a query and posts the outcome as a [`ControllerEvent::Dispatch`]
pub trait DispatchChannel {
    fn dispatch(&self, query: String, events: EventSender);
}

/// Posts exactly one dispatch outcome.
///
/// Dropped without [`DispatchGuard::complete`], e.g. when the task panics or
/// its runtime shuts down, it posts a network failure instead.
pub struct DispatchGuard {
    events: Option<EventSender>,
}

impl DispatchGuard {
    pub const ABORTED: &'static str = "dispatch aborted";

    pub fn new(events: EventSender) -> Self {
        Self {
            events: Some(events),
        }
    }

    pub fn complete(mut self, outcome: Result<String, DispatchError>) {
        if let Some(events) = self.events.take() {
            events.send(ControllerEvent::Dispatch(outcome));
        }
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        if let Some(events) = self.events.take() {
            warn!("Dispatch ended without an outcome");
            events.send(ControllerEvent::Dispatch(Err(DispatchError::Network(
                Self::ABORTED.to_string(),
            ))));
        }
    }
}

/// HTTP dispatch running each exchange on a tokio runtime
#[derive(Clone)]
pub struct HttpDispatch {
    client: Arc<QueryClient>,
    runtime: Handle,
}

impl HttpDispatch {
    pub fn new(client: QueryClient, runtime: Handle) -> Self {
        Self {
            client: Arc::new(client),
            runtime,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }
}

impl DispatchChannel for HttpDispatch {
    fn dispatch(&self, query: String, events: EventSender) {
        let client = Arc::clone(&self.client);
        let guard = DispatchGuard::new(events);
        self.runtime.spawn(async move {
            let outcome = client.send(&query).await;
            if let Err(e) = &outcome {
                warn!("Query to {} failed: {}", client.endpoint(), e);
            }
            guard.complete(outcome);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::event_channel;

    #[test]
    fn test_guard_posts_outcome_once() {
        let (tx, rx) = event_channel();
        DispatchGuard::new(tx).complete(Ok("hi".into()));

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(received, vec![ControllerEvent::Dispatch(Ok("hi".into()))]);
    }

    #[test]
    fn test_dropped_guard_posts_failure() {
        let (tx, rx) = event_channel();
        drop(DispatchGuard::new(tx));

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![ControllerEvent::Dispatch(Err(DispatchError::Network(
                DispatchGuard::ABORTED.into()
            )))]
        );
    }

    #[tokio::test]
    async fn test_panicking_task_still_posts() {
        let (tx, rx) = event_channel();
        let guard = DispatchGuard::new(tx);
        let task = tokio::spawn(async move {
            let _guard = guard;
            panic!("exchange blew up");
        });
        assert!(task.await.unwrap_err().is_panic());

        assert!(matches!(
            rx.try_recv(),
            Ok(ControllerEvent::Dispatch(Err(DispatchError::Network(_))))
        ));
    }

    #[test]
    fn test_shutdown_runtime_releases_pending_dispatch() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let (tx, rx) = event_channel();
        let guard = DispatchGuard::new(tx);
        runtime.spawn(async move {
            let _guard = guard;
            std::future::pending::<()>().await;
        });
        drop(runtime);

        assert!(matches!(
            rx.try_recv(),
            Ok(ControllerEvent::Dispatch(Err(DispatchError::Network(_))))
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = DispatchError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(err.to_string(), "HTTP error! status: 500");

        let err = DispatchError::Status {
            status: 400,
            detail: Some("No query provided".into()),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error! status: 400 (No query provided)"
        );
    }
}
