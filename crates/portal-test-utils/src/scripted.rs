// SPDX-FileCopyrightText: 2026 Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted in-memory transport for deterministic testing.
//!
//! `ScriptedTransport` implements `Transport` with per-route replies,
//! enabling fast, CI-runnable tests without a backend. Replies can be held
//! behind a [`Gate`] so a test can observe state while a request is still
//! in flight.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, Notify};
use tracing::debug;

use portal_core::{Method, Transport, TransportError};

/// A request observed by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Holds a scripted reply until the test releases it.
#[derive(Clone, Default)]
pub struct Gate {
    inner: Arc<GateInner>,
}

#[derive(Default)]
struct GateInner {
    entered: Notify,
    released: Notify,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves once a request has reached this gate.
    pub async fn entered(&self) {
        self.inner.entered.notified().await;
    }

    /// Lets one waiting (or the next arriving) request through.
    pub fn open(&self) {
        self.inner.released.notify_one();
    }

    async fn pass(&self) {
        self.inner.entered.notify_one();
        self.inner.released.notified().await;
    }
}

#[derive(Clone)]
struct Scripted {
    reply: Result<Value, TransportError>,
    gate: Option<Gate>,
}

#[derive(Default)]
struct Route {
    queued: VecDeque<Scripted>,
    sticky: Option<Scripted>,
}

impl Route {
    fn next(&mut self) -> Option<Scripted> {
        self.queued.pop_front().or_else(|| self.sticky.clone())
    }
}

#[derive(Default)]
struct State {
    routes: HashMap<(Method, String), Route>,
    calls: Vec<RecordedCall>,
}

/// A transport that answers from a script instead of the network.
///
/// One-shot replies (`once`) are consumed first, in order; after that the
/// route's sticky reply (`on`) answers every call. Unscripted routes answer
/// HTTP 404.
#[derive(Default)]
pub struct ScriptedTransport {
    state: Mutex<State>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every call to `method path` with `reply`.
    pub fn on(mut self, method: Method, path: &str, reply: Result<Value, TransportError>) -> Self {
        self.route_mut(method, path).sticky = Some(Scripted { reply, gate: None });
        self
    }

    /// Answer the next call to `method path` with `reply`.
    pub fn once(mut self, method: Method, path: &str, reply: Result<Value, TransportError>) -> Self {
        self.route_mut(method, path)
            .queued
            .push_back(Scripted { reply, gate: None });
        self
    }

    /// Like [`once`](Self::once), but the reply is held until `gate` opens.
    pub fn once_gated(
        mut self,
        method: Method,
        path: &str,
        reply: Result<Value, TransportError>,
        gate: &Gate,
    ) -> Self {
        self.route_mut(method, path).queued.push_back(Scripted {
            reply,
            gate: Some(gate.clone()),
        });
        self
    }

    /// Queue a one-shot reply on a transport that is already shared.
    pub async fn push_once(
        &self,
        method: Method,
        path: &str,
        reply: Result<Value, TransportError>,
        gate: Option<&Gate>,
    ) {
        let mut state = self.state.lock().await;
        state
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .queued
            .push_back(Scripted {
                reply,
                gate: gate.cloned(),
            });
    }

    /// Number of calls made to `method path` so far.
    pub async fn calls(&self, method: Method, path: &str) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    /// Every call made so far, in arrival order.
    pub async fn recorded(&self) -> Vec<RecordedCall> {
        self.state.lock().await.calls.clone()
    }

    fn route_mut(&mut self, method: Method, path: &str) -> &mut Route {
        self.state
            .get_mut()
            .routes
            .entry((method, path.to_string()))
            .or_default()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let scripted = {
            let mut state = self.state.lock().await;
            state.calls.push(RecordedCall {
                method,
                path: path.to_string(),
                body,
            });
            state
                .routes
                .get_mut(&(method, path.to_string()))
                .and_then(Route::next)
        };

        let Some(scripted) = scripted else {
            debug!(%method, path, "no scripted reply");
            return Err(TransportError::HttpError {
                status: 404,
                body: format!("{{\"detail\":\"no scripted reply for {method} {path}\"}}"),
            });
        };

        if let Some(gate) = &scripted.gate {
            gate.pass().await;
        }
        scripted.reply
    }
}
