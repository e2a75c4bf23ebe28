// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! A scripted [`Transport`] for tests. It never opens a socket; every request
//! is recorded and answered by a closure.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use super::{header, Fault, Outcome, Request, Response, StatusCode, Transport};

type Handler = Box<dyn Fn(&Request) -> Outcome + Send + Sync>;

pub(crate) struct MockTransport {
    handler: Handler,
    delay: Duration,
    calls: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub(crate) fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&Request) -> Outcome + Send + Sync + 'static,
    {
        Self::delayed(Duration::ZERO, handler)
    }

    /// Like [`MockTransport::new`], but every answer takes `delay` to arrive.
    pub(crate) fn delayed<F>(delay: Duration, handler: F) -> Arc<Self>
    where
        F: Fn(&Request) -> Outcome + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            delay,
            calls: Mutex::new(vec![]),
        })
    }

    pub(crate) fn ok(body: serde_json::Value) -> Arc<Self> {
        Self::new(move |_| Ok(json(StatusCode::OK, &body)))
    }

    pub(crate) fn unreachable() -> Arc<Self> {
        Self::new(|_| Err(Fault::unreachable("connection refused")))
    }

    pub(crate) fn status(status: StatusCode) -> Arc<Self> {
        Self::new(move |req| Err(Fault::from_response(req, &json(status, &serde_json::Value::Null))))
    }

    pub(crate) fn calls(&self) -> Vec<Request> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub(crate) fn count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

#[async_trait]
impl Transport for Arc<MockTransport> {
    async fn send(&self, req: Request) -> Outcome {
        self.calls.lock().expect("calls lock").push(req.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.handler)(&req)
    }
}

pub(crate) fn response(status: StatusCode, body: Vec<u8>) -> Response {
    Response {
        status,
        headers: header::HeaderMap::new(),
        body,
    }
}

pub(crate) fn json(status: StatusCode, body: &serde_json::Value) -> Response {
    let mut resp = response(status, body.to_string().into_bytes());
    _ = resp.headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    resp
}

/// A failed response whose body is `body`.
pub(crate) fn failure(req: &Request, status: StatusCode, body: serde_json::Value) -> Fault {
    Fault::from_response(req, &json(status, &body))
}
