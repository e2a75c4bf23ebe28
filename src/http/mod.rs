// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! The request pipeline every remote call goes through.
//!
//! A [`Pipeline`] is an ordered list of [`Middleware`] in front of a
//! [`Transport`]. Each middleware receives the request and a [`Next`] handle
//! for the rest of the chain, so the first middleware registered sees the
//! request first and the response last.

mod credentials;
mod faults;
mod retry;
#[cfg(test)]
pub(crate) mod testing;
mod transport;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub(crate) use credentials::Credentials;
pub(crate) use faults::{FaultClass, FaultInterpreter};
pub(crate) use reqwest::{header, Method, StatusCode};
pub(crate) use retry::Retry;
pub(crate) use transport::Reqwest;

use crate::error::Result;

#[derive(Clone, Debug)]
pub(crate) struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: header::HeaderMap,
    pub(crate) body: Option<serde_json::Value>,
    /// Additional attempts [`Retry`] may make if this request fails
    /// transiently.
    pub(crate) retries: u32,
}

impl Request {
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: vec![],
            headers: header::HeaderMap::new(),
            body: None,
            retries: 0,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub(crate) fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_owned(), value.to_string()));
        self
    }

    pub(crate) fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub(crate) const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Response {
    pub(crate) status: StatusCode,
    pub(crate) headers: header::HeaderMap,
    pub(crate) body: Vec<u8>,
}

impl Response {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Decodes the JSON body. A body that does not decode is reported as a
    /// fault carrying the response's status so callers can fall back on it
    /// like on any other failed call.
    pub(crate) fn parse<T: DeserializeOwned>(&self) -> Result<T, Fault> {
        serde_json::from_slice(&self.body).map_err(|e| Fault {
            status: Some(self.status),
            body: None,
            message: format!("response body could not be decoded: {e}"),
        })
    }
}

/// A remote call that did not produce a successful response. `status` is
/// `None` when there was no response at all.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub(crate) struct Fault {
    pub(crate) status: Option<StatusCode>,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) message: String,
}

impl Fault {
    pub(crate) fn unreachable(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }

    pub(crate) fn from_response(req: &Request, resp: &Response) -> Self {
        Self {
            status: Some(resp.status),
            body: serde_json::from_slice(&resp.body).ok(),
            message: format!("{req} answered {}", resp.status),
        }
    }

    pub(crate) fn class(&self) -> FaultClass {
        FaultClass::of(self.status)
    }

    pub(crate) fn is_transient(&self) -> bool {
        matches!(self.class(), FaultClass::Unreachable | FaultClass::Server)
    }
}

pub(crate) type Outcome = Result<Response, Fault>;

#[async_trait]
pub(crate) trait Transport: Send + Sync {
    async fn send(&self, req: Request) -> Outcome;
}

#[async_trait]
pub(crate) trait Middleware: Send + Sync {
    async fn handle(&self, req: Request, next: Next<'_>) -> Outcome;
}

/// The remainder of a pipeline, as seen from inside a middleware.
#[derive(Clone, Copy)]
pub(crate) struct Next<'chain> {
    middleware: &'chain [Box<dyn Middleware>],
    transport: &'chain dyn Transport,
}

impl Next<'_> {
    pub(crate) async fn run(self, req: Request) -> Outcome {
        match self.middleware.split_first() {
            Some((head, rest)) => {
                head.handle(
                    req,
                    Next {
                        middleware: rest,
                        transport: self.transport,
                    },
                )
                .await
            }
            None => self.transport.send(req).await,
        }
    }
}

pub(crate) struct Pipeline {
    middleware: Vec<Box<dyn Middleware>>,
    transport: Box<dyn Transport>,
}

impl Pipeline {
    pub(crate) fn new<T: Transport + 'static>(transport: T) -> Self {
        Self {
            middleware: vec![],
            transport: Box::new(transport),
        }
    }

    pub(crate) fn with<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    pub(crate) async fn send(&self, req: Request) -> Outcome {
        Next {
            middleware: &self.middleware,
            transport: self.transport.as_ref(),
        }
        .run(req)
        .await
    }
}
