// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use log::{debug, info};

use crate::{notify::Notifier, router::Router, session::SessionStore};

use super::{Fault, Middleware, Next, Outcome, Request, StatusCode};

const UNREACHABLE: &str = "Cannot reach the server. Check your network connection.";
const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
const FORBIDDEN: &str = "You do not have permission to access this resource.";
const NOT_FOUND: &str = "The requested data could not be found.";
const INVALID: &str = "The submitted data is invalid.";
const SERVER: &str = "Server error. Please try again later.";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FaultClass {
    Unreachable,
    Unauthenticated,
    Forbidden,
    NotFound,
    Invalid,
    Server,
    Other,
}

impl FaultClass {
    pub(crate) fn of(status: Option<StatusCode>) -> Self {
        match status {
            None => Self::Unreachable,
            Some(StatusCode::UNAUTHORIZED) => Self::Unauthenticated,
            Some(StatusCode::FORBIDDEN) => Self::Forbidden,
            Some(StatusCode::NOT_FOUND) => Self::NotFound,
            Some(StatusCode::UNPROCESSABLE_ENTITY) => Self::Invalid,
            Some(status) if status.is_server_error() => Self::Server,
            Some(_) => Self::Other,
        }
    }
}

/// Reads the `message` a server puts in a validation failure. Validation
/// pipes commonly send one message per failed constraint as an array.
fn validation_message(fault: &Fault) -> Option<String> {
    match fault.body.as_ref()?.get("message")? {
        serde_json::Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        serde_json::Value::Array(messages) => {
            let messages = messages
                .iter()
                .filter_map(serde_json::Value::as_str)
                .collect::<Vec<_>>();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

/// Turns failed calls into exactly one user notice each, ends the session
/// when the server stops accepting it, and hands the fault on untouched.
pub(crate) struct FaultInterpreter {
    session: SessionStore,
    notifier: Notifier,
    router: Router,
}

impl FaultInterpreter {
    pub(crate) const fn new(session: SessionStore, notifier: Notifier, router: Router) -> Self {
        Self {
            session,
            notifier,
            router,
        }
    }

    fn interpret(&self, req: &Request, fault: &Fault) {
        match fault.class() {
            FaultClass::Unreachable => self.notifier.error(UNREACHABLE),
            FaultClass::Unauthenticated => {
                if self.session.logout() {
                    info!("The server rejected our credentials for {}, so the session is over", req);
                }
                let login = self.router.redirect_to_login();
                debug!("Redirected to {}", login);
                self.notifier.warning(SESSION_EXPIRED);
            }
            FaultClass::Forbidden => self.notifier.error(FORBIDDEN),
            FaultClass::NotFound => self.notifier.error(NOT_FOUND),
            FaultClass::Invalid => self
                .notifier
                .error(validation_message(fault).unwrap_or_else(|| INVALID.to_owned())),
            FaultClass::Server => self.notifier.error(SERVER),
            FaultClass::Other => debug!("{} failed without a notice: {}", req, fault),
        }
    }
}

#[async_trait]
impl Middleware for FaultInterpreter {
    async fn handle(&self, req: Request, next: Next<'_>) -> Outcome {
        let target = req.clone();
        next.run(req).await.map_err(|fault| {
            self.interpret(&target, &fault);
            fault
        })
    }
}
