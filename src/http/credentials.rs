// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;

use async_trait::async_trait;
use log::warn;
use secrecy::ExposeSecret as _;

use crate::session::{Session, SessionStore};

use super::{header, Middleware, Next, Outcome, Request};

/// Returns `req` carrying the session's bearer token, or `req` itself when
/// there is no session. The input is never modified; a token forces a copy.
pub(crate) fn with_credentials<'req>(
    req: &'req Request,
    session: Option<&Session>,
) -> Cow<'req, Request> {
    let Some(session) = session else {
        return Cow::Borrowed(req);
    };

    match header::HeaderValue::try_from(format!("Bearer {}", session.token().expose_secret())) {
        Ok(mut value) => {
            value.set_sensitive(true);
            let mut decorated = req.clone();
            _ = decorated.headers.insert(header::AUTHORIZATION, value);
            Cow::Owned(decorated)
        }
        Err(_) => {
            warn!(
                "The session token contains characters that cannot be sent in a header, so {} goes out without it",
                req
            );
            Cow::Borrowed(req)
        }
    }
}

pub(crate) struct Credentials {
    session: SessionStore,
}

impl Credentials {
    pub(crate) const fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Middleware for Credentials {
    async fn handle(&self, req: Request, next: Next<'_>) -> Outcome {
        let session = self.session.current();
        let decorated = match with_credentials(&req, session.as_ref()) {
            Cow::Owned(decorated) => Some(decorated),
            Cow::Borrowed(_) => None,
        };
        next.run(decorated.unwrap_or(req)).await
    }
}
