// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use log::trace;
use url::Url;

use crate::{error::Result, metadata};

use super::{Fault, Outcome, Request, Response, Transport};

/// Sends requests over HTTP, resolving their paths against a base URL.
/// Anything but a 2xx answer comes back as a [`Fault`].
pub(crate) struct Reqwest {
    client: reqwest::Client,
    base: Url,
}

impl Reqwest {
    pub(crate) fn new(base: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(metadata::USER_AGENT.as_str())
            .build()?;
        Ok(Self { client, base })
    }

    fn url(&self, path: &str) -> Result<Url, Fault> {
        let joined = format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined)
            .map_err(|e| Fault::unreachable(format!("{joined} is not a valid URL: {e}")))
    }
}

#[async_trait]
impl Transport for Reqwest {
    async fn send(&self, req: Request) -> Outcome {
        let url = self.url(&req.path)?;
        trace!("{} -> {}", req, url);

        let mut builder = self
            .client
            .request(req.method.clone(), url)
            .headers(req.headers.clone())
            .query(&req.query);
        if let Some(body) = req.body.as_ref() {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| Fault::unreachable(format!("{req} failed: {e}")))?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Fault::unreachable(format!("{req} failed while reading: {e}")))?
            .to_vec();

        let resp = Response {
            status,
            headers,
            body,
        };
        if status.is_success() {
            Ok(resp)
        } else {
            Err(Fault::from_response(&req, &resp))
        }
    }
}
