// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::time;

use super::{Middleware, Next, Outcome, Request};

/// Repeats a request that failed transiently, up to the number of retries the
/// request itself allows. Waits `backoff` times the attempt number between
/// tries.
pub(crate) struct Retry {
    backoff: Duration,
}

impl Retry {
    pub(crate) const fn new(backoff: Duration) -> Self {
        Self { backoff }
    }
}

#[async_trait]
impl Middleware for Retry {
    async fn handle(&self, req: Request, next: Next<'_>) -> Outcome {
        let mut attempt = 0_u32;
        loop {
            match next.run(req.clone()).await {
                Err(fault) if fault.is_transient() && attempt < req.retries => {
                    attempt += 1;
                    debug!(
                        "{} failed ({}), so we will try again (attempt {} of {})",
                        req,
                        fault,
                        attempt + 1,
                        req.retries + 1
                    );
                    time::sleep(self.backoff * attempt).await;
                }
                outcome => return outcome,
            }
        }
    }
}
