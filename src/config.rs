// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use clap::Args;
use url::Url;

use crate::{catalog::FallbackPolicy, notify::NoticeFormat};

const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 100;

/// Settings shared by every subcommand.
#[derive(Clone, Debug, Args)]
pub(crate) struct Config {
    /// The base URL of the catalog API. Resource paths such as `/products`
    /// are appended to it.
    #[arg(long, env = "VITRINE_API_URL", default_value = DEFAULT_API_URL, value_parser = Url::parse)]
    pub(crate) api_url: Url,

    /// How long to wait for any single remote call, in seconds.
    #[arg(long, env = "VITRINE_TIMEOUT", value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub(crate) timeout: u64,

    /// How many additional attempts to make when the server is unreachable
    /// or answers with a server error.
    #[arg(long, env = "VITRINE_RETRIES", default_value_t = DEFAULT_RETRIES)]
    pub(crate) retries: u32,

    /// The delay before the first retry, in milliseconds. Each further retry
    /// waits one more multiple of it.
    #[arg(long, env = "VITRINE_RETRY_BACKOFF_MS", value_name = "MILLISECONDS", default_value_t = DEFAULT_RETRY_BACKOFF_MS)]
    pub(crate) retry_backoff_ms: u64,

    /// Which operations may answer from built-in sample data when the remote
    /// call fails.
    #[arg(long, env = "VITRINE_FALLBACK", value_enum, default_value_t = FallbackPolicy::Always)]
    pub(crate) fallback: FallbackPolicy,

    /// How notifications are written to standard error.
    #[arg(long, env = "VITRINE_NOTICES", value_enum, default_value_t = NoticeFormat::Text)]
    pub(crate) notices: NoticeFormat,

    /// Keep the session in memory only instead of saving it between runs.
    #[arg(long)]
    pub(crate) no_persist_session: bool,
}

impl Config {
    pub(crate) const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub(crate) const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            fallback: FallbackPolicy::Always,
            notices: NoticeFormat::Text,
            no_persist_session: false,
        }
    }
}
