// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::{
    io::{self, AsyncBufReadExt as _, BufReader},
    task,
};

use crate::error::Result;

#[async_trait]
pub(crate) trait Prompt: Send + Sync {
    /// Asks for the password belonging to `email`. `None` means the user
    /// gave up.
    async fn prompt(&self, email: &str) -> Result<Option<SecretString>>;
}

/// Asks on the controlling terminal without echoing.
pub(crate) struct RpasswordPrompt;

#[async_trait]
impl Prompt for RpasswordPrompt {
    async fn prompt(&self, email: &str) -> Result<Option<SecretString>> {
        let message = format!("Password for {email}: ");
        Ok(Some(
            task::spawn_blocking(move || rpassword::prompt_password(message).map(SecretString::new))
                .await??,
        ))
    }
}

/// Reads the first line of standard input, for scripts.
pub(crate) struct StdinPrompt;

#[async_trait]
impl Prompt for StdinPrompt {
    async fn prompt(&self, _email: &str) -> Result<Option<SecretString>> {
        let mut line = String::new();
        let read = BufReader::new(io::stdin()).read_line(&mut line).await?;
        Ok((read > 0).then(|| SecretString::new(line.trim_end_matches(['\r', '\n']).to_owned())))
    }
}
