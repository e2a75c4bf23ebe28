// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::error;
use secrecy::SecretString;

use crate::{
    app::App,
    error::{self, Result},
    password::{Prompt, RpasswordPrompt, StdinPrompt},
    router::RETURN_URL,
    session::Login,
};

/// Sign in. The role you get follows from your e-mail address.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The e-mail address to sign in with.
    #[clap()]
    email: String,

    /// Use this bearer token instead of generating one.
    #[arg(long, env = "VITRINE_TOKEN", hide_env_values = true)]
    token: Option<SecretString>,

    /// Read the password from the first line of standard input instead of
    /// asking for it.
    #[arg(long)]
    password_stdin: bool,
}

impl Command {
    async fn login_with(self, app: &App, prompt: &dyn Prompt) -> Result<()> {
        let Some(password) = prompt.prompt(&self.email).await? else {
            error!("A password is needed to sign in");
            return Err(error::Error::Command);
        };

        let session = app.session.login(Login {
            email: self.email,
            password,
            token: self.token,
        });
        app.notifier.success(format!(
            "Welcome, {}! You are signed in as {}.",
            session.display_name(),
            session.role()
        ));

        if let Some(destination) = app.router.current().query_value(RETURN_URL) {
            println!("Continue to {destination} with `open {destination}`.");
        }
        Ok(())
    }
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, app: &App) -> Result<()> {
        if self.password_stdin {
            self.login_with(app, &StdinPrompt).await
        } else {
            self.login_with(app, &RpasswordPrompt).await
        }
    }
}
