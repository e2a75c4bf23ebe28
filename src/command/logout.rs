// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{app::App, error::Result};

/// Sign out and forget the session.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, app: &App) -> Result<()> {
        if app.session.logout() {
            app.notifier.info("You have been signed out.");
        } else {
            app.notifier.info("You were not signed in.");
        }
        Ok(())
    }
}
