// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use tabled::{settings::Style, Table};

use crate::{app::App, error::Result};

/// Show who you are signed in as.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, app: &App) -> Result<()> {
        match app.session.current() {
            Some(session) => println!("{}", Table::new([session]).with(Style::rounded())),
            None => println!("{} (not signed in)", app.session.display_name()),
        }
        Ok(())
    }
}
