// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{app::App, error::Result};

/// Remove a product from the catalog.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The ID of the product.
    #[clap()]
    id: u64,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, app: &App) -> Result<()> {
        app.products.delete(self.id).await?;
        app.notifier
            .success(format!("Product {} was deleted.", self.id));
        Ok(())
    }
}
