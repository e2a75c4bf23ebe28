// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{app::App, error::Result};

/// Show a single product.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The ID of the product.
    #[clap()]
    id: u64,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, app: &App) -> Result<()> {
        let product = app.products.get_by_id(self.id).await?;
        println!("{}", super::product_card(&product));
        Ok(())
    }
}
