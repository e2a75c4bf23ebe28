// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{app::App, error::Result};

use super::ProductArgs;

/// Add a product to the catalog. Fields left out get the server's defaults.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    #[command(flatten)]
    product: ProductArgs,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, app: &App) -> Result<()> {
        let product = app.products.create(self.product.into_patch()).await?;
        app.notifier
            .success(format!(r#"Product "{}" was created."#, product.name));
        println!("{}", super::product_card(&product));
        Ok(())
    }
}
