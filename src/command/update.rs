// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::error;

use crate::{
    app::App,
    catalog::ProductPatch,
    error::{self, Result},
};

use super::ProductArgs;

/// Change some fields of a product. Fields left out keep their values.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The ID of the product.
    #[clap()]
    id: u64,

    #[command(flatten)]
    product: ProductArgs,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, app: &App) -> Result<()> {
        let patch = self.product.into_patch();
        if patch == ProductPatch::default() {
            error!("Give at least one field to change");
            return Err(error::Error::Command);
        }

        let product = app.products.update(self.id, patch).await?;
        app.notifier
            .success(format!(r#"Product "{}" was updated."#, product.name));
        println!("{}", super::product_card(&product));
        Ok(())
    }
}
