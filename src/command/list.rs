// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::num::NonZeroU32;

use async_trait::async_trait;
use clap::Parser;

use crate::{
    app::App,
    catalog::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, LISTING_PAGE_SIZE},
    error::Result,
};

/// List products one page at a time.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The page to show, counting from 1.
    #[arg(long, short, default_value_t = DEFAULT_PAGE)]
    page: NonZeroU32,

    /// How many products make up a page.
    #[arg(long, default_value_t = LISTING_PAGE_SIZE)]
    page_size: NonZeroU32,

    /// Show everything the first request returns instead of a single page.
    #[arg(long, conflicts_with_all = ["page", "page_size"])]
    all: bool,
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, app: &App) -> Result<()> {
        if self.all {
            let products = app.products.get_all(DEFAULT_PAGE, DEFAULT_PAGE_SIZE).await;
            println!("{}", super::products_table(&products));
        } else {
            let page = app
                .products
                .get_all_paginated(self.page, self.page_size)
                .await;
            println!("{}", super::page_table(&page));
        }
        Ok(())
    }
}
