// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use async_trait::async_trait;
use clap::Args;
use tabled::{builder::Builder, settings::Style, Table};

use crate::{
    app::App,
    catalog::{Page, Product, ProductPatch},
    error::Result,
};

pub(crate) mod categories;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod list;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod open;
pub(crate) mod search;
pub(crate) mod update;
pub(crate) mod whoami;

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, app: &App) -> Result<()>;
}

pub(crate) fn products_table(products: &[Product]) -> String {
    Table::new(products).with(Style::rounded()).to_string()
}

pub(crate) fn page_table(page: &Page<Product>) -> String {
    format!(
        "{}\nPage {} of {} ({} products)",
        products_table(&page.data),
        page.page,
        page.pages(),
        page.total
    )
}

/// Every field of one product, one per row.
pub(crate) fn product_card(product: &Product) -> String {
    let mut builder = Builder::default();
    for (field, value) in [
        ("ID", product.id.to_string()),
        ("Name", product.name.clone()),
        ("Description", product.description.clone()),
        ("Price", Product::format_price(&product.price)),
        ("Stock", product.stock.to_string()),
        ("Category", product.category.clone()),
        ("Rating", Product::format_rating(&product.rating)),
        ("Tags", Product::format_tags(&product.tags)),
    ] {
        builder.push_record([field.to_owned(), value]);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// The product fields a user can set from the command line.
#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// The product's name.
    #[arg(long)]
    name: Option<String>,

    /// A longer description of the product.
    #[arg(long)]
    description: Option<String>,

    /// The unit price. Must not be negative.
    #[arg(long)]
    price: Option<f64>,

    /// How many units are in stock.
    #[arg(long)]
    stock: Option<u32>,

    /// The category the product is listed under.
    #[arg(long)]
    category: Option<String>,

    /// The average review score, from 0 to 5.
    #[arg(long)]
    rating: Option<f64>,

    /// A tag to give the product. Repeat the option or separate tags with
    /// commas. Replaces any tags the product already has.
    #[arg(long = "tag", value_name = "TAG", value_delimiter = ',')]
    tags: Vec<String>,

    /// Remove every tag from the product.
    #[arg(long, conflicts_with = "tags")]
    clear_tags: bool,
}

impl ProductArgs {
    pub(crate) fn into_patch(self) -> ProductPatch {
        let tags = if self.clear_tags {
            Some(BTreeSet::new())
        } else if self.tags.is_empty() {
            None
        } else {
            Some(
                self.tags
                    .into_iter()
                    .map(|tag| tag.trim().to_owned())
                    .filter(|tag| !tag.is_empty())
                    .collect(),
            )
        };

        ProductPatch {
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            category: self.category,
            rating: self.rating,
            tags,
        }
    }
}
