// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use core::num;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use futures_util::{future, stream, StreamExt as _};
use tokio::{
    io::{self, AsyncBufReadExt as _, BufReader},
    sync::mpsc,
};
use tokio_stream::wrappers::LinesStream;

use crate::{
    app::App,
    catalog::search::{self, Results},
    error::Result,
};

/// Search products by name as you type. Each line read from standard input is
/// a new search term; only the term you settle on is searched for.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The number of products to show for each search.
    #[clap(short, long)]
    count: Option<num::NonZeroUsize>,

    /// How long a term must stay unchanged before it is searched for, in
    /// milliseconds.
    #[arg(long, value_name = "MILLISECONDS", default_value_t = search::DEBOUNCE_MS)]
    debounce_ms: u64,

    /// Terms to search for instead of reading standard input.
    #[clap()]
    terms: Vec<String>,
}

impl Command {
    fn show(&self, found: &Results) {
        println!(r#"Results for "{}":"#, found.term);
        if found.products.is_empty() {
            println!("No products found.");
        } else {
            let shown = self
                .count
                .map_or(found.products.len(), num::NonZeroUsize::get)
                .min(found.products.len());
            println!("{}", super::products_table(&found.products[..shown]));
        }
    }
}

#[async_trait]
impl super::Command for Command {
    async fn execute(self, app: &App) -> Result<()> {
        let debounce = Duration::from_millis(self.debounce_ms);
        let (tx, mut rx) = mpsc::channel(1);

        let terms = if self.terms.is_empty() {
            LinesStream::new(BufReader::new(io::stdin()).lines())
                .filter_map(|line| future::ready(line.ok()))
                .boxed()
        } else {
            stream::iter(self.terms.clone()).boxed()
        };

        let searching = search::run(&app.products, terms, debounce, tx);
        let showing = async {
            while let Some(found) = rx.recv().await {
                self.show(&found);
            }
        };
        let (searched, ()) = tokio::join!(searching, showing);
        searched
    }
}
