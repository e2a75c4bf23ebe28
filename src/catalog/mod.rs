// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Access to the remote product collection.
//!
//! Every operation goes through the shared [`Pipeline`], so failures have
//! already been announced to the user by the time they get here. What is left
//! to decide is whether to answer from built-in data instead.

mod cache;
pub(crate) mod fallback;
mod model;
pub(crate) mod search;

use std::{num::NonZeroU32, sync::Arc};

use clap::ValueEnum;
use futures_util::FutureExt as _;
use inflector::Inflector as _;
use log::warn;
use serde::de::DeserializeOwned;

pub(crate) use cache::Subscription;
pub(crate) use model::{FieldError, Page, Product, ProductPatch};

use crate::{
    error::{Error, Result},
    http::{Fault, Pipeline, Request, Response},
};

use self::{cache::Cache, fallback::IdSource, model::Listing};

const PRODUCTS: &str = "/products";
const CATEGORIES: &str = "/products/categories";
const TOTAL_COUNT: &str = "x-total-count";

pub(crate) const DEFAULT_PAGE: NonZeroU32 = match NonZeroU32::new(1) {
    Some(page) => page,
    None => unreachable!(),
};
pub(crate) const DEFAULT_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(20) {
    Some(size) => size,
    None => unreachable!(),
};
pub(crate) const LISTING_PAGE_SIZE: NonZeroU32 = match NonZeroU32::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

/// Which operations answer from built-in data when their remote call fails.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum FallbackPolicy {
    /// Reads and writes alike. A failed write looks like it succeeded.
    Always,
    /// Only reads. A failed create, update or delete is reported.
    ReadsOnly,
}

impl std::fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.to_possible_value().ok_or(std::fmt::Error)?;
        write!(f, "{}", value.get_name().to_sentence_case())
    }
}

fn product_path(id: u64) -> String {
    format!("{PRODUCTS}/{id}")
}

pub(crate) struct ProductService {
    pipeline: Arc<Pipeline>,
    retries: u32,
    policy: FallbackPolicy,
    categories: Cache<Vec<String>>,
    ids: IdSource,
}

impl ProductService {
    pub(crate) fn new(pipeline: Pipeline, retries: u32, policy: FallbackPolicy) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            retries,
            policy,
            categories: Cache::new(),
            ids: IdSource::new(),
        }
    }

    async fn send(&self, req: Request) -> Result<Response, Fault> {
        self.pipeline.send(req.with_retries(self.retries)).await
    }

    async fn fetch<T: DeserializeOwned>(&self, req: Request) -> Result<T, Fault> {
        self.send(req).await?.parse()
    }

    /// Lets a failed write through unless the policy says to cover it up.
    fn absorb(&self, operation: &str, fault: Fault) -> Result<()> {
        match self.policy {
            FallbackPolicy::Always => {
                warn!("{} failed, so we are answering with local data: {}", operation, fault);
                Ok(())
            }
            FallbackPolicy::ReadsOnly => Err(fault.into()),
        }
    }

    pub(crate) async fn get_all(&self, page: NonZeroU32, page_size: NonZeroU32) -> Vec<Product> {
        let req = Request::get(PRODUCTS)
            .with_query("page", page)
            .with_query("pageSize", page_size);
        match self.fetch::<Listing<Product>>(req).await {
            Ok(listing) => listing.into_data(),
            Err(fault) => {
                warn!("Loading products failed, so we are showing sample data: {}", fault);
                fallback::PRODUCTS.clone()
            }
        }
    }

    pub(crate) async fn get_all_paginated(
        &self,
        page: NonZeroU32,
        page_size: NonZeroU32,
    ) -> Page<Product> {
        let req = Request::get(PRODUCTS)
            .with_query("page", page)
            .with_query("pageSize", page_size);
        let loaded = self.send(req).await.and_then(|resp| {
            let listing = resp.parse::<Listing<Product>>()?;
            let total = resp
                .header(TOTAL_COUNT)
                .and_then(|total| total.trim().parse().ok())
                .unwrap_or_else(|| listing.total());
            Ok((listing.into_data(), total))
        });

        match loaded {
            Ok((data, total)) => Page {
                data,
                total,
                page: page.get(),
                page_size: page_size.get(),
            },
            Err(fault) => {
                warn!(
                    "Loading page {} of products failed, so we are showing sample data: {}",
                    page, fault
                );
                fallback::page(page.get(), page_size.get())
            }
        }
    }

    /// The one read that can fail: an id neither the server nor the sample
    /// data knows about is reported as missing.
    pub(crate) async fn get_by_id(&self, id: u64) -> Result<Product> {
        match self.fetch(Request::get(product_path(id))).await {
            Ok(product) => Ok(product),
            Err(fault) => {
                warn!("Loading product {} failed, so we are looking in sample data: {}", id, fault);
                fallback::find(id).ok_or(Error::ProductNotFound { id })
            }
        }
    }

    pub(crate) async fn create(&self, patch: ProductPatch) -> Result<Product> {
        patch.validate().map_err(Error::Validation)?;

        let req = Request::post(PRODUCTS).with_json(&patch)?;
        let product = match self.fetch(req).await {
            Ok(product) => product,
            Err(fault) => {
                self.absorb("Creating a product", fault)?;
                patch.synthesize(self.ids.next())
            }
        };

        if patch.category.is_some() {
            self.clear_categories_cache().await;
        }
        Ok(product)
    }

    pub(crate) async fn update(&self, id: u64, patch: ProductPatch) -> Result<Product> {
        patch.validate().map_err(Error::Validation)?;

        let req = Request::put(product_path(id)).with_json(&patch)?;
        let product = match self.fetch(req).await {
            Ok(product) => product,
            Err(fault) => {
                self.absorb(&format!("Updating product {id}"), fault)?;
                fallback::find(id).map_or_else(|| patch.synthesize(id), |base| patch.apply_to(base))
            }
        };

        if patch.category.is_some() {
            self.clear_categories_cache().await;
        }
        Ok(product)
    }

    pub(crate) async fn delete(&self, id: u64) -> Result<()> {
        match self.send(Request::delete(product_path(id))).await {
            Ok(_) => Ok(()),
            Err(fault) => self.absorb(&format!("Deleting product {id}"), fault),
        }
    }

    /// Subscribes to the category list. Subscribers that overlap share a
    /// single remote call and its answer.
    pub(crate) async fn get_categories(&self) -> Subscription<Vec<String>> {
        let pipeline = Arc::clone(&self.pipeline);
        let req = Request::get(CATEGORIES).with_retries(self.retries);
        self.categories
            .subscribe(move || {
                async move {
                    match pipeline.send(req).await.and_then(|resp| resp.parse()) {
                        Ok(categories) => categories,
                        Err(fault) => {
                            warn!(
                                "Loading categories failed, so we are showing the built-in list: {}",
                                fault
                            );
                            fallback::categories()
                        }
                    }
                }
                .boxed()
            })
            .await
    }

    pub(crate) async fn clear_categories_cache(&self) {
        self.categories.clear().await;
    }

    /// Finds products whose name matches `term`. A blank term matches nothing
    /// and never reaches the server.
    pub(crate) async fn search(&self, term: &str) -> Vec<Product> {
        let term = term.trim();
        if term.is_empty() {
            return vec![];
        }

        match self
            .fetch::<Listing<Product>>(Request::get(PRODUCTS).with_query("q", term))
            .await
        {
            Ok(listing) => listing.into_data(),
            Err(fault) => {
                warn!("Searching for {:?} failed, so we are searching sample data: {}", term, fault);
                fallback::search(term)
            }
        }
    }
}
