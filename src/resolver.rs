// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use log::debug;

use crate::{
    catalog::{Product, ProductService},
    notify::Notifier,
    router::{Location, Router, LISTING},
};

const INVALID_ID: &str = "Invalid product ID.";
const NOT_FOUND: &str = "Product not found.";

/// Parses a product id from a path parameter. Only positive whole numbers are
/// ids.
pub(crate) fn parse_id(param: &str) -> Option<u64> {
    param.trim().parse().ok().filter(|&id| id > 0)
}

/// Loads the product a view needs before the view is entered. When it cannot,
/// the user is told why and sent back to the listing instead.
pub(crate) struct ProductResolver<'app> {
    products: &'app ProductService,
    notifier: &'app Notifier,
    router: &'app Router,
}

impl<'app> ProductResolver<'app> {
    pub(crate) const fn new(
        products: &'app ProductService,
        notifier: &'app Notifier,
        router: &'app Router,
    ) -> Self {
        Self {
            products,
            notifier,
            router,
        }
    }

    fn abort(&self, message: &str) -> Option<Product> {
        self.notifier.error(message);
        self.router.navigate(Location::new(LISTING));
        None
    }

    pub(crate) async fn resolve(&self, param: Option<&str>) -> Option<Product> {
        let Some(id) = param.and_then(parse_id) else {
            debug!("{:?} is not a product id", param);
            return self.abort(INVALID_ID);
        };

        match self.products.get_by_id(id).await {
            Ok(product) => Some(product),
            Err(e) => {
                debug!("Could not resolve product {}: {}", id, e);
                self.abort(NOT_FOUND)
            }
        }
    }
}
