// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Built-in data to answer with when the server cannot.

use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use once_cell::sync::Lazy;

use super::{Page, Product};

pub(crate) const CATEGORIES: [&str; 5] = ["Laptop", "Phone", "Audio", "Tablet", "Accessories"];

fn tags(tags: &[&str]) -> BTreeSet<String> {
    tags.iter().map(|&tag| tag.to_owned()).collect()
}

pub(crate) static PRODUCTS: Lazy<Vec<Product>> = Lazy::new(|| {
    vec![
        Product {
            id: 1,
            name: "Laptop Dell XPS 15".to_owned(),
            description: "High-end laptop".to_owned(),
            price: 35_000_000.0,
            stock: 10,
            category: "Laptop".to_owned(),
            rating: 4.5,
            tags: tags(&["laptop", "dell"]),
        },
        Product {
            id: 2,
            name: "iPhone 15 Pro".to_owned(),
            description: "Flagship smartphone".to_owned(),
            price: 28_000_000.0,
            stock: 25,
            category: "Phone".to_owned(),
            rating: 4.8,
            tags: tags(&["phone", "apple"]),
        },
        Product {
            id: 3,
            name: "AirPods Pro".to_owned(),
            description: "Wireless earbuds with noise cancellation".to_owned(),
            price: 5_500_000.0,
            stock: 50,
            category: "Audio".to_owned(),
            rating: 4.6,
            tags: tags(&["audio", "apple"]),
        },
        Product {
            id: 4,
            name: "Samsung Galaxy S24".to_owned(),
            description: "Android flagship".to_owned(),
            price: 22_000_000.0,
            stock: 30,
            category: "Phone".to_owned(),
            rating: 4.3,
            tags: tags(&["phone", "samsung"]),
        },
        Product {
            id: 5,
            name: "MacBook Air M3".to_owned(),
            description: "Thin and light laptop".to_owned(),
            price: 32_000_000.0,
            stock: 15,
            category: "Laptop".to_owned(),
            rating: 4.7,
            tags: tags(&["laptop", "apple"]),
        },
    ]
});

pub(crate) fn categories() -> Vec<String> {
    CATEGORIES.iter().map(|&c| c.to_owned()).collect()
}

pub(crate) fn find(id: u64) -> Option<Product> {
    PRODUCTS.iter().find(|p| p.id == id).cloned()
}

/// Slices the sample set the way the server would paginate it.
pub(crate) fn page(page: u32, page_size: u32) -> Page<Product> {
    let skip = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
    Page {
        data: PRODUCTS
            .iter()
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect(),
        total: PRODUCTS.len() as u64,
        page,
        page_size,
    }
}

pub(crate) fn search(term: &str) -> Vec<Product> {
    let term = term.to_lowercase();
    PRODUCTS
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&term))
        .cloned()
        .collect()
}

/// Hands out identifiers for products created while offline. They follow the
/// wall clock in milliseconds but never repeat or go backwards.
pub(crate) struct IdSource {
    last: AtomicU64,
}

impl IdSource {
    pub(crate) const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    pub(crate) fn next(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        let mut last = self.last.load(Ordering::SeqCst);
        loop {
            let id = now.max(last.saturating_add(1));
            match self
                .last
                .compare_exchange_weak(last, id, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return id,
                Err(actual) => last = actual,
            }
        }
    }
}
