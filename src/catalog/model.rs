// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

const DEFAULT_NAME: &str = "New Product";
const DEFAULT_CATEGORY: &str = "Uncategorized";
const MAX_RATING: f64 = 5.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Product {
    #[tabled(rename = "ID")]
    pub(crate) id: u64,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[serde(default)]
    #[tabled(skip)]
    pub(crate) description: String,
    #[tabled(rename = "Price", display_with = "Self::format_price")]
    pub(crate) price: f64,
    #[tabled(rename = "Stock")]
    pub(crate) stock: u32,
    #[tabled(rename = "Category")]
    pub(crate) category: String,
    #[serde(default)]
    #[tabled(rename = "Rating", display_with = "Self::format_rating")]
    pub(crate) rating: f64,
    #[serde(default)]
    #[tabled(rename = "Tags", display_with = "Self::format_tags")]
    pub(crate) tags: BTreeSet<String>,
}

// LINT: tabled hands every field to its formatter by reference.
#[allow(clippy::trivially_copy_pass_by_ref)]
impl Product {
    pub(crate) fn format_price(price: &f64) -> String {
        format!("{price:.2}")
    }

    pub(crate) fn format_rating(rating: &f64) -> String {
        format!("{rating:.1}")
    }

    pub(crate) fn format_tags(tags: &BTreeSet<String>) -> String {
        tags.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

/// The fields of a product a caller wants to set. Absent fields are left to
/// the server, or to the existing product when updating.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) tags: Option<BTreeSet<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FieldError {
    pub(crate) field: &'static str,
    pub(crate) message: &'static str,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

impl ProductPatch {
    /// Checks every field that is present and reports all problems at once.
    pub(crate) fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = vec![];
        if self.name.as_deref().map_or(false, |name| name.trim().is_empty()) {
            errors.push(FieldError {
                field: "name",
                message: "must not be blank",
            });
        }
        if self.price.map_or(false, |price| !(price >= 0.0 && price.is_finite())) {
            errors.push(FieldError {
                field: "price",
                message: "must be a non-negative number",
            });
        }
        if self
            .rating
            .map_or(false, |rating| !(0.0..=MAX_RATING).contains(&rating))
        {
            errors.push(FieldError {
                field: "rating",
                message: "must be between 0 and 5",
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Builds a product that the server never saw, filling absent fields with
    /// defaults.
    pub(crate) fn synthesize(&self, id: u64) -> Product {
        self.apply_to(Product {
            id,
            name: DEFAULT_NAME.to_owned(),
            description: String::new(),
            price: 0.0,
            stock: 0,
            category: DEFAULT_CATEGORY.to_owned(),
            rating: 0.0,
            tags: BTreeSet::new(),
        })
    }

    /// Returns `base` with every present field replaced.
    pub(crate) fn apply_to(&self, base: Product) -> Product {
        Product {
            id: base.id,
            name: self.name.clone().unwrap_or(base.name),
            description: self.description.clone().unwrap_or(base.description),
            price: self.price.unwrap_or(base.price),
            stock: self.stock.unwrap_or(base.stock),
            category: self.category.clone().unwrap_or(base.category),
            rating: self.rating.unwrap_or(base.rating),
            tags: self.tags.clone().unwrap_or(base.tags),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Page<T> {
    pub(crate) data: Vec<T>,
    pub(crate) total: u64,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

impl<T> Page<T> {
    pub(crate) fn pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.page_size)).max(1)
    }
}

/// What a collection endpoint may answer with: a bare array or an envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Bare(Vec<T>),
    Envelope { data: Vec<T>, total: Option<u64> },
}

impl<T> Listing<T> {
    pub(crate) fn total(&self) -> u64 {
        match *self {
            Self::Bare(ref data) | Self::Envelope { ref data, total: None } => data.len() as u64,
            Self::Envelope {
                total: Some(total), ..
            } => total,
        }
    }

    pub(crate) fn into_data(self) -> Vec<T> {
        match self {
            Self::Bare(data) | Self::Envelope { data, .. } => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_reports_every_field() {
        let patch = ProductPatch {
            name: Some("  ".to_owned()),
            price: Some(-1.0),
            rating: Some(7.5),
            ..ProductPatch::default()
        };

        let fields = patch
            .validate()
            .expect_err("patch is invalid")
            .into_iter()
            .map(|e| e.field)
            .collect::<Vec<_>>();
        assert_eq!(fields, vec!["name", "price", "rating"]);
        assert!(ProductPatch::default().validate().is_ok());
    }

    #[test]
    fn synthesized_products_use_defaults() {
        let product = ProductPatch {
            price: Some(12.5),
            ..ProductPatch::default()
        }
        .synthesize(42);

        assert_eq!(product.id, 42);
        assert_eq!(product.name, DEFAULT_NAME);
        assert_eq!(product.category, DEFAULT_CATEGORY);
        assert_eq!(product.price, 12.5);
        assert!(product.tags.is_empty());
    }

    #[test]
    fn patch_leaves_the_base_alone() {
        let base = ProductPatch::default().synthesize(3);
        let patched = ProductPatch {
            stock: Some(9),
            ..ProductPatch::default()
        }
        .apply_to(base.clone());

        assert_eq!(patched.stock, 9);
        assert_eq!(base.stock, 0);
        assert_eq!(patched.name, base.name);
    }

    #[test]
    fn patches_serialize_only_present_fields() -> crate::error::Result<()> {
        let patch = ProductPatch {
            name: Some("Pixel 9".to_owned()),
            ..ProductPatch::default()
        };

        assert_eq!(
            serde_json::to_value(&patch)?,
            serde_json::json!({ "name": "Pixel 9" })
        );
        Ok(())
    }

    #[test]
    fn listings_accept_both_shapes() -> crate::error::Result<()> {
        let bare: Listing<u64> = serde_json::from_str("[1, 2, 3]")?;
        let envelope: Listing<u64> = serde_json::from_str(r#"{"data": [1], "total": 40}"#)?;

        assert_eq!(bare.total(), 3);
        assert_eq!(envelope.total(), 40);
        assert_eq!(envelope.into_data(), vec![1]);
        Ok(())
    }

    #[test]
    fn page_count_rounds_up() {
        let page = Page::<u64> {
            data: vec![],
            total: 21,
            page: 1,
            page_size: 10,
        };

        assert_eq!(page.pages(), 3);
    }
}
