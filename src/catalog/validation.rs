use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Category, NewProduct, Product, Rating};

/// Field name to message. Empty means the draft is valid.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftRating {
    #[serde(default)]
    pub rate: String,
    #[serde(default)]
    pub count: String,
}

/// Raw form values, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: DraftRating,
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        ProductDraft {
            title: product.title.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            category: product.category.to_string(),
            image: product.image.clone(),
            rating: DraftRating {
                rate: product.rating.rate.to_string(),
                count: product.rating.count.to_string(),
            },
        }
    }
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: Category,
    pub image: String,
    pub rating: Rating,
}

impl ProductFields {
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            title: self.title,
            price: self.price,
            description: self.description,
            category: self.category,
            image: self.image,
            rating: self.rating,
        }
    }

    /// Overlays these fields on `original`, keeping its id.
    pub fn merge_over(self, original: &Product) -> Product {
        Product {
            id: original.id,
            title: self.title,
            price: self.price,
            description: self.description,
            category: self.category,
            image: self.image,
            rating: self.rating,
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Checks every field; no early exit.
pub fn validate(draft: &ProductDraft) -> FieldErrors {
    draft.validated().err().unwrap_or_default()
}

impl ProductDraft {
    pub fn validated(&self) -> Result<ProductFields, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.title.trim().is_empty() {
            errors.insert("title".to_string(), "Title is required".to_string());
        }

        let price = parse_number(&self.price).filter(|price| *price > 0.0);
        if price.is_none() {
            errors.insert("price".to_string(), "Valid price is required".to_string());
        }

        if self.description.trim().is_empty() {
            errors.insert("description".to_string(), "Description is required".to_string());
        }

        let category = self.category.trim().parse::<Category>().ok();
        if self.category.trim().is_empty() {
            errors.insert("category".to_string(), "Category is required".to_string());
        } else if category.is_none() {
            errors.insert("category".to_string(), "Select a valid category".to_string());
        }

        if self.image.is_empty() {
            errors.insert("image".to_string(), "Please select an image".to_string());
        }

        let rate = parse_number(&self.rating.rate).filter(|rate| (0.0..=Rating::MAX_RATE).contains(rate));
        if rate.is_none() {
            errors.insert("rate".to_string(), "Rating must be between 0 and 5".to_string());
        }

        let count = self.rating.count.trim().parse::<u64>().ok();
        if count.is_none() {
            errors.insert("count".to_string(), "Count must be a positive number".to_string());
        }

        match (price, category, rate, count) {
            (Some(price), Some(category), Some(rate), Some(count)) if errors.is_empty() => Ok(ProductFields {
                title: self.title.clone(),
                price,
                description: self.description.clone(),
                category,
                image: self.image.clone(),
                rating: Rating { rate, count },
            }),
            _ => Err(errors),
        }
    }
}
