use std::collections::HashSet;

use crate::error::CatalogError;
use crate::models::Product;

/// The session's product collection, newest first, plus the header count.
#[derive(Debug, Default, Clone)]
pub struct CatalogStore {
    products: Vec<Product>,
    count: usize,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection with a fresh listing. Later duplicates
    /// of an id are dropped and every rating is clamped.
    pub fn load(&mut self, products: Vec<Product>) {
        let mut seen = HashSet::new();
        self.products = products
            .into_iter()
            .filter(|p| seen.insert(p.id))
            .map(normalized)
            .collect();
        self.count = self.products.len();
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> HashSet<i64> {
        self.products.iter().map(|p| p.id).collect()
    }

    pub fn max_id(&self) -> Option<i64> {
        self.products.iter().map(|p| p.id).max()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// The header shows the size of whatever the listing last produced.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    /// Prepends a new record.
    pub fn add(&mut self, product: Product) -> Result<(), CatalogError> {
        if self.contains(product.id) {
            return Err(CatalogError::DuplicateId(product.id));
        }
        self.products.insert(0, normalized(product));
        self.count += 1;
        Ok(())
    }

    /// Swaps the record sharing `product.id`, keeping its position.
    pub fn replace(&mut self, product: Product) -> Result<(), CatalogError> {
        let slot = self
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(CatalogError::NotFound(product.id))?;
        *slot = normalized(product);
        Ok(())
    }

    /// Drops the record with `id`. The count goes down by one whether or not
    /// the id was present, but never below zero.
    pub fn remove(&mut self, id: i64) -> Option<Product> {
        let removed = self
            .products
            .iter()
            .position(|p| p.id == id)
            .map(|index| self.products.remove(index));
        self.count = self.count.saturating_sub(1);
        removed
    }
}

fn normalized(mut product: Product) -> Product {
    product.rating = product.rating.clamped();
    product
}
