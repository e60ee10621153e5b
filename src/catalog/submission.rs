use chrono::Utc;
use rand::Rng;
use std::collections::HashSet;
use tracing::{info, warn};

use super::store::CatalogStore;
use super::validation::ProductFields;
use crate::error::CatalogError;
use crate::models::{CreatedProduct, Product};

/// Picks the id a newly created record is stored under.
///
/// The remote id is kept when it is present, non-zero and unused. Otherwise
/// the id is `now_millis + r` with `r` in `0..1000`; if that does not land
/// above every existing id it becomes `max_id + 1 + r'`. When the existing
/// ids sit so close to `i64::MAX` that this would overflow, the lowest free
/// positive id is taken instead. The result never collides and is never 0.
pub fn resolve_created_id<R: Rng>(
    remote_id: Option<i64>,
    existing: &HashSet<i64>,
    now_millis: i64,
    rng: &mut R,
) -> i64 {
    if let Some(id) = remote_id.filter(|id| *id != 0 && !existing.contains(id)) {
        return id;
    }

    let max_id = existing.iter().copied().max().unwrap_or(0);
    let candidate = now_millis.saturating_add(rng.gen_range(0..1000));
    if candidate > max_id && candidate != 0 {
        return candidate;
    }
    max_id
        .checked_add(1 + rng.gen_range(0..1000))
        .filter(|id| *id != 0)
        .unwrap_or_else(|| lowest_free_id(existing))
}

fn lowest_free_id(existing: &HashSet<i64>) -> i64 {
    (1..=i64::MAX).find(|id| !existing.contains(id)).unwrap_or(i64::MAX)
}

/// Turns the remote echo of a create into a local record and prepends it.
/// The remote rating is ignored in favour of the submitted one.
pub fn accept_created(
    store: &mut CatalogStore,
    created: CreatedProduct,
    fields: ProductFields,
) -> Result<Product, CatalogError> {
    let id = resolve_created_id(
        created.id,
        &store.ids(),
        Utc::now().timestamp_millis(),
        &mut rand::thread_rng(),
    );
    if created.id != Some(id) {
        warn!(remote_id = ?created.id, local_id = id, "remote id unusable, synthesized a local one");
    }

    let product = Product {
        id,
        title: fields.title,
        price: fields.price,
        description: fields.description,
        category: fields.category,
        image: fields.image,
        rating: fields.rating,
    };
    store.add(product.clone())?;
    info!(id = product.id, category = %product.category, "product created");
    Ok(product)
}

/// Local-only edit: the validated fields replace the record with `id`.
pub fn apply_edit(store: &mut CatalogStore, id: i64, fields: ProductFields) -> Result<Product, CatalogError> {
    let original = store.get(id).ok_or(CatalogError::NotFound(id))?;
    let updated = fields.merge_over(original);
    store.replace(updated.clone())?;
    info!(id, "product updated");
    Ok(updated)
}
