use std::collections::HashSet;
use std::sync::Mutex;

use tracing::{debug, warn};

use super::store::CatalogStore;
use crate::error::CatalogError;
use crate::models::{Category, Product};
use crate::remote::RemoteCatalog;
use crate::state::lock;

/// Remote records for `category` in API order, followed by the local records
/// of that category the remote store has not seen (additions made this
/// session). Ids are unique in the result.
pub fn merge_category(remote: Vec<Product>, local: &[Product], category: Category) -> Vec<Product> {
    let mut seen = HashSet::with_capacity(remote.len());
    let mut merged: Vec<Product> = remote
        .into_iter()
        .filter(|p| seen.insert(p.id))
        .map(|mut p| {
            p.rating = p.rating.clamped();
            p
        })
        .collect();

    let remote_count = merged.len();
    merged.extend(
        local
            .iter()
            .filter(|p| p.category == category && seen.insert(p.id))
            .cloned(),
    );

    debug!(
        category = %category,
        remote = remote_count,
        local_only = merged.len() - remote_count,
        "merged category listing"
    );
    merged
}

/// Fetches the category listing and merges the store into it. The store is
/// read once the response is in, so records added while the request was out
/// are not missed.
pub async fn category_base_set(
    remote: &RemoteCatalog,
    catalog: &Mutex<CatalogStore>,
    category: Category,
) -> Result<Vec<Product>, CatalogError> {
    let fetched = remote.fetch_category(category).await.map_err(|err| {
        warn!(category = %category, error = %err, "category fetch failed");
        err
    })?;
    Ok(merge_category(fetched, lock(catalog).products(), category))
}
