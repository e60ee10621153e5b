use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{error, info};

use crate::catalog::CatalogStore;
use crate::dialog::Dialogs;
use crate::error::CatalogError;
use crate::remote::RemoteCatalog;
use crate::session::{FormSession, ListingSession};
use crate::settings::Settings;

/// Everything a running catalog session owns. Handlers never hold one of
/// these locks across an `.await`.
pub struct AppState {
    pub settings: Settings,
    pub remote: RemoteCatalog,
    pub catalog: Mutex<CatalogStore>,
    pub listing: Mutex<ListingSession>,
    pub form: Mutex<FormSession>,
    pub dialogs: Mutex<Dialogs>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, CatalogError> {
        let remote = RemoteCatalog::new(&settings.remote)?;
        let listing = ListingSession::new(settings.listing.page_size);
        Ok(Self {
            settings,
            remote,
            catalog: Mutex::new(CatalogStore::new()),
            listing: Mutex::new(listing),
            form: Mutex::new(FormSession::new()),
            dialogs: Mutex::new(Dialogs::new()),
        })
    }

    /// Fills the store from `GET /products`. A failure leaves the store
    /// empty; the session carries on.
    pub async fn load_initial(&self) -> usize {
        match self.remote.fetch_all().await {
            Ok(products) => {
                let mut catalog = lock(&self.catalog);
                catalog.load(products);
                info!(count = catalog.len(), "catalog loaded");
                catalog.len()
            }
            Err(err) => {
                error!(error = %err, "Error fetching products");
                0
            }
        }
    }
}

/// Locks a session mutex, recovering the data from a poisoned lock.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
