use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::models::{Category, CreatedProduct, NewProduct, Product};
use crate::settings::RemoteSettings;

/// JSON client for the demo product store.
#[derive(Debug, Clone)]
pub struct RemoteCatalog {
    client: Client,
    base_url: Url,
}

fn failure(context: &str, err: reqwest::Error) -> CatalogError {
    match err.status() {
        Some(status) => CatalogError::NetworkFailure(format!("{}: remote store responded with {}", context, status)),
        None => CatalogError::NetworkFailure(format!("{}: {}", context, err)),
    }
}

impl RemoteCatalog {
    pub fn new(settings: &RemoteSettings) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            config::ConfigError::Message(format!("invalid remote.base_url '{}': {}", settings.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(config::ConfigError::Message(format!(
                "remote.base_url '{}' cannot carry a path",
                settings.base_url
            ))
            .into());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET /products`
    pub async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        let context = "Failed to fetch products";
        let url = self.endpoint(&["products"]);
        debug!(%url, "fetching full listing");

        let products: Vec<Product> = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| failure(context, e))?
            .json()
            .await
            .map_err(|e| failure(context, e))?;

        info!(count = products.len(), "fetched full listing");
        Ok(products)
    }

    /// `GET /products/category/{category}`
    pub async fn fetch_category(&self, category: Category) -> Result<Vec<Product>, CatalogError> {
        let context = "Failed to fetch filtered products";
        let url = self.endpoint(&["products", "category", category.as_str()]);
        debug!(%url, "fetching category listing");

        let products: Vec<Product> = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| failure(context, e))?
            .json()
            .await
            .map_err(|e| failure(context, e))?;

        debug!(category = %category, count = products.len(), "fetched category listing");
        Ok(products)
    }

    /// `POST /products`
    pub async fn create(&self, product: &NewProduct) -> Result<CreatedProduct, CatalogError> {
        let context = "Failed to add product";
        let url = self.endpoint(&["products"]);
        debug!(%url, title = %product.title, "submitting new product");

        self.client
            .post(url)
            .json(product)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| failure(context, e))?
            .json()
            .await
            .map_err(|e| failure(context, e))
    }
}
