use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{event, Level};

use crate::{
    domain::{Product, Stock},
    errors::CatalogError,
};

/// Read-only view of the storefront catalog API.
#[async_trait]
pub trait Catalog {
    async fn stock(&self, product_id: u64) -> Result<Stock, CatalogError>;
    async fn product(&self, product_id: u64) -> Result<Product, CatalogError>;
}

#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: Url,
}

impl HttpCatalog {
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        // Url::join drops the last segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        let base_url = Url::parse(&normalized).map_err(|e| CatalogError::Url(format!("{}: {}", base_url, e)))?;

        Ok(HttpCatalog {
            client: Client::new(),
            base_url: base_url,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: String) -> Result<T, CatalogError> {
        let url = self
            .base_url
            .join(&path)
            .map_err(|e| CatalogError::Url(format!("{}: {}", path, e)))?;

        event!(Level::DEBUG, %url, "catalog request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CatalogError::Transport { path: path.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                path: path,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| CatalogError::Decode { path: path, source })
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn stock(&self, product_id: u64) -> Result<Stock, CatalogError> {
        self.get(format!("stock/{}", product_id)).await
    }

    async fn product(&self, product_id: u64) -> Result<Product, CatalogError> {
        self.get(format!("products/{}", product_id)).await
    }
}
