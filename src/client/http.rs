use chrono::Utc;

use crate::client::{CatalogApi, FetchError};
use crate::domain::product::Product;
use crate::domain::types::ProductId;
use crate::models::remote::RemoteProduct;

/// Catalog client backed by `reqwest`.
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Creates a client for the given catalog base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, FetchError> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        Ok(response.json().await?)
    }
}

impl CatalogApi for HttpCatalogClient {
    async fn list_products(&self) -> Result<Vec<Product>, FetchError> {
        let items: Vec<RemoteProduct> = self.fetch_json("/products").await?;

        let fetched_at = Utc::now();
        items
            .into_iter()
            .map(|item| item.into_product(fetched_at).map_err(FetchError::from))
            .collect()
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, FetchError> {
        let item: RemoteProduct = self.fetch_json(&format!("/products/{id}")).await?;
        Ok(item.into_product(Utc::now())?)
    }
}
