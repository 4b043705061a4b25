//! Read-only access to the remote product catalog.

use thiserror::Error;

use crate::domain::product::Product;
use crate::domain::types::{ProductId, TypeConstraintError};

pub mod http;

/// Errors produced by catalog fetches.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read/parsed.
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The remote answered with a non-success status.
    #[error("catalog returned status {0}")]
    Status(reqwest::StatusCode),
    /// The response parsed as JSON but violated the product shape.
    #[error("catalog returned an invalid product: {0}")]
    InvalidPayload(#[from] TypeConstraintError),
}

/// Read-only operations against the remote catalog.
///
/// Implementations perform no caching and no retries; every call is a fresh
/// round-trip.
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// Fetches the full remote product list.
    async fn list_products(&self) -> Result<Vec<Product>, FetchError>;
    /// Fetches a single product by id. A remote not-found status is
    /// propagated as [`FetchError::Status`].
    async fn get_product(&self, id: &ProductId) -> Result<Product, FetchError>;
}
