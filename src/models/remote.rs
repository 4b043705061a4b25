use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::product::Product;
use crate::domain::types::{ImageUrl, ProductId, ProductPrice, ProductTitle, TypeConstraintError};

/// A product as returned by the remote catalog API.
///
/// The remote catalog has no notion of likes or creation timestamps; both are
/// stamped during mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteProduct {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image: String,
}

impl RemoteProduct {
    /// Maps the wire record into the domain shape.
    ///
    /// Fails when the payload violates a domain constraint (empty title,
    /// negative price, malformed image URL).
    pub fn into_product(self, fetched_at: DateTime<Utc>) -> Result<Product, TypeConstraintError> {
        Ok(Product {
            id: ProductId::from_remote(self.id),
            title: ProductTitle::new(self.title)?,
            description: self.description,
            price: ProductPrice::new(self.price)?,
            image: ImageUrl::new(self.image)?,
            is_liked: false,
            created_at: fetched_at,
        })
    }
}
