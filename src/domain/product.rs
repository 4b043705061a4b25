use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ImageUrl, ProductId, ProductPrice, ProductTitle};

/// A product exposed to consumers of the reconciled catalog.
///
/// A record is either sourced from the remote catalog (its id is the
/// stringified upstream id) or created locally. `is_liked` never comes from
/// the remote API; it lives in the local overlay only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: ProductTitle,
    pub description: String,
    pub price: ProductPrice,
    pub image: ImageUrl,
    pub is_liked: bool,
    /// Stamped by the client or store at mapping/creation time, never taken
    /// from the remote source.
    pub created_at: DateTime<Utc>,
}

/// Information required to create a new [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub title: ProductTitle,
    pub description: String,
    pub price: ProductPrice,
    pub image: ImageUrl,
}

/// Partial update applied to an existing [`Product`].
///
/// Absent fields are left untouched by [`Product::apply`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductPatch {
    pub title: Option<ProductTitle>,
    pub description: Option<String>,
    pub price: Option<ProductPrice>,
    pub image: Option<ImageUrl>,
}

impl Product {
    /// Materializes a locally created product from its creation payload.
    pub fn new_local(new: NewProduct, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ProductId::generate(),
            title: new.title,
            description: new.description,
            price: new.price,
            image: new.image,
            is_liked: false,
            created_at,
        }
    }

    /// Merges a partial update into this record in place.
    pub fn apply(&mut self, patch: &ProductPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(image) = &patch.image {
            self.image = image.clone();
        }
    }

    /// Overlays locally retained state onto a freshly fetched remote record.
    ///
    /// The local counterpart wins for the like flag and the editable content
    /// fields; the remote record keeps its identity and mapping timestamp.
    pub fn overlaid_with(mut self, local: &Product) -> Self {
        self.title = local.title.clone();
        self.description = local.description.clone();
        self.price = local.price;
        self.image = local.image.clone();
        self.is_liked = local.is_liked;
        self
    }
}
