//! Helpers for integration tests.

use chrono::DateTime;
use tempfile::NamedTempFile;

use product_catalog::client::{CatalogApi, FetchError};
use product_catalog::domain::product::{NewProduct, Product};
use product_catalog::domain::types::{ImageUrl, ProductId, ProductPrice, ProductTitle};
use product_catalog::repository::json::JsonFileRepository;

/// Temporary persistence slot used in integration tests.
pub struct TestSlot {
    tempfile: NamedTempFile,
}

impl TestSlot {
    pub fn new() -> Self {
        Self {
            tempfile: NamedTempFile::new().expect("Failed to create temp file"),
        }
    }

    /// A fresh adapter over the slot; several can coexist, as several store
    /// instances would share one browser storage slot.
    pub fn repository(&self) -> JsonFileRepository {
        JsonFileRepository::new(self.tempfile.path())
    }

    /// Corrupts the slot content in place.
    pub fn corrupt(&self) {
        std::fs::write(self.tempfile.path(), "{not json").expect("Failed to corrupt slot");
    }
}

/// Canned remote catalog.
pub struct StubCatalog {
    products: Vec<Product>,
    fail: bool,
}

impl StubCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            products: Vec::new(),
            fail: true,
        }
    }
}

impl CatalogApi for StubCatalog {
    async fn list_products(&self) -> Result<Vec<Product>, FetchError> {
        if self.fail {
            return Err(FetchError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        }
        Ok(self.products.clone())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, FetchError> {
        if self.fail {
            return Err(FetchError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        }
        self.products
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or(FetchError::Status(reqwest::StatusCode::NOT_FOUND))
    }
}

pub fn product(id: &str, title: &str, price: f64) -> Product {
    Product {
        id: ProductId::new(id).expect("valid product id"),
        title: ProductTitle::new(title).expect("valid title"),
        description: format!("Description of {title}"),
        price: ProductPrice::new(price).expect("valid price"),
        image: ImageUrl::new("https://example.com/img/1.jpg").expect("valid image url"),
        is_liked: false,
        created_at: DateTime::from_timestamp(0, 0).expect("valid timestamp"),
    }
}

pub fn new_product(title: &str, price: f64) -> NewProduct {
    NewProduct {
        title: ProductTitle::new(title).expect("valid title"),
        description: format!("Description of {title}"),
        price: ProductPrice::new(price).expect("valid price"),
        image: ImageUrl::new("https://example.com/img/1.jpg").expect("valid image url"),
    }
}

pub fn liked(mut product: Product) -> Product {
    product.is_liked = true;
    product
}
