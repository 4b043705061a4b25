//! Local persistence for user-created and user-modified products.
//!
//! The slot holds a flat JSON list; it carries no ordering guarantee and no
//! schema version. Merge logic lives entirely in the product store.

use thiserror::Error;

use crate::domain::product::Product;

pub mod json;

/// Errors produced while writing the local product slot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The slot could not be written.
    #[error("failed to write local products: {0}")]
    Io(#[from] std::io::Error),
    /// The product list could not be serialized.
    #[error("failed to serialize local products: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Read access to the locally persisted product list.
pub trait LocalProductReader {
    /// Returns the previously saved local products.
    ///
    /// Absent, unreadable or malformed slots yield an empty list; a load
    /// never fails.
    fn load_products(&self) -> Vec<Product>;
}

/// Write access to the locally persisted product list.
pub trait LocalProductWriter {
    /// Serializes and stores the given list, replacing any previous content.
    fn save_products(&self, products: &[Product]) -> Result<(), PersistenceError>;
}
