use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::product::Product;
use crate::repository::{LocalProductReader, LocalProductWriter, PersistenceError};

/// Persistence adapter backed by a single JSON document on disk.
///
/// The whole slot is read and rewritten on every access; there are no partial
/// updates.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Creates an adapter over the given slot path. The file is created on
    /// the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalProductReader for JsonFileRepository {
    fn load_products(&self) -> Vec<Product> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::error!(
                    "Failed to read local products from {}: {e}",
                    self.path.display()
                );
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(products) => products,
            Err(e) => {
                log::error!(
                    "Malformed local product slot {}: {e}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }
}

impl LocalProductWriter for JsonFileRepository {
    fn save_products(&self, products: &[Product]) -> Result<(), PersistenceError> {
        let serialized = serde_json::to_string(products)?;
        if let Err(e) = fs::write(&self.path, serialized) {
            log::error!(
                "Failed to save local products to {}: {e}",
                self.path.display()
            );
            return Err(e.into());
        }
        Ok(())
    }
}
