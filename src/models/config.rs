use std::path::PathBuf;

use serde::Deserialize;

/// Configuration options for the catalog application.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the remote read-only catalog API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Path of the JSON slot holding locally created or modified products.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
}

fn default_api_base_url() -> String {
    "https://fakestoreapi.com".to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("local-products.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            storage_path: default_storage_path(),
        }
    }
}
