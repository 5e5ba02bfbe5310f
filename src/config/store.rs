//! Record store configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Where session records live in the record store
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Collection holding one record per session
    #[serde(default = "default_sessions_collection")]
    pub sessions_collection: String,

    /// Field used to order session lists and feeds
    #[serde(default = "default_order_field")]
    pub order_field: String,
}

impl StoreConfig {
    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sessions_collection.trim().is_empty() {
            return Err(ValidationError::MissingRequired("store.sessions_collection"));
        }
        if self.order_field.trim().is_empty() {
            return Err(ValidationError::MissingRequired("store.order_field"));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sessions_collection: default_sessions_collection(),
            order_field: default_order_field(),
        }
    }
}

fn default_sessions_collection() -> String {
    "sessions".to_string()
}

fn default_order_field() -> String {
    "datetime".to_string()
}
