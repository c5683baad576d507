//! UI field names <-> storage column names.
//!
//! Each entity has one table of `(ui_name, storage_name)` pairs that both
//! directions read from, so encoding followed by decoding restores every
//! key. Names absent from the table are identical on both sides.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::Row;
use crate::error::StoreError;

/// Bidirectional field-name table for one entity.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    pairs: &'static [(&'static str, &'static str)],
}

pub const TEMPLATE_FIELDS: FieldMap = FieldMap {
    pairs: &[
        ("fullDescription", "full_description"),
        ("image", "image_url"),
        ("demoUrl", "demo_url"),
        ("downloadUrl", "download_url"),
        ("compatibleWith", "compatible_with"),
        ("fileSize", "file_size"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
};

pub const CUSTOM_SOLUTION_FIELDS: FieldMap = FieldMap {
    pairs: &[
        ("designType", "design_type"),
        ("websiteType", "website_type"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
};

impl FieldMap {
    pub fn storage_name<'a>(&self, ui_name: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(ui, _)| *ui == ui_name)
            .map_or(ui_name, |(_, storage)| *storage)
    }

    pub fn ui_name<'a>(&self, storage_name: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|(_, storage)| *storage == storage_name)
            .map_or(storage_name, |(ui, _)| *ui)
    }

    /// Rename every key of a UI-shaped object to its storage name.
    pub fn to_storage(&self, ui: Row) -> Row {
        ui.into_iter()
            .map(|(k, v)| (self.storage_name(&k).to_string(), v))
            .collect()
    }

    /// Rename every key of a stored row to its UI name.
    pub fn from_storage(&self, row: Row) -> Row {
        row.into_iter()
            .map(|(k, v)| (self.ui_name(&k).to_string(), v))
            .collect()
    }

    /// Serialize an entity or DTO into a storage row.
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Row, StoreError> {
        match serde_json::to_value(value)? {
            Value::Object(ui) => Ok(self.to_storage(ui)),
            other => Err(StoreError::Rejected(format!(
                "expected an object to store, got {other}"
            ))),
        }
    }

    /// Deserialize a storage row into an entity.
    pub fn decode<T: DeserializeOwned>(&self, row: Row) -> Result<T, StoreError> {
        Ok(serde_json::from_value(Value::Object(self.from_storage(row)))?)
    }
}
