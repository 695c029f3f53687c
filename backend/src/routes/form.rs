//! Multipart form reading
//!
//! Collects text fields and file parts into memory. Body size is bounded
//! by the router's body limit.

use crate::error::ApiError;
use axum::extract::Multipart;
use std::collections::HashMap;

/// A fully read multipart form
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<u8>>,
}

impl FormData {
    /// Drain a multipart body
    ///
    /// Parts carrying a filename are files, everything else is text.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if field.file_name().is_some() {
                let bytes = field.bytes().await?;
                form.files.insert(name, bytes.to_vec());
            } else {
                let value = field.text().await?;
                form.fields.entry(name).or_default().push(value);
            }
        }

        Ok(form)
    }

    /// First value of a text field, empty when absent
    pub fn text(&self, name: &str) -> String {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .cloned()
            .unwrap_or_default()
    }

    /// A list field, sent either as repeated parts or as one JSON array
    pub fn list(&self, name: &str) -> Result<Vec<String>, ApiError> {
        let Some(values) = self.fields.get(name) else {
            return Ok(Vec::new());
        };

        if let [single] = values.as_slice() {
            if single.trim_start().starts_with('[') {
                return serde_json::from_str(single).map_err(|_| {
                    ApiError::BadRequest(format!("{} must be a JSON array of strings", name))
                });
            }
        }
        Ok(values.clone())
    }

    /// Optional integer field; blank counts as absent
    pub fn optional_i32(&self, name: &str) -> Result<Option<i32>, ApiError> {
        let value = self.text(name);
        let value = value.trim();
        if value.is_empty() || value == "null" {
            return Ok(None);
        }
        value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("{} must be an integer", name)))
    }

    /// Remove and return an uploaded file
    pub fn take_file(&mut self, name: &str) -> Option<Vec<u8>> {
        self.files.remove(name)
    }
}
