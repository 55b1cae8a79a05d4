//! Where the stored ciphertext comes from

use crate::{InventoryError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Location of the encrypted inventory document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CiphertextSource {
    /// A file holding the stored ciphertext
    File(PathBuf),
    /// The stored ciphertext itself
    Inline(String),
}

impl CiphertextSource {
    /// Read the stored ciphertext
    pub fn read(&self) -> Result<String> {
        match self {
            Self::File(path) => std::fs::read_to_string(path).map_err(|source| InventoryError::Source {
                path: path.display().to_string(),
                source,
            }),
            Self::Inline(text) => Ok(text.clone()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Inline(_) => "<inline>".to_string(),
        }
    }
}
