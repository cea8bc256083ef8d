//! JSON export of the current form.
//!
//! Export is independent of persistence: it serializes whatever the editor
//! currently holds, saved or not.

use crate::schema::FormSchema;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// MIME type of exported forms.
pub const EXPORT_MIME_TYPE: &str = "application/json";

/// Longest slug derived from a title.
pub const MAX_SLUG_LEN: usize = 30;

/// URL- and filename-friendly form of a title.
///
/// Lowercases, turns spaces into dashes and drops anything that is not
/// alphanumeric or a dash. Capped at [`MAX_SLUG_LEN`] characters.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .take(MAX_SLUG_LEN)
        .collect()
}

/// A downloadable JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ExportArtifact {
    /// Serialize `schema` into an artifact named after its title.
    pub fn from_schema(schema: &FormSchema) -> Result<Self, ExportError> {
        let slug = slugify(&schema.title);
        let stem = if slug.trim_matches('-').is_empty() { "form" } else { slug.as_str() };
        Ok(Self {
            file_name: format!("{}.json", stem),
            mime_type: EXPORT_MIME_TYPE,
            contents: schema.to_json()?,
        })
    }

    /// Write the artifact into `dir`. Returns the written path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        log::info!("Exported form to {}", path.display());
        Ok(path)
    }
}
