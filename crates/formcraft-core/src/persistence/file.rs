//! File-based persistence adapter for native platforms.

use super::{BoxFuture, FormPatch, FormPayload, PersistError, PersistResult, PersistenceAdapter};
use crate::schema::FormSchema;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stores each form as a JSON file in a directory.
///
/// Useful as a local draft store when no backend is reachable.
pub struct FileAdapter {
    base_path: PathBuf,
}

impl FileAdapter {
    /// Create an adapter rooted at `base_path`, creating the directory if
    /// needed.
    pub fn new(base_path: PathBuf) -> PersistResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                PersistError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create an adapter in the default location.
    ///
    /// On Linux: `~/.local/share/formcraft/forms/`
    /// On Windows: `%LOCALAPPDATA%\formcraft\forms\`
    pub fn default_location() -> PersistResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| PersistError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("formcraft").join("forms"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn form_path(&self, id: &str) -> PathBuf {
        // Ids may come from a backend, keep them filename-safe
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    fn read(path: &Path, id: &str) -> PersistResult<FormSchema> {
        if !path.exists() {
            return Err(PersistError::NotFound(id.to_string()));
        }
        let json = fs::read_to_string(path)
            .map_err(|e| PersistError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        FormSchema::from_json(&json).map_err(|e| {
            PersistError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn write(path: &Path, schema: &FormSchema) -> PersistResult<()> {
        let json = schema
            .to_json()
            .map_err(|e| PersistError::Serialization(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| PersistError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}

impl PersistenceAdapter for FileAdapter {
    fn create(&self, payload: &FormPayload) -> BoxFuture<'_, PersistResult<String>> {
        let schema = payload.clone().into_schema();
        let id = Uuid::new_v4().to_string();
        let path = self.form_path(&id);
        Box::pin(async move {
            Self::write(&path, &schema)?;
            Ok(id)
        })
    }

    fn update(&self, id: &str, patch: &FormPatch) -> BoxFuture<'_, PersistResult<()>> {
        let path = self.form_path(id);
        let id = id.to_string();
        let patch = patch.clone();
        Box::pin(async move {
            let mut schema = Self::read(&path, &id)?;
            patch.apply_to(&mut schema);
            Self::write(&path, &schema)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, PersistResult<FormSchema>> {
        let path = self.form_path(id);
        let id = id.to_string();
        Box::pin(async move { Self::read(&path, &id) })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, PersistResult<()>> {
        let path = self.form_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    PersistError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, PersistResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&base)
                .map_err(|e| PersistError::Io(format!("Failed to read directory: {}", e)))?;

            let ids = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect();
            Ok(ids)
        })
    }
}
