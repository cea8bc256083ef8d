//! Persistence adapter for saving forms to a backend.
//!
//! The editor never talks to a backend directly. It builds a [`SaveRequest`]
//! (which runs the size guards, so oversized content never reaches the
//! network) and hands it to a [`PersistenceAdapter`].

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryAdapter;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileAdapter;

use crate::patch::Patch;
use crate::schema::{CtaButtonData, FormFieldData, FormSchema, GlobalStyles};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Default rich-content cap: 10 MB.
pub const DEFAULT_RICH_CONTENT_LIMIT: usize = 10 * 1024 * 1024;
/// Default background image cap: 5 MB.
pub const DEFAULT_BACKGROUND_LIMIT: usize = 5 * 1024 * 1024;

/// Persistence errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistError {
    #[error("Rich content is too large ({size} bytes, limit {limit} bytes)")]
    RichContentTooLarge { size: usize, limit: usize },
    #[error("Background image is too large ({size} bytes, limit {limit} bytes)")]
    BackgroundTooLarge { size: usize, limit: usize },
    #[error("Form not found: {0}")]
    NotFound(String),
    /// Message reported by the backend, passed through unchanged.
    #[error("{0}")]
    Server(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
}

impl PersistError {
    /// Check if the error was raised locally before any adapter call.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            PersistError::RichContentTooLarge { .. } | PersistError::BackgroundTooLarge { .. }
        )
    }
}

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Boxed future for adapter calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Backend that stores forms.
///
/// Implementations may store forms in memory, on disk, or behind an HTTP API.
pub trait PersistenceAdapter: Send + Sync {
    /// Store a new form and return its identifier.
    fn create(&self, payload: &FormPayload) -> BoxFuture<'_, PersistResult<String>>;

    /// Apply a partial update to an existing form.
    fn update(&self, id: &str, patch: &FormPatch) -> BoxFuture<'_, PersistResult<()>>;

    /// Fetch a stored form.
    fn load(&self, id: &str) -> BoxFuture<'_, PersistResult<FormSchema>>;

    /// Remove a stored form. Missing forms are not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, PersistResult<()>>;

    /// List stored form identifiers.
    fn list(&self) -> BoxFuture<'_, PersistResult<Vec<String>>>;
}

/// Full form sent on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FormFieldData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_styles: Option<GlobalStyles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_button: Option<CtaButtonData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_content: Option<String>,
}

impl FormPayload {
    pub fn from_schema(schema: &FormSchema) -> Self {
        Self {
            title: schema.title.clone(),
            description: schema.description.clone(),
            fields: schema.fields.clone(),
            global_styles: schema.global_styles.clone(),
            cta_button: schema.cta_button.clone(),
            background_image: schema.background_image.clone(),
            editor_content: schema.editor_content.clone(),
        }
    }

    pub fn into_schema(self) -> FormSchema {
        let mut schema = FormSchema {
            title: self.title,
            description: self.description,
            fields: self.fields,
            global_styles: self.global_styles,
            cta_button: self.cta_button,
            background_image: self.background_image,
            editor_content: self.editor_content,
        };
        schema.normalize();
        schema
    }
}

/// Partial update sent on save of an existing form.
///
/// `backgroundImage`, `editorContent` and `ctaButton` are tri-state: an
/// absent key keeps the stored value and `null` removes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FormFieldData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_styles: Option<GlobalStyles>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub cta_button: Patch<CtaButtonData>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub background_image: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub editor_content: Patch<String>,
}

impl FormPatch {
    /// Patch carrying the whole document.
    ///
    /// The background is sent only as `background`, so an untouched
    /// background is left as stored.
    pub fn from_schema(schema: &FormSchema, background: Patch<String>) -> Self {
        Self {
            title: Some(schema.title.clone()),
            description: Some(schema.description.clone()),
            fields: Some(schema.fields.clone()),
            global_styles: schema.global_styles.clone(),
            cta_button: Patch::from_option(schema.cta_button.clone()),
            background_image: background,
            editor_content: Patch::from_option(schema.editor_content.clone()),
        }
    }

    /// Patch carrying only the rich content.
    pub fn rich_content(content: Option<String>) -> Self {
        Self {
            editor_content: Patch::from_option(content),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to a stored form.
    pub fn apply_to(&self, schema: &mut FormSchema) {
        if let Some(title) = &self.title {
            schema.title = title.clone();
        }
        if let Some(description) = &self.description {
            schema.description = description.clone();
        }
        if let Some(fields) = &self.fields {
            schema.fields = fields.clone();
        }
        if let Some(globals) = &self.global_styles {
            schema.global_styles = Some(globals.clone());
        }
        self.cta_button.as_ref().cloned().apply_to(&mut schema.cta_button);
        self.background_image.as_ref().cloned().apply_to(&mut schema.background_image);
        self.editor_content.as_ref().cloned().apply_to(&mut schema.editor_content);
    }
}

/// Where a save goes.
///
/// Decided only by whether the editor holds an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(String),
}

impl SaveTarget {
    pub fn from_id(id: Option<&str>) -> Self {
        match id {
            Some(id) if !id.is_empty() => SaveTarget::Update(id.to_string()),
            _ => SaveTarget::Create,
        }
    }
}

/// Size caps checked before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub rich_content: usize,
    pub background: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            rich_content: DEFAULT_RICH_CONTENT_LIMIT,
            background: DEFAULT_BACKGROUND_LIMIT,
        }
    }
}

impl SizeLimits {
    pub fn check_rich_content(&self, content: &str) -> PersistResult<()> {
        let size = content.len();
        if size > self.rich_content {
            log::warn!("Rejected rich content of {} bytes", size);
            return Err(PersistError::RichContentTooLarge {
                size,
                limit: self.rich_content,
            });
        }
        Ok(())
    }

    pub fn check_background(&self, reference: &str) -> PersistResult<()> {
        let size = background_size(reference);
        if size > self.background {
            log::warn!("Rejected background image of {} bytes", size);
            return Err(PersistError::BackgroundTooLarge {
                size,
                limit: self.background,
            });
        }
        Ok(())
    }

    /// Check every guarded part of a document.
    pub fn check_schema(&self, schema: &FormSchema) -> PersistResult<()> {
        if let Some(content) = &schema.editor_content {
            self.check_rich_content(content)?;
        }
        if let Some(background) = &schema.background_image {
            self.check_background(background)?;
        }
        Ok(())
    }
}

/// Byte size of a background reference.
///
/// For a base64 data URL this is the decoded image size. Anything else is
/// measured as-is.
pub fn background_size(reference: &str) -> usize {
    let Some(rest) = reference.strip_prefix("data:") else {
        return reference.len();
    };
    match rest.split_once(',') {
        Some((meta, data)) if meta.ends_with(";base64") => STANDARD
            .decode(data.trim())
            .map(|bytes| bytes.len())
            .unwrap_or(reference.len()),
        Some((_, data)) => data.len(),
        None => reference.len(),
    }
}

/// A save that passed the local guards.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest {
    Create(FormPayload),
    Update { id: String, patch: FormPatch },
}

impl SaveRequest {
    /// Build the request for saving `schema`.
    ///
    /// Fails before anything is sent when the rich content or background is
    /// over its cap.
    pub fn prepare(
        target: SaveTarget,
        schema: &FormSchema,
        background: Patch<String>,
        limits: SizeLimits,
    ) -> PersistResult<Self> {
        limits.check_schema(schema)?;
        Ok(match target {
            SaveTarget::Create => SaveRequest::Create(FormPayload::from_schema(schema)),
            SaveTarget::Update(id) => SaveRequest::Update {
                id,
                patch: FormPatch::from_schema(schema, background),
            },
        })
    }

    /// Send to `adapter`. Returns the form's identifier.
    pub async fn send(self, adapter: &dyn PersistenceAdapter) -> PersistResult<String> {
        match self {
            SaveRequest::Create(payload) => {
                let id = adapter.create(&payload).await?;
                log::info!("Created form {}", id);
                Ok(id)
            }
            SaveRequest::Update { id, patch } => {
                adapter.update(&id, &patch).await?;
                log::info!("Updated form {}", id);
                Ok(id)
            }
        }
    }
}

/// Minimal executor for driving adapter futures in tests.
#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    #[test]
    fn test_save_target_from_id() {
        assert_eq!(SaveTarget::from_id(None), SaveTarget::Create);
        assert_eq!(SaveTarget::from_id(Some("")), SaveTarget::Create);
        assert_eq!(
            SaveTarget::from_id(Some("abc")),
            SaveTarget::Update("abc".to_string())
        );
    }

    #[test]
    fn test_rich_content_guard_boundary() {
        let limits = SizeLimits::default();
        let exact = "a".repeat(DEFAULT_RICH_CONTENT_LIMIT);
        assert!(limits.check_rich_content(&exact).is_ok());

        let over = "a".repeat(DEFAULT_RICH_CONTENT_LIMIT + 1);
        let err = limits.check_rich_content(&over).unwrap_err();
        assert!(err.is_local());
        assert!(matches!(err, PersistError::RichContentTooLarge { .. }));
    }

    #[test]
    fn test_background_size_decodes_data_urls() {
        let bytes = vec![0u8; 300];
        let url = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));
        assert_eq!(background_size(&url), 300);
        assert_eq!(background_size("https://cdn.example.com/bg.png"), 30);
    }

    #[test]
    fn test_background_guard() {
        let limits = SizeLimits {
            background: 100,
            ..SizeLimits::default()
        };
        let small = format!("data:image/png;base64,{}", STANDARD.encode([1u8; 100]));
        let large = format!("data:image/png;base64,{}", STANDARD.encode([1u8; 101]));
        assert!(limits.check_background(&small).is_ok());
        assert!(matches!(
            limits.check_background(&large),
            Err(PersistError::BackgroundTooLarge { size: 101, .. })
        ));
    }

    #[test]
    fn test_patch_wire_format() {
        let mut schema = FormSchema::new("Form");
        schema.background_image = None;
        let patch = FormPatch::from_schema(&schema, Patch::Clear);
        let json = serde_json::to_value(&patch).unwrap();
        assert!(json["backgroundImage"].is_null());
        assert!(json.as_object().unwrap().contains_key("backgroundImage"));

        let patch = FormPatch::from_schema(&schema, Patch::Keep);
        let json = serde_json::to_value(&patch).unwrap();
        assert!(!json.as_object().unwrap().contains_key("backgroundImage"));
    }

    #[test]
    fn test_patch_apply() {
        let mut stored = FormSchema::new("Stored");
        stored.background_image = Some("bg.png".to_string());
        stored.editor_content = Some("old".to_string());

        FormPatch::rich_content(Some("new".to_string())).apply_to(&mut stored);
        assert_eq!(stored.editor_content.as_deref(), Some("new"));
        assert_eq!(stored.background_image.as_deref(), Some("bg.png"));
        assert_eq!(stored.title, "Stored");

        let mut edited = stored.clone();
        edited.title = "Edited".to_string();
        edited.push_field(FormFieldData::new(FieldType::Email));
        FormPatch::from_schema(&edited, Patch::Clear).apply_to(&mut stored);
        assert_eq!(stored.title, "Edited");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.background_image, None);
    }

    #[test]
    fn test_oversized_save_is_not_prepared() {
        let mut schema = FormSchema::new("Big");
        schema.editor_content = Some("x".repeat(DEFAULT_RICH_CONTENT_LIMIT + 1));
        let result = SaveRequest::prepare(
            SaveTarget::Create,
            &schema,
            Patch::Keep,
            SizeLimits::default(),
        );
        assert!(matches!(result, Err(PersistError::RichContentTooLarge { .. })));
    }

    #[test]
    fn test_send_create_then_update() {
        let adapter = MemoryAdapter::new();
        let schema = FormSchema::new("Form");

        let request =
            SaveRequest::prepare(SaveTarget::Create, &schema, Patch::Keep, SizeLimits::default())
                .unwrap();
        let id = block_on(request.send(&adapter)).unwrap();
        assert_eq!(adapter.create_calls(), 1);

        let request = SaveRequest::prepare(
            SaveTarget::from_id(Some(&id)),
            &schema,
            Patch::Keep,
            SizeLimits::default(),
        )
        .unwrap();
        assert_eq!(block_on(request.send(&adapter)).unwrap(), id);
        assert_eq!(adapter.create_calls(), 1);
        assert_eq!(adapter.update_calls(), 1);
    }
}
