//! FormCraft Core Library
//!
//! Platform-agnostic document model and editing engine for the FormCraft
//! form builder.

pub mod autosave;
pub mod cascade;
pub mod config;
pub mod editor;
pub mod export;
pub mod gesture;
pub mod history;
pub mod inspector;
pub mod palette;
pub mod patch;
pub mod persistence;
pub mod schema;
pub mod selection;
pub mod shortcuts;
pub mod store;

pub use autosave::Debounce;
pub use config::{ConfigError, EditorConfig};
pub use editor::{DropResult, FormEditor};
pub use export::{ExportArtifact, ExportError, slugify};
pub use gesture::{GestureController, GestureError, PointerEvent, ResizeHandle, ResizeSession};
pub use history::History;
pub use inspector::{CtaPatch, FieldPatch, GlobalStylesPatch};
pub use palette::{PaletteCategory, TemplateCategory, template};
pub use patch::Patch;
pub use persistence::{FormPatch, FormPayload, PersistError, PersistenceAdapter, SaveTarget};
pub use schema::{CtaButtonData, FieldId, FieldType, FieldWidth, FormFieldData, FormSchema, GlobalStyles};
pub use selection::{InspectorTab, Selection};
pub use shortcuts::{EditorCommand, Modifiers};
pub use store::SchemaStore;
