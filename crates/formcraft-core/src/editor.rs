//! The form editor: one document, its history, and the interaction state
//! around it.
//!
//! Every change to the document goes through the [`SchemaStore`], so each
//! user action is exactly one history entry. Selection, gestures and the
//! rich-content debounce are UI state and never enter history.

use crate::autosave::Debounce;
use crate::cascade::{apply_global_styles, apply_global_styles_to_cta, seed_cta_style, seed_field_style};
use crate::config::EditorConfig;
use crate::export::{ExportArtifact, ExportError};
use crate::gesture::{DropOutcome, GestureController, GestureError, PointerEvent, PointerOutcome, ResizeHandle};
use crate::inspector::{CtaPatch, FieldPatch, GlobalStylesPatch};
use crate::palette::{TemplateCategory, template};
use crate::patch::Patch;
use crate::persistence::{FormPatch, PersistResult, PersistenceAdapter, SaveRequest, SaveTarget};
use crate::schema::{CtaButtonData, FieldId, FieldType, FieldWidth, FormFieldData, FormSchema};
use crate::selection::{InspectorTab, InspectorView, Selection, SelectionState};
use crate::shortcuts::{EditorCommand, KeyBindings, Modifiers};
use crate::store::SchemaStore;
use kurbo::{Point, Size};
use std::sync::Arc;
use std::time::Instant;

/// What a drop did to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropResult {
    /// A new field was appended and selected.
    Created(FieldId),
    /// A field moved between positions.
    Moved { from: usize, to: usize },
}

/// Editor for a single form.
#[derive(Debug)]
pub struct FormEditor {
    store: SchemaStore,
    selection: SelectionState,
    gestures: GestureController,
    bindings: KeyBindings,
    rich_content: Debounce<String>,
    form_id: Option<String>,
    /// Background as last stored by the backend.
    saved_background: Option<String>,
    config: EditorConfig,
}

impl Default for FormEditor {
    fn default() -> Self {
        Self::new(FormSchema::default())
    }
}

impl FormEditor {
    /// Edit a new, unsaved form.
    pub fn new(schema: FormSchema) -> Self {
        Self::with_config(schema, EditorConfig::default())
    }

    pub fn with_config(mut schema: FormSchema, config: EditorConfig) -> Self {
        schema.normalize();
        Self {
            store: SchemaStore::with_capacity(schema, config.history_capacity),
            selection: SelectionState::new(),
            gestures: GestureController::new(config.resize_limits()),
            bindings: KeyBindings::new(),
            rich_content: Debounce::new(config.debounce()),
            form_id: None,
            saved_background: None,
            config,
        }
    }

    /// Start from one of the starter templates.
    pub fn from_template(category: TemplateCategory, config: EditorConfig) -> Self {
        let globals = FormSchema::default().globals();
        Self::with_config(template(category, &globals), config)
    }

    /// Edit a form that already exists in the backend.
    pub fn open(id: impl Into<String>, schema: FormSchema, config: EditorConfig) -> Self {
        let mut editor = Self::with_config(schema, config);
        editor.form_id = Some(id.into());
        editor.saved_background = editor.schema().background_image.clone();
        editor
    }

    /// Fetch a form by id and open it.
    pub async fn load(
        adapter: &dyn PersistenceAdapter,
        id: &str,
        config: EditorConfig,
    ) -> PersistResult<Self> {
        let schema = adapter.load(id).await?;
        log::info!("Loaded form {}", id);
        Ok(Self::open(id, schema, config))
    }

    pub fn schema(&self) -> &FormSchema {
        self.store.state()
    }

    /// Shared handle to the current snapshot.
    pub fn snapshot(&self) -> Arc<FormSchema> {
        self.store.snapshot()
    }

    pub fn form_id(&self) -> Option<&str> {
        self.form_id.as_deref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn save_target(&self) -> SaveTarget {
        SaveTarget::from_id(self.form_id())
    }

    /// Background change to send on the next update, relative to what the
    /// backend last stored. Follows undo and redo.
    pub fn background_patch(&self) -> Patch<String> {
        let current = &self.schema().background_image;
        if *current == self.saved_background {
            Patch::Keep
        } else {
            Patch::from_option(current.clone())
        }
    }

    // --- Lifecycle ---

    /// Activate keyboard bindings.
    pub fn mount(&mut self) {
        self.bindings.mount();
    }

    /// Tear down: release the pointer, deactivate bindings and commit any
    /// pending rich content.
    ///
    /// Returns the rich-content patch to persist, if one was pending.
    pub fn unmount(&mut self) -> PersistResult<Option<FormPatch>> {
        self.gestures.cancel();
        self.bindings.unmount();
        self.flush_rich_content()
    }

    pub fn is_mounted(&self) -> bool {
        self.bindings.is_mounted()
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        let moved = self.store.undo();
        if moved {
            self.selection.reconcile(self.store.state());
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.store.redo();
        if moved {
            self.selection.reconcile(self.store.state());
        }
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    pub fn clear_history(&mut self) {
        self.store.clear_history();
    }

    pub fn history_len(&self) -> usize {
        self.store.history_len()
    }

    /// Route a key press. Returns the command that ran, if any.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Option<EditorCommand> {
        let command = self.bindings.handle_key(key, modifiers)?;
        match command {
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
        };
        Some(command)
    }

    // --- Document metadata ---

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        if self.schema().title == title {
            return false;
        }
        self.store.modify(|s| s.title = title);
        true
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> bool {
        let description = description.into();
        if self.schema().description == description {
            return false;
        }
        self.store.modify(|s| s.description = description);
        true
    }

    /// Set or remove the background image.
    ///
    /// An oversized image is rejected here as well as on save.
    pub fn set_background(&mut self, reference: Option<String>) -> PersistResult<()> {
        if let Some(reference) = &reference {
            self.config.size_limits().check_background(reference)?;
        }
        if self.schema().background_image == reference {
            return Ok(());
        }
        self.store.modify(|s| s.background_image = reference);
        Ok(())
    }

    // --- Structural edits ---

    /// Append a field of `field_type` styled from the global styles and
    /// select it.
    pub fn add_field(&mut self, field_type: FieldType) -> FieldId {
        let style = seed_field_style(&self.schema().globals());
        let field = FormFieldData::with_style(field_type, style);
        let id = self.store.modify(|s| s.push_field(field));
        log::debug!("Added {} field {}", field_type, id);
        self.selection.select_field(id.clone());
        id
    }

    /// Remove a field. Clears the selection if it was selected.
    pub fn delete_field(&mut self, id: &str) -> bool {
        if self.schema().field(id).is_none() {
            return false;
        }
        self.store.modify(|s| s.remove_field(id));
        self.selection.field_removed(id);
        true
    }

    /// Insert a copy right after `id` and select it.
    pub fn duplicate_field(&mut self, id: &str) -> Option<FieldId> {
        self.schema().field(id)?;
        let copy = self.store.modify(|s| s.duplicate_field(id))?;
        self.selection.select_field(copy.clone());
        Some(copy)
    }

    /// Move the field at `from` to position `to`.
    /// Moving onto the same position records nothing.
    pub fn reorder_field(&mut self, from: usize, to: usize) -> bool {
        let len = self.schema().len();
        if from >= len || from == to.min(len.saturating_sub(1)) {
            return false;
        }
        self.store.modify(|s| s.move_field(from, to))
    }

    /// Merge an inspector edit into a field.
    pub fn update_field(&mut self, id: &str, patch: &FieldPatch) -> bool {
        let Some(field) = self.schema().field(id) else {
            return false;
        };
        let mut updated = field.clone();
        if !patch.apply(&mut updated) {
            return false;
        }
        self.store.modify(|s| {
            if let Some(field) = s.field_mut(id) {
                *field = updated;
            }
        });
        true
    }

    // --- Call to action ---

    /// Add a CTA styled from the global styles, unless one exists.
    pub fn add_cta(&mut self) -> bool {
        if self.schema().cta_button.is_some() {
            return false;
        }
        let style = seed_cta_style(&self.schema().globals());
        let cta = CtaButtonData::new(crate::schema::DEFAULT_CTA_TEXT, style);
        self.store.modify(|s| s.cta_button = Some(cta));
        true
    }

    pub fn remove_cta(&mut self) -> bool {
        if self.schema().cta_button.is_none() {
            return false;
        }
        self.store.modify(|s| s.cta_button = None);
        if self.selection.is_cta_selected() {
            self.selection.clear();
        }
        true
    }

    pub fn update_cta(&mut self, patch: &CtaPatch) -> bool {
        let Some(cta) = &self.schema().cta_button else {
            return false;
        };
        let mut updated = cta.clone();
        if !patch.apply(&mut updated) {
            return false;
        }
        self.store.modify(|s| s.cta_button = Some(updated));
        true
    }

    // --- Global styles ---

    /// Change the global styles. Existing fields keep their own styles.
    pub fn update_global_styles(&mut self, patch: &GlobalStylesPatch) -> bool {
        let mut globals = self.schema().globals();
        if !patch.apply(&mut globals) {
            return false;
        }
        self.store.modify(|s| s.global_styles = Some(globals));
        true
    }

    /// Push the global styles onto every field and the CTA as one history
    /// entry.
    pub fn apply_global_styles_to_all(&mut self) -> bool {
        let globals = self.schema().globals();
        let fields = apply_global_styles(&globals, &self.schema().fields);
        let cta = self
            .schema()
            .cta_button
            .as_ref()
            .map(|cta| apply_global_styles_to_cta(&globals, cta));
        if fields == self.schema().fields && cta == self.schema().cta_button {
            return false;
        }
        self.store.modify(|s| {
            s.fields = fields;
            s.cta_button = cta;
        });
        log::debug!("Applied global styles to all fields");
        true
    }

    // --- Selection ---

    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    pub fn inspector(&self) -> InspectorView<'_> {
        self.selection.inspector()
    }

    pub fn select_field(&mut self, id: &str) -> bool {
        if self.schema().field(id).is_none() {
            return false;
        }
        self.selection.select_field(id);
        true
    }

    pub fn select_cta(&mut self) -> bool {
        if self.schema().cta_button.is_none() {
            return false;
        }
        self.selection.select_cta();
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn set_inspector_tab(&mut self, tab: InspectorTab) {
        self.selection.set_tab(tab);
    }

    /// The selected field, if any.
    pub fn selected_field(&self) -> Option<&FormFieldData> {
        self.selection
            .selected_field()
            .and_then(|id| self.schema().field(id))
    }

    // --- Gestures ---

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn begin_palette_drag(&mut self, field_type: FieldType) -> Result<(), GestureError> {
        self.gestures.begin_palette_drag(field_type)
    }

    pub fn begin_field_drag(&mut self, id: &str) -> Result<(), GestureError> {
        let index = self
            .schema()
            .field_index(id)
            .ok_or_else(|| GestureError::FieldNotFound(id.to_string()))?;
        self.gestures.begin_field_drag(index)
    }

    pub fn drag_over(&mut self, index: usize) {
        self.gestures.drag_over(index);
    }

    /// Complete the active drag.
    pub fn drop(&mut self, target: Option<usize>) -> Option<DropResult> {
        let outcome = self.gestures.drop(target)?;
        self.apply_drop(outcome)
    }

    /// Complete a drag from an encoded data-transfer payload.
    pub fn drop_encoded(&mut self, data: &str, target: Option<usize>) -> Option<DropResult> {
        let outcome = self.gestures.drop_encoded(data, target)?;
        self.apply_drop(outcome)
    }

    fn apply_drop(&mut self, outcome: DropOutcome) -> Option<DropResult> {
        match outcome {
            DropOutcome::Create(field_type) => Some(DropResult::Created(self.add_field(field_type))),
            DropOutcome::Reorder { from, to } => {
                let to = to.min(self.schema().len().saturating_sub(1));
                self.reorder_field(from, to).then_some(DropResult::Moved { from, to })
            }
        }
    }

    /// Press on a resize handle. Only the selected field can be resized.
    pub fn begin_resize(
        &mut self,
        id: &str,
        handle: ResizeHandle,
        rendered_size: Size,
        pointer: Point,
    ) -> Result<(), GestureError> {
        if self.schema().field(id).is_none() {
            return Err(GestureError::FieldNotFound(id.to_string()));
        }
        if !self.selection.is_field_selected(id) {
            return Err(GestureError::NotSelected(id.to_string()));
        }
        self.gestures.begin_resize(id.to_string(), handle, rendered_size, pointer)
    }

    /// Live preview of the field being resized.
    pub fn resize_preview(&self) -> Option<(&str, Size)> {
        self.gestures.preview()
    }

    /// Route a pointer event while a gesture holds the pointer.
    ///
    /// Releasing a resize commits the final width as a percentage of
    /// `container_width`, as a single history entry.
    pub fn handle_pointer(&mut self, event: PointerEvent, container_width: f64) -> PointerOutcome {
        let outcome = self.gestures.handle_pointer(event);
        if let PointerOutcome::ResizeEnded(session) = &outcome {
            if session.changed() {
                if let Some(width) = session.width_percent(container_width) {
                    self.set_field_width(&session.field_id, width);
                }
            }
        }
        outcome
    }

    fn set_field_width(&mut self, id: &str, width: FieldWidth) -> bool {
        self.update_field(id, &FieldPatch::width(width))
    }

    pub fn cancel_gesture(&mut self) -> bool {
        self.gestures.cancel()
    }

    // --- Rich content ---

    /// Record a rich-content edit. It is committed once edits pause for the
    /// debounce delay.
    pub fn edit_rich_content(&mut self, content: impl Into<String>, now: Instant) {
        self.rich_content.schedule(content.into(), now);
    }

    pub fn rich_content_pending(&self) -> bool {
        self.rich_content.is_pending()
    }

    /// Commit rich content whose debounce has fired.
    ///
    /// Returns the patch to persist. Oversized content is committed locally
    /// but fails the size guard.
    pub fn poll_rich_content(&mut self, now: Instant) -> PersistResult<Option<FormPatch>> {
        match self.rich_content.poll(now) {
            Some(content) => self.commit_rich_content(content).map(Some),
            None => Ok(None),
        }
    }

    /// Commit pending rich content immediately.
    pub fn flush_rich_content(&mut self) -> PersistResult<Option<FormPatch>> {
        match self.rich_content.flush() {
            Some(content) => self.commit_rich_content(content).map(Some),
            None => Ok(None),
        }
    }

    fn commit_rich_content(&mut self, content: String) -> PersistResult<FormPatch> {
        let content = (!content.is_empty()).then_some(content);
        if self.schema().editor_content != content {
            let committed = content.clone();
            self.store.modify(|s| s.editor_content = committed);
        }
        if let Some(content) = &content {
            self.config.size_limits().check_rich_content(content)?;
        }
        Ok(FormPatch::rich_content(content))
    }

    /// Commit fired rich content and persist it to an already saved form.
    ///
    /// Unsaved forms are only committed locally. Returns true if an update
    /// was sent.
    pub async fn autosave(&mut self, adapter: &dyn PersistenceAdapter, now: Instant) -> PersistResult<bool> {
        let Some(patch) = self.poll_rich_content(now)? else {
            return Ok(false);
        };
        let Some(id) = self.form_id.clone() else {
            return Ok(false);
        };
        adapter.update(&id, &patch).await.inspect_err(|e| {
            log::warn!("Autosave of form {} failed: {}", id, e);
        })?;
        Ok(true)
    }

    // --- Persistence ---

    /// Save the form. Creates it on first save and updates it afterwards.
    ///
    /// Size guards run before any adapter call. On failure the document is
    /// left as it was and the error is returned unchanged.
    pub async fn save(&mut self, adapter: &dyn PersistenceAdapter) -> PersistResult<String> {
        self.flush_rich_content()?;
        let request = SaveRequest::prepare(
            self.save_target(),
            self.schema(),
            self.background_patch(),
            self.config.size_limits(),
        )
        .inspect_err(|e| log::warn!("Save rejected: {}", e))?;
        let sent_background = self.schema().background_image.clone();

        let id = request
            .send(adapter)
            .await
            .inspect_err(|e| log::warn!("Save failed: {}", e))?;
        self.form_id = Some(id.clone());
        self.saved_background = sent_background;
        Ok(id)
    }

    /// Serialize the current form to a downloadable JSON file.
    pub fn export(&self) -> Result<ExportArtifact, ExportError> {
        ExportArtifact::from_schema(self.schema())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{Corner, Edge, MouseButton};
    use crate::inspector::FieldStylePatch;
    use crate::persistence::{DEFAULT_RICH_CONTENT_LIMIT, MemoryAdapter, PersistError, block_on};
    use crate::schema::TextAlign;
    use std::time::Duration;

    fn editor_with(types: &[FieldType]) -> (FormEditor, Vec<FieldId>) {
        let mut editor = FormEditor::default();
        let ids = types.iter().map(|t| editor.add_field(*t)).collect();
        (editor, ids)
    }

    fn ids(editor: &FormEditor) -> Vec<FieldId> {
        editor.schema().fields.iter().map(|f| f.id.clone()).collect()
    }

    #[test]
    fn test_add_field_defaults() {
        let mut editor = FormEditor::default();
        let id = editor.add_field(FieldType::Checkbox);

        let field = editor.schema().field(&id).unwrap();
        assert_eq!(field.options, vec!["Option 1", "Option 2", "Option 3"]);
        assert_eq!(field.width, FieldWidth::FULL);
        assert_eq!(field.order, 0);
        assert_eq!(field.style, seed_field_style(&editor.schema().globals()));
        assert_eq!(editor.selection(), &Selection::Field(id));
    }

    #[test]
    fn test_new_field_seeded_from_current_globals() {
        let mut editor = FormEditor::default();
        editor.update_global_styles(&GlobalStylesPatch {
            font_family: Some("Georgia, serif".to_string()),
            ..GlobalStylesPatch::default()
        });
        let id = editor.add_field(FieldType::Text);
        assert_eq!(editor.schema().field(&id).unwrap().style.font_family, "Georgia, serif");
    }

    #[test]
    fn test_global_styles_do_not_cascade_live() {
        let (mut editor, ids) = editor_with(&[FieldType::Text]);
        editor.update_global_styles(&GlobalStylesPatch {
            font_size: Some("22px".to_string()),
            ..GlobalStylesPatch::default()
        });
        assert_eq!(editor.schema().field(&ids[0]).unwrap().style.font_size, "16px");

        let before = editor.history_len();
        assert!(editor.apply_global_styles_to_all());
        assert_eq!(editor.history_len(), before + 1);
        assert_eq!(editor.schema().field(&ids[0]).unwrap().style.font_size, "22px");
        assert!(!editor.apply_global_styles_to_all());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let (mut editor, ids) = editor_with(&[FieldType::Text, FieldType::Email]);
        let before = editor.schema().clone();

        editor.update_field(&ids[1], &FieldPatch::label("Work email"));
        editor.reorder_field(1, 0);
        let after = editor.schema().clone();

        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(*editor.schema(), before);
        assert!(editor.redo());
        assert!(editor.redo());
        assert_eq!(*editor.schema(), after);
    }

    #[test]
    fn test_history_capacity() {
        let config = EditorConfig {
            history_capacity: 5,
            ..EditorConfig::default()
        };
        let mut editor = FormEditor::with_config(FormSchema::default(), config);
        for i in 0..10 {
            editor.set_title(format!("Title {i}"));
        }
        assert_eq!(editor.history_len(), 5);
        let mut undos = 0;
        while editor.undo() {
            undos += 1;
        }
        assert_eq!(undos, 4);
        assert_eq!(editor.schema().title, "Title 5");
    }

    #[test]
    fn test_noop_reorder_records_nothing() {
        let (mut editor, _) = editor_with(&[FieldType::Text, FieldType::Email]);
        let before = editor.history_len();
        assert!(!editor.reorder_field(1, 1));
        assert!(!editor.reorder_field(5, 0));

        let first = editor.schema().fields[0].id.clone();
        editor.begin_field_drag(&first).unwrap();
        editor.drag_over(0);
        assert_eq!(editor.drop(None), None);
        assert_eq!(editor.history_len(), before);
    }

    #[test]
    fn test_reorder_via_drag() {
        let (mut editor, field_ids) = editor_with(&[FieldType::Text, FieldType::Email, FieldType::Tel]);
        editor.begin_field_drag(&field_ids[0]).unwrap();
        editor.drag_over(2);
        assert_eq!(editor.drop(None), Some(DropResult::Moved { from: 0, to: 2 }));
        assert_eq!(
            ids(&editor),
            vec![field_ids[1].clone(), field_ids[2].clone(), field_ids[0].clone()]
        );
        assert!(editor.schema().is_consistent());
    }

    #[test]
    fn test_create_via_palette_drag() {
        let mut editor = FormEditor::default();
        editor.begin_palette_drag(FieldType::Radio).unwrap();
        let Some(DropResult::Created(id)) = editor.drop(Some(0)) else {
            panic!("expected a created field");
        };
        assert_eq!(editor.schema().len(), 1);
        assert_eq!(editor.selection(), &Selection::Field(id));
    }

    #[test]
    fn test_duplicate_field() {
        let (mut editor, ids) = editor_with(&[FieldType::Text, FieldType::Email]);
        editor.update_field(
            &ids[0],
            &FieldPatch::style(FieldStylePatch {
                text_align: Some(TextAlign::Right),
                ..FieldStylePatch::default()
            }),
        );
        let copy_id = editor.duplicate_field(&ids[0]).unwrap();

        let schema = editor.schema();
        let original = schema.field(&ids[0]).unwrap();
        let copy = schema.field(&copy_id).unwrap();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.label, format!("{} (Copy)", original.label));
        assert_eq!(copy.style, original.style);
        assert_eq!(copy.order, original.order + 1);
        assert_eq!(schema.fields[2].id, ids[1]);
        assert!(schema.is_consistent());
        assert_eq!(editor.selection(), &Selection::Field(copy_id));
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let (mut editor, ids) = editor_with(&[FieldType::Text, FieldType::Email]);
        assert!(editor.select_field(&ids[0]));
        assert!(editor.delete_field(&ids[0]));
        assert_eq!(editor.selection(), &Selection::None);
        assert!(!editor.delete_field(&ids[0]));
        assert_eq!(editor.schema().fields[0].order, 0);
    }

    #[test]
    fn test_undo_clears_stale_selection() {
        let mut editor = FormEditor::default();
        editor.add_field(FieldType::Text);
        editor.undo();
        assert_eq!(editor.selection(), &Selection::None);
    }

    #[test]
    fn test_emptying_options_repairs() {
        let (mut editor, ids) = editor_with(&[FieldType::Select]);
        editor.update_field(
            &ids[0],
            &FieldPatch {
                options: Some(vec![]),
                ..FieldPatch::default()
            },
        );
        assert_eq!(editor.schema().fields[0].options, vec!["Option 1"]);
    }

    #[test]
    fn test_unchanged_update_records_nothing() {
        let (mut editor, ids) = editor_with(&[FieldType::Text]);
        let label = editor.schema().fields[0].label.clone();
        let before = editor.history_len();
        assert!(!editor.update_field(&ids[0], &FieldPatch::label(label)));
        assert!(!editor.update_field("missing", &FieldPatch::label("x")));
        assert_eq!(editor.history_len(), before);
    }

    #[test]
    fn test_resize_commits_once_on_release() {
        let (mut editor, ids) = editor_with(&[FieldType::Text]);
        let before = editor.history_len();

        editor
            .begin_resize(
                &ids[0],
                ResizeHandle::Edge(Edge::Right),
                Size::new(800.0, 48.0),
                Point::new(800.0, 24.0),
            )
            .unwrap();
        for x in [780.0, 700.0, 600.0] {
            editor.handle_pointer(PointerEvent::Move { position: Point::new(x, 24.0) }, 800.0);
        }
        assert_eq!(editor.resize_preview(), Some((ids[0].as_str(), Size::new(600.0, 48.0))));
        assert_eq!(editor.history_len(), before);

        editor.handle_pointer(
            PointerEvent::Up {
                position: Point::new(400.0, 24.0),
                button: MouseButton::Left,
            },
            800.0,
        );
        assert_eq!(editor.history_len(), before + 1);
        assert_eq!(editor.schema().fields[0].width.to_css(), "50%");
        assert!(!editor.gestures().captures_pointer());
    }

    #[test]
    fn test_corner_resize_commits_width() {
        let (mut editor, ids) = editor_with(&[FieldType::Textarea]);
        editor
            .begin_resize(
                &ids[0],
                ResizeHandle::Corner(Corner::BottomRight),
                Size::new(400.0, 100.0),
                Point::new(400.0, 100.0),
            )
            .unwrap();
        editor.handle_pointer(
            PointerEvent::Up {
                position: Point::new(200.0, 110.0),
                button: MouseButton::Left,
            },
            800.0,
        );
        assert_eq!(editor.schema().fields[0].width.to_css(), "25%");
    }

    #[test]
    fn test_resize_requires_selection() {
        let (mut editor, ids) = editor_with(&[FieldType::Text, FieldType::Email]);
        // The last added field is selected
        let result = editor.begin_resize(
            &ids[0],
            ResizeHandle::Edge(Edge::Right),
            Size::new(100.0, 40.0),
            Point::ZERO,
        );
        assert_eq!(result, Err(GestureError::NotSelected(ids[0].clone())));
    }

    #[test]
    fn test_keyboard_only_while_mounted() {
        let (mut editor, _) = editor_with(&[FieldType::Text]);
        assert_eq!(editor.handle_key("z", Modifiers::primary_only()), None);
        assert_eq!(editor.schema().len(), 1);

        editor.mount();
        assert_eq!(editor.handle_key("z", Modifiers::primary_only()), Some(EditorCommand::Undo));
        assert_eq!(editor.schema().len(), 0);
        assert_eq!(editor.handle_key("Z", Modifiers::primary_shift()), Some(EditorCommand::Redo));
        assert_eq!(editor.schema().len(), 1);
    }

    #[test]
    fn test_cta_lifecycle() {
        let mut editor = FormEditor::default();
        assert!(!editor.select_cta());
        assert!(editor.add_cta());
        assert!(!editor.add_cta());
        assert!(editor.select_cta());
        assert_eq!(editor.inspector(), InspectorView::Cta);

        assert!(editor.update_cta(&CtaPatch::text("Send")));
        assert_eq!(editor.schema().cta_button.as_ref().unwrap().text, "Send");
        assert!(editor.remove_cta());
        assert_eq!(editor.selection(), &Selection::None);
    }

    #[test]
    fn test_order_contiguous_under_random_edits() {
        // Linear congruential generator for a reproducible sequence
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |bound: usize| {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            ((seed >> 33) as usize) % bound.max(1)
        };

        let mut editor = FormEditor::default();
        for _ in 0..500 {
            let len = editor.schema().len();
            match next(5) {
                0 | 1 => {
                    editor.add_field(FieldType::ALL[next(FieldType::ALL.len())]);
                }
                2 if len > 0 => {
                    let id = editor.schema().fields[next(len)].id.clone();
                    editor.delete_field(&id);
                }
                3 if len > 0 => {
                    let id = editor.schema().fields[next(len)].id.clone();
                    editor.duplicate_field(&id);
                }
                _ => {
                    editor.reorder_field(next(len + 1), next(len + 1));
                }
            }
            assert!(editor.schema().is_consistent());
        }
    }

    #[test]
    fn test_save_creates_then_updates() {
        let adapter = MemoryAdapter::new();
        let (mut editor, _) = editor_with(&[FieldType::Text]);
        assert_eq!(editor.save_target(), SaveTarget::Create);

        let id = block_on(editor.save(&adapter)).unwrap();
        assert_eq!(editor.form_id(), Some(id.as_str()));
        assert_eq!(adapter.create_calls(), 1);

        editor.set_title("Renamed");
        block_on(editor.save(&adapter)).unwrap();
        assert_eq!(adapter.create_calls(), 1);
        assert_eq!(adapter.update_calls(), 1);
        assert_eq!(adapter.get(&id).unwrap().title, "Renamed");
    }

    #[test]
    fn test_oversized_rich_content_never_reaches_adapter() {
        let adapter = MemoryAdapter::new();
        let mut editor = FormEditor::default();
        editor.edit_rich_content("x".repeat(DEFAULT_RICH_CONTENT_LIMIT + 1), Instant::now());

        let err = block_on(editor.save(&adapter)).unwrap_err();
        assert!(matches!(err, PersistError::RichContentTooLarge { .. }));
        assert_eq!(adapter.create_calls(), 0);
        assert_eq!(adapter.update_calls(), 0);
        assert_eq!(editor.form_id(), None);
    }

    #[test]
    fn test_save_failure_keeps_document() {
        let adapter = MemoryAdapter::new();
        adapter.set_failure(Some("Database unavailable"));
        let (mut editor, _) = editor_with(&[FieldType::Email]);
        let before = editor.schema().clone();

        let err = block_on(editor.save(&adapter)).unwrap_err();
        assert_eq!(err.to_string(), "Database unavailable");
        assert_eq!(*editor.schema(), before);
        assert_eq!(editor.form_id(), None);
        assert_eq!(adapter.create_calls(), 1);
    }

    #[test]
    fn test_background_tri_state_on_save() {
        let adapter = MemoryAdapter::new();
        let mut editor = FormEditor::default();
        editor.set_background(Some("bg.png".to_string())).unwrap();
        let id = block_on(editor.save(&adapter)).unwrap();
        assert_eq!(adapter.get(&id).unwrap().background_image.as_deref(), Some("bg.png"));

        // Untouched background is left alone
        editor.set_title("Second");
        block_on(editor.save(&adapter)).unwrap();
        assert_eq!(adapter.get(&id).unwrap().background_image.as_deref(), Some("bg.png"));

        editor.set_background(None).unwrap();
        block_on(editor.save(&adapter)).unwrap();
        assert_eq!(adapter.get(&id).unwrap().background_image, None);
    }

    #[test]
    fn test_undone_background_clear_is_not_saved() {
        let adapter = MemoryAdapter::new();
        let mut editor = FormEditor::default();
        editor.set_background(Some("bg.png".to_string())).unwrap();
        let id = block_on(editor.save(&adapter)).unwrap();

        editor.set_background(None).unwrap();
        assert_eq!(editor.background_patch(), Patch::Clear);
        assert!(editor.undo());
        assert_eq!(editor.background_patch(), Patch::Keep);

        block_on(editor.save(&adapter)).unwrap();
        assert_eq!(editor.schema().background_image.as_deref(), Some("bg.png"));
        assert_eq!(adapter.get(&id).unwrap().background_image.as_deref(), Some("bg.png"));
    }

    #[test]
    fn test_undone_background_set_is_not_saved() {
        let adapter = MemoryAdapter::new();
        let mut editor = FormEditor::default();
        let id = block_on(editor.save(&adapter)).unwrap();

        editor.set_background(Some("new.png".to_string())).unwrap();
        assert!(editor.undo());
        block_on(editor.save(&adapter)).unwrap();
        assert_eq!(adapter.get(&id).unwrap().background_image, None);

        // Redo brings the change back and it is sent
        assert!(editor.redo());
        assert_eq!(editor.background_patch(), Patch::Set("new.png".to_string()));
        block_on(editor.save(&adapter)).unwrap();
        assert_eq!(adapter.get(&id).unwrap().background_image.as_deref(), Some("new.png"));
        assert_eq!(editor.background_patch(), Patch::Keep);
    }

    #[test]
    fn test_opened_form_keeps_stored_background() {
        let mut schema = FormSchema::new("Stored");
        schema.background_image = Some("stored.png".to_string());
        let mut editor = FormEditor::open("form-1", schema, EditorConfig::default());
        assert_eq!(editor.background_patch(), Patch::Keep);
        editor.set_title("Renamed");
        assert_eq!(editor.background_patch(), Patch::Keep);
    }

    #[test]
    fn test_rich_content_debounce_commits_once() {
        let mut editor = FormEditor::default();
        let start = Instant::now();
        let before = editor.history_len();

        editor.edit_rich_content("<p>H</p>", start);
        editor.edit_rich_content("<p>Hi</p>", start + Duration::from_millis(200));
        assert_eq!(editor.poll_rich_content(start + Duration::from_millis(600)).unwrap(), None);

        let patch = editor
            .poll_rich_content(start + Duration::from_millis(700))
            .unwrap()
            .unwrap();
        assert_eq!(patch.editor_content, Patch::Set("<p>Hi</p>".to_string()));
        assert_eq!(editor.history_len(), before + 1);
        assert_eq!(editor.schema().editor_content.as_deref(), Some("<p>Hi</p>"));
    }

    #[test]
    fn test_autosave_only_for_saved_forms() {
        let adapter = MemoryAdapter::new();
        let mut editor = FormEditor::default();
        let start = Instant::now();
        let later = start + Duration::from_secs(1);

        editor.edit_rich_content("draft", start);
        assert!(!block_on(editor.autosave(&adapter, later)).unwrap());
        assert_eq!(editor.schema().editor_content.as_deref(), Some("draft"));

        let id = block_on(editor.save(&adapter)).unwrap();
        editor.edit_rich_content("final", start);
        assert!(block_on(editor.autosave(&adapter, later)).unwrap());
        assert_eq!(adapter.get(&id).unwrap().editor_content.as_deref(), Some("final"));
    }

    #[test]
    fn test_unmount_flushes_and_releases() {
        let (mut editor, ids) = editor_with(&[FieldType::Text]);
        editor.mount();
        editor
            .begin_resize(&ids[0], ResizeHandle::Edge(Edge::Right), Size::new(300.0, 40.0), Point::ZERO)
            .unwrap();
        editor.edit_rich_content("pending", Instant::now());

        let patch = editor.unmount().unwrap();
        assert!(patch.is_some());
        assert_eq!(editor.schema().editor_content.as_deref(), Some("pending"));
        assert!(!editor.gestures().captures_pointer());
        assert!(!editor.is_mounted());
        assert!(!editor.rich_content_pending());
    }

    #[test]
    fn test_load_and_export() {
        let adapter = MemoryAdapter::new();
        let mut source = FormEditor::from_template(TemplateCategory::Feedback, EditorConfig::default());
        let id = block_on(source.save(&adapter)).unwrap();

        let loaded = block_on(FormEditor::load(&adapter, &id, EditorConfig::default())).unwrap();
        assert_eq!(loaded.form_id(), Some(id.as_str()));
        assert_eq!(loaded.schema(), source.schema());
        assert!(!loaded.can_undo());

        let artifact = loaded.export().unwrap();
        assert_eq!(artifact.file_name, "feedback-form.json");
    }

    #[test]
    fn test_oversized_background_rejected() {
        let config = EditorConfig {
            background_limit: 10,
            ..EditorConfig::default()
        };
        let mut editor = FormEditor::with_config(FormSchema::default(), config);
        let err = editor.set_background(Some("x".repeat(11))).unwrap_err();
        assert!(err.is_local());
        assert_eq!(editor.schema().background_image, None);
    }
}
