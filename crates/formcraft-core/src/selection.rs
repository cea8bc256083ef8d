//! Selection and inspector routing.

use crate::schema::{FieldId, FormSchema};
use serde::{Deserialize, Serialize};

/// What is selected. At most one thing at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum Selection {
    #[default]
    None,
    Field(FieldId),
    Cta,
}

/// Tabs of the field inspector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InspectorTab {
    #[default]
    Properties,
    Styles,
}

/// Which inspector panel is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectorView<'a> {
    Hidden,
    Field { id: &'a str, tab: InspectorTab },
    Cta,
}

/// Tracks the selection and the active inspector tab.
///
/// This keeps UI state out of the document. Nothing here is recorded in
/// history.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selection: Selection,
    tab: InspectorTab,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Select a field. The inspector opens on the properties tab.
    pub fn select_field(&mut self, id: impl Into<FieldId>) {
        self.selection = Selection::Field(id.into());
        self.tab = InspectorTab::Properties;
    }

    /// Select the call-to-action button.
    pub fn select_cta(&mut self) {
        self.selection = Selection::Cta;
    }

    pub fn clear(&mut self) {
        self.selection = Selection::None;
    }

    /// Switch inspector tab. Ignored unless a field is selected.
    pub fn set_tab(&mut self, tab: InspectorTab) {
        if matches!(self.selection, Selection::Field(_)) {
            self.tab = tab;
        }
    }

    pub fn tab(&self) -> InspectorTab {
        self.tab
    }

    /// The selected field id, if a field is selected.
    pub fn selected_field(&self) -> Option<&str> {
        match &self.selection {
            Selection::Field(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn is_field_selected(&self, id: &str) -> bool {
        self.selected_field() == Some(id)
    }

    pub fn is_cta_selected(&self) -> bool {
        self.selection == Selection::Cta
    }

    /// Current inspector panel.
    pub fn inspector(&self) -> InspectorView<'_> {
        match &self.selection {
            Selection::None => InspectorView::Hidden,
            Selection::Field(id) => InspectorView::Field { id, tab: self.tab },
            Selection::Cta => InspectorView::Cta,
        }
    }

    /// Clear the selection if it points at the removed field.
    pub fn field_removed(&mut self, id: &str) -> bool {
        if self.is_field_selected(id) {
            self.clear();
            true
        } else {
            false
        }
    }

    /// Drop a selection that no longer resolves in `schema`.
    ///
    /// Needed after undo/redo, which can remove the selected field or CTA.
    pub fn reconcile(&mut self, schema: &FormSchema) {
        let stale = match &self.selection {
            Selection::None => false,
            Selection::Field(id) => schema.field(id).is_none(),
            Selection::Cta => schema.cta_button.is_none(),
        };
        if stale {
            log::debug!("Clearing stale selection {:?}", self.selection);
            self.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CtaButtonData, FieldType, FormFieldData};

    #[test]
    fn test_single_selection() {
        let mut selection = SelectionState::new();
        assert_eq!(selection.inspector(), InspectorView::Hidden);

        selection.select_field("a");
        selection.set_tab(InspectorTab::Styles);
        assert_eq!(
            selection.inspector(),
            InspectorView::Field {
                id: "a",
                tab: InspectorTab::Styles
            }
        );

        selection.select_cta();
        assert_eq!(selection.inspector(), InspectorView::Cta);
        assert_eq!(selection.selected_field(), None);
    }

    #[test]
    fn test_selecting_field_opens_properties() {
        let mut selection = SelectionState::new();
        selection.select_field("a");
        selection.set_tab(InspectorTab::Styles);
        selection.select_field("b");
        assert_eq!(selection.tab(), InspectorTab::Properties);
    }

    #[test]
    fn test_tab_ignored_without_field() {
        let mut selection = SelectionState::new();
        selection.select_cta();
        selection.set_tab(InspectorTab::Styles);
        assert_eq!(selection.tab(), InspectorTab::Properties);
    }

    #[test]
    fn test_field_removed() {
        let mut selection = SelectionState::new();
        selection.select_field("a");
        assert!(!selection.field_removed("b"));
        assert!(selection.field_removed("a"));
        assert_eq!(*selection.selection(), Selection::None);
    }

    #[test]
    fn test_reconcile() {
        let mut schema = FormSchema::new("Form");
        let id = schema.push_field(FormFieldData::new(FieldType::Text));

        let mut selection = SelectionState::new();
        selection.select_field(id.clone());
        selection.reconcile(&schema);
        assert!(selection.is_field_selected(&id));

        schema.remove_field(&id);
        selection.reconcile(&schema);
        assert_eq!(*selection.selection(), Selection::None);

        selection.select_cta();
        selection.reconcile(&schema);
        assert!(!selection.is_cta_selected());

        schema.cta_button = Some(CtaButtonData::default());
        selection.select_cta();
        selection.reconcile(&schema);
        assert!(selection.is_cta_selected());
    }

    #[test]
    fn test_selection_wire_format() {
        let json = serde_json::to_string(&Selection::Field("f1".into())).unwrap();
        assert_eq!(json, r#"{"kind":"field","id":"f1"}"#);
        let json = serde_json::to_string(&Selection::Cta).unwrap();
        assert_eq!(json, r#"{"kind":"cta"}"#);
    }
}
