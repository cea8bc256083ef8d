//! The declarative form schema.
//!
//! [`FormSchema`] is the canonical document edited by the form builder and
//! consumed by the public renderer. Structural operations here keep two
//! invariants: every field's `order` equals its position in `fields`, and
//! field ids are unique.

mod field;
mod style;

pub use field::{
    DEFAULT_OPTION_COUNT, FieldId, FieldType, FieldWidth, FormFieldData, REPAIR_OPTION,
    new_field_id,
};
pub use style::{
    BorderStyle, CtaStyle, DEFAULT_FONT_FAMILY, DEFAULT_PRIMARY_COLOR, FieldStyle, GlobalStyles,
    Sides, TextAlign,
};

use crate::cascade;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Default call-to-action label.
pub const DEFAULT_CTA_TEXT: &str = "Submit";

/// The call-to-action (submit) button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaButtonData {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_cta_text")]
    pub text: String,
    #[serde(default)]
    pub style: CtaStyle,
    #[serde(default)]
    pub order: usize,
}

fn default_cta_text() -> String {
    DEFAULT_CTA_TEXT.to_string()
}

impl CtaButtonData {
    /// Create a button with the given style.
    pub fn new(text: impl Into<String>, style: CtaStyle) -> Self {
        Self {
            id: format!("cta_{}", Uuid::new_v4().simple()),
            text: text.into(),
            style,
            order: 0,
        }
    }
}

impl Default for CtaButtonData {
    fn default() -> Self {
        Self::new(DEFAULT_CTA_TEXT, CtaStyle::default())
    }
}

/// A complete form document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Fields in display order.
    #[serde(default)]
    pub fields: Vec<FormFieldData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_styles: Option<GlobalStyles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_button: Option<CtaButtonData>,
    /// Background image reference (URL or data URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Rich content shown below the form (serialized editor blob).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_content: Option<String>,
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::new("Untitled Form")
    }
}

impl FormSchema {
    /// Create an empty form with default global styles.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            fields: Vec::new(),
            global_styles: Some(GlobalStyles::default()),
            cta_button: None,
            background_image: None,
            editor_content: None,
        }
    }

    /// Global styles, or the defaults when none are set.
    pub fn globals(&self) -> GlobalStyles {
        self.global_styles.clone().unwrap_or_default()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a field by id.
    pub fn field_index(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }

    /// Get a field by id.
    pub fn field(&self, id: &str) -> Option<&FormFieldData> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Get a mutable field by id.
    pub fn field_mut(&mut self, id: &str) -> Option<&mut FormFieldData> {
        self.fields.iter_mut().find(|f| f.id == id)
    }

    /// Rewrite every field's `order` to its position.
    pub fn renumber(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.order = i;
        }
    }

    /// Append a field. A colliding or empty id is replaced.
    /// Returns the id the field ended up with.
    pub fn push_field(&mut self, mut field: FormFieldData) -> FieldId {
        if field.id.is_empty() || self.field_index(&field.id).is_some() {
            field.id = new_field_id();
        }
        field.order = self.fields.len();
        let id = field.id.clone();
        self.fields.push(field);
        id
    }

    /// Insert a field at `index` (clamped to the end) and renumber.
    pub fn insert_field(&mut self, index: usize, mut field: FormFieldData) -> FieldId {
        if field.id.is_empty() || self.field_index(&field.id).is_some() {
            field.id = new_field_id();
        }
        let id = field.id.clone();
        let index = index.min(self.fields.len());
        self.fields.insert(index, field);
        self.renumber();
        id
    }

    /// Remove a field by id and renumber the rest.
    pub fn remove_field(&mut self, id: &str) -> Option<FormFieldData> {
        let index = self.field_index(id)?;
        let removed = self.fields.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Move the field at `from` so it ends up at position `to`.
    /// Returns false when nothing moved (same index or out of range).
    pub fn move_field(&mut self, from: usize, to: usize) -> bool {
        let len = self.fields.len();
        if from >= len || len == 0 {
            return false;
        }
        let to = to.min(len - 1);
        if from == to {
            return false;
        }
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        self.renumber();
        true
    }

    /// Insert a copy of a field directly after it.
    /// Returns the id of the copy.
    pub fn duplicate_field(&mut self, id: &str) -> Option<FieldId> {
        let index = self.field_index(id)?;
        let copy = self.fields[index].duplicate();
        Some(self.insert_field(index + 1, copy))
    }

    /// Check the order and id invariants.
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        self.fields
            .iter()
            .enumerate()
            .all(|(i, f)| f.order == i && !f.id.is_empty() && seen.insert(f.id.as_str()))
    }

    /// Repair an inbound document so the editor can operate on it.
    ///
    /// Sorts by the stored `order` (stable), renumbers, replaces empty or
    /// duplicate ids, restores options on choice fields, and back-fills
    /// global styles and the CTA id. Returns the number of repairs made.
    pub fn normalize(&mut self) -> usize {
        let mut repairs = 0;

        if !self.fields.iter().enumerate().all(|(i, f)| f.order == i) {
            self.fields.sort_by_key(|f| f.order);
            self.renumber();
            repairs += 1;
        }

        let mut seen = HashSet::new();
        for field in &mut self.fields {
            if field.id.is_empty() || !seen.insert(field.id.clone()) {
                field.id = new_field_id();
                seen.insert(field.id.clone());
                repairs += 1;
            }
            if field.repair_options() {
                repairs += 1;
            }
        }

        if self.global_styles.is_none() {
            self.global_styles = Some(GlobalStyles::default());
            repairs += 1;
        }

        if let Some(cta) = &mut self.cta_button {
            if cta.id.is_empty() {
                cta.id = CtaButtonData::default().id;
                repairs += 1;
            }
        }

        if repairs > 0 {
            log::warn!("Normalized form '{}' with {} repair(s)", self.title, repairs);
        }
        repairs
    }

    /// Parse an inbound document and normalize it.
    ///
    /// Fields that arrive without a `style` record are seeded from the
    /// document's global styles rather than the bare defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Like [`FormSchema::from_json`] for an already parsed value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let unstyled: Vec<usize> = value
            .get("fields")
            .and_then(|f| f.as_array())
            .map(|fields| {
                fields
                    .iter()
                    .enumerate()
                    .filter(|(_, f)| f.get("style").is_none_or(|s| s.is_null()))
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default();

        let mut schema: FormSchema = serde_json::from_value(value)?;
        if !unstyled.is_empty() {
            let seeded = cascade::seed_field_style(&schema.globals());
            for i in unstyled {
                if let Some(field) = schema.fields.get_mut(i) {
                    field.style = seeded.clone();
                }
            }
        }
        schema.normalize();
        Ok(schema)
    }

    /// Serialize the document to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
