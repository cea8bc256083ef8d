//! Partial-record edits produced by the inspector panels.
//!
//! Each patch lists only the keys the user touched. Applying a patch merges
//! those keys into a copy of the record. The editor commits the result as one
//! history entry.

use crate::patch::Patch;
use crate::schema::{
    BorderStyle, CtaButtonData, CtaStyle, FieldStyle, FieldType, FieldWidth, FormFieldData,
    GlobalStyles, Sides, TextAlign,
};
use serde::{Deserialize, Serialize};

macro_rules! merge_fields {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )+
    };
}

/// Edit to a field's properties and style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub placeholder: Patch<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub min: Patch<f64>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub max: Patch<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<FieldWidth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<FieldStylePatch>,
}

impl FieldPatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn width(width: FieldWidth) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn style(style: FieldStylePatch) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    /// Merge into `field`. Returns true if anything changed.
    ///
    /// Choice fields never end up without options: a type change into a
    /// choice type seeds the defaults, and emptying the list leaves
    /// "Option 1".
    pub fn apply(&self, field: &mut FormFieldData) -> bool {
        let before = field.clone();

        merge_fields!(field, self; label, required, accept, width);
        if let Some(field_type) = self.field_type {
            if field_type != field.field_type && field_type.is_choice() && field.options.is_empty() {
                field.options = field_type.default_options();
            }
            field.field_type = field_type;
        }
        self.placeholder.as_ref().cloned().apply_to(&mut field.placeholder);
        self.min.as_ref().cloned().apply_to(&mut field.min);
        self.max.as_ref().cloned().apply_to(&mut field.max);
        if let Some(options) = &self.options {
            field.options = options.clone();
        }
        if field.repair_options() {
            log::warn!("Field {} had no options; restored a default", field.id);
        }
        if let Some(style) = &self.style {
            style.apply(&mut field.style);
        }

        *field != before
    }
}

/// Edit to a field's style. Absent keys are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldStylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_style: Option<BorderStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Sides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Sides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
}

impl FieldStylePatch {
    pub fn apply(&self, style: &mut FieldStyle) {
        merge_fields!(style, self;
            font_family, font_size, font_weight, line_height, letter_spacing, text_align, color,
            background_color, border_width, border_style, border_color, border_radius, padding, margin,
            box_shadow, transition,
        );
    }
}

/// Edit to the call-to-action button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CtaStylePatch>,
}

impl CtaPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Merge into `cta`. Returns true if anything changed.
    pub fn apply(&self, cta: &mut CtaButtonData) -> bool {
        let before = cta.clone();
        merge_fields!(cta, self; text);
        if let Some(style) = &self.style {
            style.apply(&mut cta.style);
        }
        *cta != before
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaStylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Sides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Patch::is_keep")]
    pub hover_color: Patch<String>,
}

impl CtaStylePatch {
    pub fn apply(&self, style: &mut CtaStyle) {
        merge_fields!(style, self;
            background_color, text_color, font_size, font_weight, border_radius, padding, width,
        );
        self.hover_color.as_ref().cloned().apply_to(&mut style.hover_color);
    }
}

/// Edit to the form-wide style defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalStylesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl GlobalStylesPatch {
    /// Merge into `globals`. Returns true if anything changed.
    pub fn apply(&self, globals: &mut GlobalStyles) -> bool {
        let before = globals.clone();
        merge_fields!(globals, self;
            primary_color, secondary_color, font_family, font_size, spacing, border_radius,
            background_color, text_color,
        );
        *globals != before
    }
}
