//! Global style cascade.
//!
//! Global styles are copied into new fields and the CTA when they are created.
//! They are not a live binding: changing [`GlobalStyles`] leaves existing
//! fields untouched until [`apply_global_styles`] is called explicitly.

use crate::schema::{CtaButtonData, CtaStyle, FieldStyle, FormFieldData, GlobalStyles};

/// Complete field style for a new field under the given globals.
pub fn seed_field_style(globals: &GlobalStyles) -> FieldStyle {
    let mut style = FieldStyle::default();
    overlay_field_style(globals, &mut style);
    style
}

/// Complete CTA style for a new button under the given globals.
pub fn seed_cta_style(globals: &GlobalStyles) -> CtaStyle {
    let mut style = CtaStyle::default();
    overlay_cta_style(globals, &mut style);
    style
}

/// Return `fields` with the globally governed properties replaced.
///
/// Only font family, font size, text color, border radius and the spacing
/// below each field are overwritten. Every other per-field choice survives.
pub fn apply_global_styles(globals: &GlobalStyles, fields: &[FormFieldData]) -> Vec<FormFieldData> {
    fields
        .iter()
        .map(|field| {
            let mut field = field.clone();
            overlay_field_style(globals, &mut field.style);
            field
        })
        .collect()
}

/// Return `cta` with the globally governed properties replaced.
pub fn apply_global_styles_to_cta(globals: &GlobalStyles, cta: &CtaButtonData) -> CtaButtonData {
    let mut cta = cta.clone();
    overlay_cta_style(globals, &mut cta.style);
    cta
}

fn overlay_field_style(globals: &GlobalStyles, style: &mut FieldStyle) {
    style.font_family = globals.font_family.clone();
    style.font_size = globals.font_size.clone();
    style.color = globals.text_color.clone();
    style.border_radius = globals.border_radius.clone();
    style.margin.bottom = globals.spacing.clone();
}

fn overlay_cta_style(globals: &GlobalStyles, style: &mut CtaStyle) {
    style.background_color = globals.primary_color.clone();
    style.font_size = globals.font_size.clone();
    style.border_radius = globals.border_radius.clone();
}
