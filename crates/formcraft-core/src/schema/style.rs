//! Style records for fields, the call-to-action button, and the form as a whole.
//!
//! Values are CSS tokens (`"16px"`, `"#1f2937"`, `"none"`) because the public
//! renderer consumes them verbatim. Every record materializes a complete set of
//! defaults so partially specified inbound styles are back-filled on load.

use serde::{Deserialize, Serialize};

/// Four-sided spacing (padding or margin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sides {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl Sides {
    /// The same value on all four sides.
    pub fn uniform(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            top: value.clone(),
            right: value.clone(),
            bottom: value.clone(),
            left: value,
        }
    }

    /// Vertical and horizontal values, like the two-value CSS shorthand.
    pub fn symmetric(vertical: impl Into<String>, horizontal: impl Into<String>) -> Self {
        let vertical = vertical.into();
        let horizontal = horizontal.into();
        Self {
            top: vertical.clone(),
            right: horizontal.clone(),
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Render as a CSS shorthand (`top right bottom left`).
    pub fn to_css(&self) -> String {
        format!("{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl Default for Sides {
    fn default() -> Self {
        Self::uniform("0px")
    }
}

/// Horizontal text alignment.
///
/// Unknown tokens deserialize to [`TextAlign::Left`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

impl From<String> for TextAlign {
    fn from(token: String) -> Self {
        TextAlign::parse(&token).unwrap_or_else(|| {
            log::warn!("Unknown text alignment '{}', falling back to left", token);
            TextAlign::default()
        })
    }
}

/// Border line style.
///
/// Unknown tokens deserialize to [`BorderStyle::Solid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum BorderStyle {
    None,
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
}

impl BorderStyle {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "none" => Some(BorderStyle::None),
            "solid" => Some(BorderStyle::Solid),
            "dashed" => Some(BorderStyle::Dashed),
            "dotted" => Some(BorderStyle::Dotted),
            "double" => Some(BorderStyle::Double),
            _ => None,
        }
    }

    /// Cycle to the next border style.
    pub fn next(self) -> Self {
        match self {
            BorderStyle::None => BorderStyle::Solid,
            BorderStyle::Solid => BorderStyle::Dashed,
            BorderStyle::Dashed => BorderStyle::Dotted,
            BorderStyle::Dotted => BorderStyle::Double,
            BorderStyle::Double => BorderStyle::None,
        }
    }
}

impl From<String> for BorderStyle {
    fn from(token: String) -> Self {
        BorderStyle::parse(&token).unwrap_or_else(|| {
            log::warn!("Unknown border style '{}', falling back to solid", token);
            BorderStyle::default()
        })
    }
}

/// Default font stack for new forms.
pub const DEFAULT_FONT_FAMILY: &str = "Inter, system-ui, sans-serif";
/// Default brand color for new forms.
pub const DEFAULT_PRIMARY_COLOR: &str = "#3b82f6";

/// Complete per-field style.
///
/// Grouped as typography, box, and effects. The container-level
/// `#[serde(default)]` back-fills any key missing from inbound JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldStyle {
    // Typography
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub line_height: String,
    pub letter_spacing: String,
    pub text_align: TextAlign,
    pub color: String,

    // Box
    pub background_color: String,
    pub border_width: String,
    pub border_style: BorderStyle,
    pub border_color: String,
    pub border_radius: String,
    pub padding: Sides,
    pub margin: Sides,

    // Effects
    pub box_shadow: String,
    pub transition: String,
}

impl Default for FieldStyle {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: "16px".to_string(),
            font_weight: "400".to_string(),
            line_height: "1.5".to_string(),
            letter_spacing: "normal".to_string(),
            text_align: TextAlign::Left,
            color: "#1f2937".to_string(),
            background_color: "#ffffff".to_string(),
            border_width: "1px".to_string(),
            border_style: BorderStyle::Solid,
            border_color: "#d1d5db".to_string(),
            border_radius: "8px".to_string(),
            padding: Sides::symmetric("10px", "12px"),
            margin: Sides::symmetric("0px", "0px"),
            box_shadow: "none".to_string(),
            transition: "all 0.2s ease".to_string(),
        }
    }
}

/// Form-wide style defaults.
///
/// These seed new fields and the CTA at creation time only. Existing fields
/// keep their own values until an explicit "apply to all".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalStyles {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub font_size: String,
    pub spacing: String,
    pub border_radius: String,
    pub background_color: String,
    pub text_color: String,
}

impl Default for GlobalStyles {
    fn default() -> Self {
        Self {
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: "#64748b".to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: "16px".to_string(),
            spacing: "16px".to_string(),
            border_radius: "8px".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#1f2937".to_string(),
        }
    }
}

/// Style of the call-to-action button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaStyle {
    pub background_color: String,
    pub text_color: String,
    pub font_size: String,
    pub font_weight: String,
    pub border_radius: String,
    pub padding: Sides,
    /// Width token: `"auto"` or a percentage such as `"100%"`.
    pub width: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_color: Option<String>,
}

impl Default for CtaStyle {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_PRIMARY_COLOR.to_string(),
            text_color: "#ffffff".to_string(),
            font_size: "16px".to_string(),
            font_weight: "600".to_string(),
            border_radius: "8px".to_string(),
            padding: Sides::symmetric("12px", "24px"),
            width: "auto".to_string(),
            hover_color: None,
        }
    }
}
