//! Form field definitions.

use super::style::FieldStyle;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Unique identifier of a field within a form.
pub type FieldId = String;

/// Label given to the option that replaces an emptied option list.
pub const REPAIR_OPTION: &str = "Option 1";

/// Number of placeholder options seeded into new choice fields.
pub const DEFAULT_OPTION_COUNT: usize = 3;

/// Generate a fresh field identifier.
pub fn new_field_id() -> FieldId {
    format!("field_{}", Uuid::new_v4().simple())
}

/// The fixed set of field types.
///
/// Unknown type strings deserialize to [`FieldType::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Tel,
    Number,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
    Time,
    File,
    Url,
}

impl FieldType {
    /// All field types in palette order.
    pub const ALL: [FieldType; 12] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Tel,
        FieldType::Number,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Date,
        FieldType::Time,
        FieldType::File,
        FieldType::Url,
    ];

    /// Wire token for this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::File => "file",
            FieldType::Url => "url",
        }
    }

    /// Parse a wire token. Returns `None` for unknown tokens.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(token))
    }

    /// Whether this type presents a list of options.
    pub fn is_choice(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }

    /// Whether numeric min/max bounds apply to this type.
    pub fn has_numeric_bounds(self) -> bool {
        matches!(self, FieldType::Number)
    }

    /// Label given to a freshly created field of this type.
    pub fn default_label(self) -> &'static str {
        match self {
            FieldType::Text => "Text Field",
            FieldType::Email => "Email Address",
            FieldType::Tel => "Phone Number",
            FieldType::Number => "Number",
            FieldType::Textarea => "Long Answer",
            FieldType::Select => "Dropdown",
            FieldType::Radio => "Multiple Choice",
            FieldType::Checkbox => "Checkboxes",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::File => "File Upload",
            FieldType::Url => "Website",
        }
    }

    /// Placeholder given to a freshly created field of this type.
    pub fn default_placeholder(self) -> Option<&'static str> {
        match self {
            FieldType::Text => Some("Enter text"),
            FieldType::Email => Some("you@example.com"),
            FieldType::Tel => Some("+1 (555) 000-0000"),
            FieldType::Number => Some("0"),
            FieldType::Textarea => Some("Type your answer here..."),
            FieldType::Url => Some("https://"),
            FieldType::Select => Some("Select an option"),
            _ => None,
        }
    }

    /// Options seeded into a freshly created field of this type.
    pub fn default_options(self) -> Vec<String> {
        if self.is_choice() {
            (1..=DEFAULT_OPTION_COUNT)
                .map(|i| format!("Option {i}"))
                .collect()
        } else {
            Vec::new()
        }
    }
}

impl From<String> for FieldType {
    fn from(token: String) -> Self {
        FieldType::parse(&token).unwrap_or_else(|| {
            log::warn!("Unknown field type '{}', falling back to text", token);
            FieldType::Text
        })
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field width as a percentage of the form container.
///
/// Serialized as a CSS token such as `"50%"`. Inbound values accept `"50%"`,
/// `"50"` or a bare number; anything unparseable becomes [`FieldWidth::FULL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWidth(f64);

impl FieldWidth {
    /// Full container width.
    pub const FULL: FieldWidth = FieldWidth(100.0);
    /// Smallest accepted width.
    pub const MIN_PERCENT: f64 = 1.0;
    /// Largest accepted width.
    pub const MAX_PERCENT: f64 = 100.0;

    /// Create a width, clamping to the accepted range.
    /// Non-finite input yields full width.
    pub fn percent(value: f64) -> Self {
        if value.is_finite() {
            FieldWidth(value.clamp(Self::MIN_PERCENT, Self::MAX_PERCENT))
        } else {
            Self::FULL
        }
    }

    /// Width as a percentage.
    pub fn as_percent(self) -> f64 {
        self.0
    }

    /// Parse a width token, e.g. `"50%"`.
    pub fn parse(token: &str) -> Option<Self> {
        let trimmed = token.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        number
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(Self::percent)
    }

    /// Convert a pixel width into a percentage of `container_width`.
    /// Returns `None` when the container has no usable width.
    pub fn from_pixels(pixels: f64, container_width: f64) -> Option<Self> {
        if !(container_width.is_finite() && container_width > 0.0 && pixels.is_finite()) {
            return None;
        }
        let percent = (pixels / container_width * 100.0).round();
        Some(Self::percent(percent))
    }

    /// CSS token, e.g. `"50%"` or `"33.5%"`.
    pub fn to_css(self) -> String {
        if self.0.fract().abs() < f64::EPSILON {
            format!("{}%", self.0 as i64)
        } else {
            format!("{:.1}%", self.0)
        }
    }
}

impl Default for FieldWidth {
    fn default() -> Self {
        Self::FULL
    }
}

impl Serialize for FieldWidth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for FieldWidth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let width = match &value {
            serde_json::Value::String(s) => FieldWidth::parse(s),
            serde_json::Value::Number(n) => n
                .as_f64()
                .filter(|v| *v > 0.0)
                .map(FieldWidth::percent),
            _ => None,
        };
        Ok(width.unwrap_or_default())
    }
}

/// A single field in the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldData {
    #[serde(default)]
    pub id: FieldId,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Ordered options; non-empty for choice types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Accepted file extensions (file fields).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accept: Vec<String>,
    #[serde(default)]
    pub style: FieldStyle,
    #[serde(default)]
    pub width: FieldWidth,
    #[serde(default)]
    pub order: usize,
}

impl FormFieldData {
    /// Create a field of the given type with type-appropriate defaults and
    /// the default style.
    pub fn new(field_type: FieldType) -> Self {
        Self::with_style(field_type, FieldStyle::default())
    }

    /// Create a field of the given type with an explicit, complete style.
    pub fn with_style(field_type: FieldType, style: FieldStyle) -> Self {
        Self {
            id: new_field_id(),
            field_type,
            label: field_type.default_label().to_string(),
            placeholder: field_type.default_placeholder().map(str::to_string),
            required: false,
            options: field_type.default_options(),
            min: None,
            max: None,
            accept: Vec::new(),
            style,
            width: FieldWidth::FULL,
            order: 0,
        }
    }

    /// Builder-style label setter.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Builder-style required setter.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Builder-style options setter.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self.repair_options();
        self
    }

    /// Ensure choice fields keep at least one option.
    /// Returns true if a repair was made.
    pub fn repair_options(&mut self) -> bool {
        if self.field_type.is_choice() && self.options.is_empty() {
            self.options.push(REPAIR_OPTION.to_string());
            return true;
        }
        false
    }

    /// Copy of this field under a new id, labelled as a copy.
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_field_id(),
            label: format!("{} (Copy)", self.label),
            ..self.clone()
        }
    }
}
