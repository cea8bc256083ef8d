//! Field palette and starter templates.

use crate::cascade::{seed_cta_style, seed_field_style};
use crate::schema::{CtaButtonData, FieldType, FormFieldData, FormSchema, GlobalStyles};
use serde::{Deserialize, Serialize};

/// Palette grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteCategory {
    Basic,
    Choice,
    DateTime,
    Advanced,
}

impl PaletteCategory {
    pub const ALL: [PaletteCategory; 4] = [
        PaletteCategory::Basic,
        PaletteCategory::Choice,
        PaletteCategory::DateTime,
        PaletteCategory::Advanced,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PaletteCategory::Basic => "Basic",
            PaletteCategory::Choice => "Choice",
            PaletteCategory::DateTime => "Date & Time",
            PaletteCategory::Advanced => "Advanced",
        }
    }
}

/// A draggable palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteItem {
    pub field_type: FieldType,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: PaletteCategory,
}

const fn item(
    field_type: FieldType,
    label: &'static str,
    description: &'static str,
    icon: &'static str,
    category: PaletteCategory,
) -> PaletteItem {
    PaletteItem {
        field_type,
        label,
        description,
        icon,
        category,
    }
}

/// Palette entries in display order, one per field type.
pub const PALETTE: [PaletteItem; 12] = [
    item(FieldType::Text, "Short Text", "Single line text input", "type", PaletteCategory::Basic),
    item(FieldType::Email, "Email", "Email address with validation", "mail", PaletteCategory::Basic),
    item(FieldType::Tel, "Phone", "Telephone number", "phone", PaletteCategory::Basic),
    item(FieldType::Number, "Number", "Numeric input with optional bounds", "hash", PaletteCategory::Basic),
    item(FieldType::Textarea, "Long Text", "Multi-line text area", "align-left", PaletteCategory::Basic),
    item(FieldType::Select, "Dropdown", "Pick one option from a list", "chevron-down", PaletteCategory::Choice),
    item(FieldType::Radio, "Multiple Choice", "Pick one option", "circle-dot", PaletteCategory::Choice),
    item(FieldType::Checkbox, "Checkboxes", "Pick any number of options", "check-square", PaletteCategory::Choice),
    item(FieldType::Date, "Date", "Calendar date picker", "calendar", PaletteCategory::DateTime),
    item(FieldType::Time, "Time", "Time of day picker", "clock", PaletteCategory::DateTime),
    item(FieldType::File, "File Upload", "Attach documents or images", "upload", PaletteCategory::Advanced),
    item(FieldType::Url, "Website", "Web address", "link", PaletteCategory::Advanced),
];

/// Palette entries belonging to `category`.
pub fn palette_items(category: PaletteCategory) -> impl Iterator<Item = &'static PaletteItem> {
    PALETTE.iter().filter(move |item| item.category == category)
}

/// The palette entry for a field type.
pub fn palette_item(field_type: FieldType) -> Option<&'static PaletteItem> {
    PALETTE.iter().find(|item| item.field_type == field_type)
}

/// Starter form categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Application,
    Registration,
    Feedback,
    Admission,
    Survey,
    Consent,
    Order,
    Complaint,
    Request,
    Evaluation,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 10] = [
        TemplateCategory::Application,
        TemplateCategory::Registration,
        TemplateCategory::Feedback,
        TemplateCategory::Admission,
        TemplateCategory::Survey,
        TemplateCategory::Consent,
        TemplateCategory::Order,
        TemplateCategory::Complaint,
        TemplateCategory::Request,
        TemplateCategory::Evaluation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateCategory::Application => "application",
            TemplateCategory::Registration => "registration",
            TemplateCategory::Feedback => "feedback",
            TemplateCategory::Admission => "admission",
            TemplateCategory::Survey => "survey",
            TemplateCategory::Consent => "consent",
            TemplateCategory::Order => "order",
            TemplateCategory::Complaint => "complaint",
            TemplateCategory::Request => "request",
            TemplateCategory::Evaluation => "evaluation",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(token.trim()))
    }

    pub fn title(self) -> &'static str {
        match self {
            TemplateCategory::Application => "Application Form",
            TemplateCategory::Registration => "Registration Form",
            TemplateCategory::Feedback => "Feedback Form",
            TemplateCategory::Admission => "Admission Form",
            TemplateCategory::Survey => "Survey",
            TemplateCategory::Consent => "Consent Form",
            TemplateCategory::Order => "Order Form",
            TemplateCategory::Complaint => "Complaint Form",
            TemplateCategory::Request => "Request Form",
            TemplateCategory::Evaluation => "Evaluation Form",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TemplateCategory::Application => "Job, membership or program applications",
            TemplateCategory::Registration => "Event registration, course enrollment or sign-ups",
            TemplateCategory::Feedback => "Opinions, reviews and suggestions",
            TemplateCategory::Admission => "School, college or course admissions",
            TemplateCategory::Survey => "Market research, polls and studies",
            TemplateCategory::Consent => "Legal consent, agreements and permissions",
            TemplateCategory::Order => "Product orders, bookings and purchase requests",
            TemplateCategory::Complaint => "Customer complaints and issue reports",
            TemplateCategory::Request => "Service requests and general inquiries",
            TemplateCategory::Evaluation => "Performance reviews and assessments",
        }
    }

    pub fn cta_text(self) -> &'static str {
        match self {
            TemplateCategory::Application | TemplateCategory::Admission => "Submit Application",
            TemplateCategory::Registration => "Register",
            TemplateCategory::Feedback | TemplateCategory::Evaluation => "Submit Feedback",
            TemplateCategory::Consent => "I Agree",
            TemplateCategory::Order => "Place Order",
            TemplateCategory::Complaint => "Submit Complaint",
            TemplateCategory::Request => "Send Request",
            TemplateCategory::Survey => "Submit",
        }
    }

    fn fields(self) -> &'static [FieldSpec] {
        use FieldType::*;
        match self {
            TemplateCategory::Application => &[
                (Text, "Full Name", true, ""),
                (Email, "Email Address", true, ""),
                (Tel, "Phone Number", true, ""),
                (Select, "Position Applied For", true, "Full-time|Part-time|Internship"),
                (Textarea, "Relevant Experience", false, ""),
                (File, "Resume", true, ""),
            ],
            TemplateCategory::Registration => &[
                (Text, "Full Name", true, ""),
                (Email, "Email Address", true, ""),
                (Tel, "Phone Number", false, ""),
                (Radio, "Ticket Type", true, "Standard|VIP|Student"),
                (Text, "Emergency Contact", false, ""),
                (Textarea, "Dietary Requirements", false, ""),
            ],
            TemplateCategory::Feedback => &[
                (Text, "Name", false, ""),
                (Email, "Email", false, ""),
                (Radio, "Overall Satisfaction", true, "Poor|Fair|Good|Excellent"),
                (Number, "How likely are you to recommend us? (0-10)", false, ""),
                (Textarea, "Comments", false, ""),
            ],
            TemplateCategory::Admission => &[
                (Text, "Student Name", true, ""),
                (Date, "Date of Birth", true, ""),
                (Email, "Email Address", true, ""),
                (Text, "Guardian Name", true, ""),
                (Tel, "Guardian Phone", true, ""),
                (Text, "Previous School", false, ""),
                (File, "Transcripts", true, ""),
                (Textarea, "Statement of Purpose", false, ""),
            ],
            TemplateCategory::Survey => &[
                (Select, "Age Group", false, "Under 18|18-34|35-54|55+"),
                (Text, "Location", false, ""),
                (Radio, "How often do you use our product?", true, "Daily|Weekly|Monthly|Rarely"),
                (Checkbox, "Which features do you use?", false, "Search|Reports|Sharing"),
                (Textarea, "What would you improve?", false, ""),
            ],
            TemplateCategory::Consent => &[
                (Text, "Participant Name", true, ""),
                (Email, "Email Address", true, ""),
                (Checkbox, "Consent", true, "I have read and agree to the terms"),
                (Text, "Signature (type your full name)", true, ""),
                (Date, "Date", true, ""),
            ],
            TemplateCategory::Order => &[
                (Text, "Customer Name", true, ""),
                (Email, "Email Address", true, ""),
                (Select, "Product", true, "Product A|Product B|Product C"),
                (Number, "Quantity", true, ""),
                (Textarea, "Shipping Address", true, ""),
                (Radio, "Payment Method", true, "Card|Bank Transfer|Cash on Delivery"),
                (Textarea, "Special Instructions", false, ""),
            ],
            TemplateCategory::Complaint => &[
                (Text, "Your Name", true, ""),
                (Email, "Email Address", true, ""),
                (Select, "Complaint Category", true, "Product|Service|Billing|Other"),
                (Date, "Date of Incident", false, ""),
                (Textarea, "Description", true, ""),
                (File, "Supporting Evidence", false, ""),
                (Radio, "Severity", false, "Low|Medium|High"),
                (Textarea, "Desired Resolution", false, ""),
            ],
            TemplateCategory::Request => &[
                (Text, "Your Name", true, ""),
                (Email, "Email Address", true, ""),
                (Select, "Request Type", true, "Service|Information|Support"),
                (Radio, "Urgency", false, "Low|Normal|Urgent"),
                (Textarea, "Details", true, ""),
                (Radio, "Preferred Contact Method", false, "Email|Phone"),
            ],
            TemplateCategory::Evaluation => &[
                (Text, "Subject of Evaluation", true, ""),
                (Text, "Evaluator Name", true, ""),
                (Radio, "Quality of Work", true, "1|2|3|4|5"),
                (Radio, "Communication", true, "1|2|3|4|5"),
                (Textarea, "Strengths", false, ""),
                (Textarea, "Areas for Improvement", false, ""),
                (Number, "Overall Score", false, ""),
            ],
        }
    }
}

/// Field type, label, required, options separated by `|`.
type FieldSpec = (FieldType, &'static str, bool, &'static str);

/// Build a fully materialized starter form.
///
/// Every field carries a complete style seeded from `globals`, and the CTA is
/// styled the same way.
pub fn template(category: TemplateCategory, globals: &GlobalStyles) -> FormSchema {
    let mut schema = FormSchema::new(category.title());
    schema.description = category.description().to_string();
    schema.global_styles = Some(globals.clone());

    let style = seed_field_style(globals);
    for &(field_type, label, required, options) in category.fields() {
        let mut field = FormFieldData::with_style(field_type, style.clone())
            .labeled(label)
            .required(required);
        if !options.is_empty() {
            field = field.with_options(options.split('|'));
        }
        schema.push_field(field);
    }

    schema.cta_button = Some(CtaButtonData::new(category.cta_text(), seed_cta_style(globals)));
    schema
}
