use std::str::FromStr;

use formcraft_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::field_id::FieldId;

/// Supported form field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text input.
    Text,
    /// Numeric input.
    Number,
    /// Single boolean checkbox.
    Checkbox,
    /// Single choice among listed options.
    Select,
}

impl FieldType {
    /// Every supported kind in palette order.
    pub const ALL: [Self; 4] = [Self::Text, Self::Number, Self::Checkbox, Self::Select];

    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
        }
    }

    /// Returns the label a freshly created field of this kind starts with.
    #[must_use]
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Text | Self::Number => "Untitled",
            Self::Checkbox => "Checkbox",
            Self::Select => "Select",
        }
    }

    fn default_options(self) -> Vec<String> {
        match self {
            Self::Select => vec!["Option 1".to_owned(), "Option 2".to_owned()],
            Self::Text | Self::Number | Self::Checkbox => Vec::new(),
        }
    }
}

impl FromStr for FieldType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "checkbox" => Ok(Self::Checkbox),
            "select" => Ok(Self::Select),
            _ => Err(AppError::InvalidFieldType(format!(
                "unknown field type '{value}'"
            ))),
        }
    }
}

/// Raw attributes used to rebuild a field from storage or transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInput {
    /// Field identifier.
    pub id: FieldId,
    /// Field kind.
    pub field_type: FieldType,
    /// Display label; `None` means the label is absent.
    pub label: Option<String>,
    /// Required marker.
    pub required: bool,
    /// Placeholder text.
    pub placeholder: String,
    /// Select options.
    pub options: Vec<String>,
}

/// One input definition within a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldRecord")]
pub struct Field {
    id: FieldId,
    #[serde(rename = "type")]
    field_type: FieldType,
    label: String,
    required: bool,
    placeholder: String,
    options: Vec<String>,
}

/// Wire shape accepted when decoding a field. Unknown attributes are ignored.
#[derive(Debug, Deserialize)]
struct FieldRecord {
    id: FieldId,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    placeholder: String,
    #[serde(default)]
    options: Vec<String>,
}

impl TryFrom<FieldRecord> for Field {
    type Error = AppError;

    fn try_from(record: FieldRecord) -> Result<Self, Self::Error> {
        Self::from_input(FieldInput {
            id: record.id,
            field_type: record.field_type,
            label: record.label,
            required: record.required,
            placeholder: record.placeholder,
            options: record.options,
        })
    }
}

impl Field {
    /// Creates a field of the given kind with kind-derived defaults.
    #[must_use]
    pub fn new(field_type: FieldType, id: FieldId) -> Self {
        Self {
            id,
            field_type,
            label: field_type.default_label().to_owned(),
            required: false,
            placeholder: String::new(),
            options: field_type.default_options(),
        }
    }

    /// Creates a field from a kind name, failing for unknown kinds.
    pub fn from_type_name(type_name: &str, id: FieldId) -> AppResult<Self> {
        Ok(Self::new(FieldType::from_str(type_name)?, id))
    }

    /// Rebuilds a validated field from raw attributes.
    pub fn from_input(input: FieldInput) -> AppResult<Self> {
        let Some(label) = input.label else {
            return Err(AppError::Validation(format!(
                "field '{}' is missing a label",
                input.id
            )));
        };

        let field = Self {
            id: input.id,
            field_type: input.field_type,
            label,
            required: input.required,
            placeholder: input.placeholder,
            options: input.options,
        };
        field.validate()?;

        Ok(field)
    }

    /// Checks the option-emptiness invariant.
    pub fn validate(&self) -> AppResult<()> {
        if self.field_type != FieldType::Select && !self.options.is_empty() {
            return Err(AppError::Validation(format!(
                "field '{}' of type '{}' cannot carry options",
                self.id,
                self.field_type.as_str()
            )));
        }

        Ok(())
    }

    /// Returns a copy of this field with the patch merged in.
    pub fn patched(&self, patch: &FieldPatch) -> AppResult<Self> {
        if patch.field_type() != self.field_type {
            return Err(AppError::Validation(format!(
                "cannot apply a '{}' patch to field '{}' of type '{}'",
                patch.field_type().as_str(),
                self.id,
                self.field_type.as_str()
            )));
        }

        let mut field = self.clone();
        match patch {
            FieldPatch::Text(input) | FieldPatch::Number(input) => {
                merge(&mut field.label, &input.label);
                merge(&mut field.required, &input.required);
                merge(&mut field.placeholder, &input.placeholder);
            }
            FieldPatch::Checkbox(checkbox) => {
                merge(&mut field.label, &checkbox.label);
                merge(&mut field.required, &checkbox.required);
            }
            FieldPatch::Select(select) => {
                merge(&mut field.label, &select.label);
                merge(&mut field.required, &select.required);
                merge(&mut field.placeholder, &select.placeholder);
                merge(&mut field.options, &select.options);
            }
        }

        Ok(field)
    }

    /// Returns the label for the next appended select option.
    #[must_use]
    pub fn next_option_label(&self) -> String {
        format!("Option {}", self.options.len() + 1)
    }

    /// Returns field identifier.
    #[must_use]
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    /// Returns field kind.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns display label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns required marker.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns placeholder text.
    #[must_use]
    pub fn placeholder(&self) -> &str {
        self.placeholder.as_str()
    }

    /// Returns select options; always empty for other kinds.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

fn merge<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

/// Attribute changes for text and number fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFieldPatch {
    /// New label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New required marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// New placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Attribute changes for checkbox fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxFieldPatch {
    /// New label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New required marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Attribute changes for select fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectFieldPatch {
    /// New label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New required marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// New placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Replacement option list. Replaces the whole sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Partial update of a field, tagged by the kind it applies to.
///
/// Each variant lists only the attributes that kind may change, so options can
/// only ever be patched onto select fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldPatch {
    /// Patch for a text field.
    Text(InputFieldPatch),
    /// Patch for a number field.
    Number(InputFieldPatch),
    /// Patch for a checkbox field.
    Checkbox(CheckboxFieldPatch),
    /// Patch for a select field.
    Select(SelectFieldPatch),
}

impl FieldPatch {
    /// Returns the field kind this patch targets.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text(_) => FieldType::Text,
            Self::Number(_) => FieldType::Number,
            Self::Checkbox(_) => FieldType::Checkbox,
            Self::Select(_) => FieldType::Select,
        }
    }

    /// Builds a label-only patch for a field of the given kind.
    #[must_use]
    pub fn label(field_type: FieldType, label: impl Into<String>) -> Self {
        let label = Some(label.into());
        match field_type {
            FieldType::Text => Self::Text(InputFieldPatch {
                label,
                ..InputFieldPatch::default()
            }),
            FieldType::Number => Self::Number(InputFieldPatch {
                label,
                ..InputFieldPatch::default()
            }),
            FieldType::Checkbox => Self::Checkbox(CheckboxFieldPatch {
                label,
                ..CheckboxFieldPatch::default()
            }),
            FieldType::Select => Self::Select(SelectFieldPatch {
                label,
                ..SelectFieldPatch::default()
            }),
        }
    }

    /// Builds a required-only patch for a field of the given kind.
    #[must_use]
    pub fn required(field_type: FieldType, required: bool) -> Self {
        let required = Some(required);
        match field_type {
            FieldType::Text => Self::Text(InputFieldPatch {
                required,
                ..InputFieldPatch::default()
            }),
            FieldType::Number => Self::Number(InputFieldPatch {
                required,
                ..InputFieldPatch::default()
            }),
            FieldType::Checkbox => Self::Checkbox(CheckboxFieldPatch {
                required,
                ..CheckboxFieldPatch::default()
            }),
            FieldType::Select => Self::Select(SelectFieldPatch {
                required,
                ..SelectFieldPatch::default()
            }),
        }
    }

    /// Builds a patch replacing the options of a select field.
    #[must_use]
    pub fn options(options: Vec<String>) -> Self {
        Self::Select(SelectFieldPatch {
            options: Some(options),
            ..SelectFieldPatch::default()
        })
    }
}
