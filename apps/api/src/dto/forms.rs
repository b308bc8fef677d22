use formcraft_core::AppResult;
use formcraft_domain::{Field, FieldId, FieldInput, FieldType, FormDocument, FormSummary};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::timestamp;

/// Wire representation of one form field.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/field-dto.ts"
)]
pub struct FieldDto {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[ts(optional)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Incoming payload for form create and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-form-request.ts"
)]
pub struct SaveFormRequest {
    #[ts(optional)]
    pub title: Option<String>,
    #[ts(optional)]
    pub fields: Option<Vec<FieldDto>>,
}

/// API representation of a stored form.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/form-response.ts"
)]
pub struct FormResponse {
    pub id: Option<String>,
    pub title: String,
    pub fields: Vec<FieldDto>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// API representation of a form listing entry.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/form-summary-response.ts"
)]
pub struct FormSummaryResponse {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

impl FieldDto {
    /// Converts the payload into a validated domain field.
    pub fn into_field(self) -> AppResult<Field> {
        Field::from_input(FieldInput {
            id: FieldId::new(self.id)?,
            field_type: self.field_type.parse::<FieldType>()?,
            label: self.label,
            required: self.required,
            placeholder: self.placeholder,
            options: self.options,
        })
    }
}

impl From<&Field> for FieldDto {
    fn from(field: &Field) -> Self {
        Self {
            id: field.id().as_str().to_owned(),
            field_type: field.field_type().as_str().to_owned(),
            label: Some(field.label().to_owned()),
            required: field.is_required(),
            placeholder: field.placeholder().to_owned(),
            options: field.options().to_vec(),
        }
    }
}

impl From<FormDocument> for FormResponse {
    fn from(form: FormDocument) -> Self {
        Self {
            id: form.id().map(|id| id.to_string()),
            title: form.title().to_owned(),
            fields: form.fields().iter().map(FieldDto::from).collect(),
            created_at: form.created_at().map(timestamp),
            updated_at: form.updated_at().map(timestamp),
        }
    }
}

impl From<FormSummary> for FormSummaryResponse {
    fn from(summary: FormSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            title: summary.title,
            created_at: timestamp(summary.created_at),
            updated_at: timestamp(summary.updated_at),
        }
    }
}
