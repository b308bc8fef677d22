use std::collections::BTreeMap;

use formcraft_core::AppResult;
use formcraft_domain::{
    FieldId, FieldResponse, FormDocument, LabeledResponse, ResponseValue, Submission,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::timestamp;

/// One answered field on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/field-response-dto.ts"
)]
pub struct FieldResponseDto {
    pub field_id: String,
    #[ts(type = "string | number | boolean")]
    pub value: ResponseValue,
}

/// Answers as a list of pairs or as an object keyed by field id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubmittedAnswers {
    /// `[{fieldId, value}]`.
    List(Vec<FieldResponseDto>),
    /// `{fieldId: value}`.
    Map(BTreeMap<String, ResponseValue>),
}

/// Incoming payload for `POST /submissions`.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-submission-request.ts"
)]
pub struct CreateSubmissionRequest {
    #[ts(optional)]
    pub form_id: Option<String>,
    #[ts(
        type = "Array<{ fieldId: string, value: string | number | boolean }> | Record<string, string | number | boolean> | null"
    )]
    pub responses: Option<SubmittedAnswers>,
}

/// Incoming payload for `POST /forms/{id}/submit`.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-form-request.ts"
)]
pub struct SubmitFormRequest {
    #[ts(
        type = "Array<{ fieldId: string, value: string | number | boolean }> | Record<string, string | number | boolean> | null"
    )]
    pub responses: Option<SubmittedAnswers>,
    #[ts(
        type = "Array<{ fieldId: string, value: string | number | boolean }> | Record<string, string | number | boolean> | null"
    )]
    pub data: Option<SubmittedAnswers>,
}

/// Acknowledgement for a submission sent to a form.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-form-response.ts"
)]
pub struct SubmitFormResponse {
    pub id: String,
    pub success: bool,
    pub submitted_at: String,
}

/// API representation of a stored submission.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submission-response.ts"
)]
pub struct SubmissionResponse {
    pub id: String,
    pub form_id: String,
    pub responses: Vec<FieldResponseDto>,
    pub created_at: String,
}

/// Form header shown above reviewed submissions.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reviewed-form-response.ts"
)]
pub struct ReviewedFormResponse {
    pub id: String,
    pub title: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Answer resolved against the current field label.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reviewed-answer-response.ts"
)]
pub struct ReviewedAnswerResponse {
    pub field_id: String,
    pub label: String,
    #[ts(type = "string | number | boolean")]
    pub value: ResponseValue,
}

/// Submission with labelled answers.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reviewed-submission-response.ts"
)]
pub struct ReviewedSubmissionResponse {
    pub id: String,
    pub created_at: String,
    pub answers: Vec<ReviewedAnswerResponse>,
}

/// Form plus its submissions, newest first.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submission-review-response.ts"
)]
pub struct SubmissionReviewResponse {
    pub form: ReviewedFormResponse,
    pub submissions: Vec<ReviewedSubmissionResponse>,
}

impl SubmittedAnswers {
    /// Converts the answers into domain responses.
    pub fn into_responses(self) -> AppResult<Vec<FieldResponse>> {
        match self {
            Self::List(responses) => responses
                .into_iter()
                .map(|response| {
                    Ok(FieldResponse {
                        field_id: FieldId::new(response.field_id)?,
                        value: response.value,
                    })
                })
                .collect(),
            Self::Map(responses) => responses
                .into_iter()
                .map(|(field_id, value)| {
                    Ok(FieldResponse {
                        field_id: FieldId::new(field_id)?,
                        value,
                    })
                })
                .collect(),
        }
    }
}

impl From<&FieldResponse> for FieldResponseDto {
    fn from(response: &FieldResponse) -> Self {
        Self {
            field_id: response.field_id.as_str().to_owned(),
            value: response.value.clone(),
        }
    }
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        Self {
            id: submission.id().to_string(),
            form_id: submission.form_id().to_string(),
            responses: submission
                .responses()
                .iter()
                .map(FieldResponseDto::from)
                .collect(),
            created_at: timestamp(submission.created_at()),
        }
    }
}

impl From<LabeledResponse> for ReviewedAnswerResponse {
    fn from(response: LabeledResponse) -> Self {
        Self {
            field_id: response.field_id.as_str().to_owned(),
            label: response.label,
            value: response.value,
        }
    }
}

impl SubmissionReviewResponse {
    /// Builds the review payload, resolving labels against the current form.
    #[must_use]
    pub fn new(form: &FormDocument, submissions: &[Submission]) -> Self {
        Self {
            form: ReviewedFormResponse {
                id: form.id().map(|id| id.to_string()).unwrap_or_default(),
                title: form.title().to_owned(),
                created_at: form.created_at().map(timestamp),
                updated_at: form.updated_at().map(timestamp),
            },
            submissions: submissions
                .iter()
                .map(|submission| ReviewedSubmissionResponse {
                    id: submission.id().to_string(),
                    created_at: timestamp(submission.created_at()),
                    answers: submission
                        .labeled_responses(form)
                        .into_iter()
                        .map(ReviewedAnswerResponse::from)
                        .collect(),
                })
                .collect(),
        }
    }
}
