use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use formcraft_core::{AppError, AppResult, FormId, SubmissionId};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::field::{Field, FieldType};
use crate::field_id::FieldId;
use crate::form::FormDocument;

/// Value answered for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    /// Checkbox answer.
    Bool(bool),
    /// Numeric answer.
    Number(Number),
    /// Text, select or numeric-string answer.
    Text(String),
}

impl ResponseValue {
    /// Returns whether the value carries no answer at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
        }
    }
}

impl From<bool> for ResponseValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ResponseValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ResponseValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ResponseValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

/// One `(field id, value)` pair of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResponse {
    /// Answered field.
    pub field_id: FieldId,
    /// Answer value.
    pub value: ResponseValue,
}

/// Validated answers ready to be handed to the submission store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDraft {
    form_id: FormId,
    responses: Vec<FieldResponse>,
}

impl SubmissionDraft {
    /// Validates answers against a form and collects them in form order.
    ///
    /// Required fields must be answered, a required checkbox must be `true`, and
    /// a select answer must be one of the field options. Unanswered optional
    /// fields are omitted.
    pub fn build(
        form: &FormDocument,
        answers: &HashMap<FieldId, ResponseValue>,
    ) -> AppResult<Self> {
        let Some(form_id) = form.id() else {
            return Err(AppError::Validation(
                "form must be saved before it can accept submissions".to_owned(),
            ));
        };

        let mut problems = Vec::new();
        for field_id in answers.keys() {
            if !form.contains_field(field_id) {
                problems.push(ResponseIssue::new(
                    field_id.clone(),
                    ResponseIssueKind::UnknownField,
                ));
            }
        }

        let mut responses = Vec::with_capacity(answers.len());
        for field in form.fields() {
            let answer = answers.get(field.id()).filter(|value| !value.is_blank());
            match answer {
                None if field.is_required() => problems.push(ResponseIssue::new(
                    field.id().clone(),
                    ResponseIssueKind::MissingRequired,
                )),
                None => {}
                Some(value) => match check_value(field, value) {
                    Ok(()) => responses.push(FieldResponse {
                        field_id: field.id().clone(),
                        value: value.clone(),
                    }),
                    Err(kind) => problems.push(ResponseIssue::new(field.id().clone(), kind)),
                },
            }
        }

        if !problems.is_empty() {
            let message = problems
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AppError::Validation(message));
        }

        Ok(Self { form_id, responses })
    }

    /// Creates a draft from already-collected responses without re-validation.
    #[must_use]
    pub fn unchecked(form_id: FormId, responses: Vec<FieldResponse>) -> Self {
        Self { form_id, responses }
    }

    /// Returns the answered form.
    #[must_use]
    pub fn form_id(&self) -> FormId {
        self.form_id
    }

    /// Returns responses in form order.
    #[must_use]
    pub fn responses(&self) -> &[FieldResponse] {
        &self.responses
    }

    /// Consumes the draft and returns its responses.
    #[must_use]
    pub fn into_responses(self) -> Vec<FieldResponse> {
        self.responses
    }
}

/// One persisted respondent answer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    id: SubmissionId,
    form_id: FormId,
    responses: Vec<FieldResponse>,
    created_at: DateTime<Utc>,
}

/// A response paired with the label of the field it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledResponse {
    /// Answered field.
    pub field_id: FieldId,
    /// Current field label, or the raw field id when the field no longer exists.
    pub label: String,
    /// Answer value.
    pub value: ResponseValue,
}

impl Submission {
    /// Creates a persisted submission from a draft and store-assigned metadata.
    #[must_use]
    pub fn new(id: SubmissionId, draft: SubmissionDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            form_id: draft.form_id,
            responses: draft.responses,
            created_at,
        }
    }

    /// Returns submission identifier.
    #[must_use]
    pub fn id(&self) -> SubmissionId {
        self.id
    }

    /// Returns answered form identifier.
    #[must_use]
    pub fn form_id(&self) -> FormId {
        self.form_id
    }

    /// Returns stored responses.
    #[must_use]
    pub fn responses(&self) -> &[FieldResponse] {
        &self.responses
    }

    /// Returns creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Resolves response labels against the current form.
    ///
    /// Answers follow the form's field order; answers for fields that have
    /// since been removed are appended in stored order, labelled by field id.
    #[must_use]
    pub fn labeled_responses(&self, form: &FormDocument) -> Vec<LabeledResponse> {
        let mut labeled = Vec::with_capacity(self.responses.len());
        for field in form.fields() {
            if let Some(response) = self
                .responses
                .iter()
                .find(|response| &response.field_id == field.id())
            {
                labeled.push(LabeledResponse {
                    field_id: response.field_id.clone(),
                    label: field.label().to_owned(),
                    value: response.value.clone(),
                });
            }
        }

        for response in &self.responses {
            if !form.contains_field(&response.field_id) {
                labeled.push(LabeledResponse {
                    field_id: response.field_id.clone(),
                    label: response.field_id.to_string(),
                    value: response.value.clone(),
                });
            }
        }

        labeled
    }
}

/// Category of mismatch between stored responses and a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseIssueKind {
    /// The form has no field with this id.
    UnknownField,
    /// The same field was answered more than once.
    DuplicateResponse,
    /// A required field has no answer.
    MissingRequired,
    /// A required checkbox was answered `false`.
    RequiredCheckboxUnchecked,
    /// The answer is not one of the select options.
    OptionNotListed,
    /// The answer has the wrong value kind for the field.
    WrongValueKind {
        /// Field kind the value was checked against.
        field_type: FieldType,
        /// Kind of value received.
        received: &'static str,
    },
}

/// Mismatch found when checking responses against a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseIssue {
    /// Field the issue refers to.
    pub field_id: FieldId,
    /// Issue category.
    pub kind: ResponseIssueKind,
}

impl ResponseIssue {
    fn new(field_id: FieldId, kind: ResponseIssueKind) -> Self {
        Self { field_id, kind }
    }
}

impl Display for ResponseIssue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let field_id = &self.field_id;
        match &self.kind {
            ResponseIssueKind::UnknownField => {
                write!(formatter, "field '{field_id}' is not part of this form")
            }
            ResponseIssueKind::DuplicateResponse => {
                write!(formatter, "field '{field_id}' is answered more than once")
            }
            ResponseIssueKind::MissingRequired => {
                write!(formatter, "field '{field_id}' is required")
            }
            ResponseIssueKind::RequiredCheckboxUnchecked => {
                write!(formatter, "field '{field_id}' must be checked")
            }
            ResponseIssueKind::OptionNotListed => {
                write!(formatter, "field '{field_id}' answer is not one of its options")
            }
            ResponseIssueKind::WrongValueKind {
                field_type,
                received,
            } => write!(
                formatter,
                "field '{field_id}' of type '{}' cannot take a {received} value",
                field_type.as_str()
            ),
        }
    }
}

/// Lists every mismatch between stored responses and the form's current rules.
///
/// Used at the store boundary, which persists responses without enforcing
/// per-field rules.
#[must_use]
pub fn audit_responses(form: &FormDocument, responses: &[FieldResponse]) -> Vec<ResponseIssue> {
    let mut issues = Vec::new();
    let mut answered = HashSet::with_capacity(responses.len());

    for response in responses {
        if !answered.insert(&response.field_id) {
            issues.push(ResponseIssue::new(
                response.field_id.clone(),
                ResponseIssueKind::DuplicateResponse,
            ));
            continue;
        }

        match form.field(&response.field_id) {
            None => issues.push(ResponseIssue::new(
                response.field_id.clone(),
                ResponseIssueKind::UnknownField,
            )),
            Some(_) if response.value.is_blank() => {}
            Some(field) => {
                if let Err(kind) = check_value(field, &response.value) {
                    issues.push(ResponseIssue::new(field.id().clone(), kind));
                }
            }
        }
    }

    for field in form.fields().iter().filter(|field| field.is_required()) {
        let answered_value = responses
            .iter()
            .find(|response| &response.field_id == field.id())
            .map(|response| &response.value);
        if answered_value.is_none_or(ResponseValue::is_blank) {
            issues.push(ResponseIssue::new(
                field.id().clone(),
                ResponseIssueKind::MissingRequired,
            ));
        }
    }

    issues
}

fn check_value(field: &Field, value: &ResponseValue) -> Result<(), ResponseIssueKind> {
    let wrong_kind = || ResponseIssueKind::WrongValueKind {
        field_type: field.field_type(),
        received: value.kind(),
    };

    match (field.field_type(), value) {
        (FieldType::Text, ResponseValue::Text(_)) => Ok(()),
        (FieldType::Number, ResponseValue::Number(_)) => Ok(()),
        (FieldType::Number, ResponseValue::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(|_| ())
            .ok_or_else(wrong_kind),
        (FieldType::Checkbox, ResponseValue::Bool(checked)) => {
            if field.is_required() && !checked {
                Err(ResponseIssueKind::RequiredCheckboxUnchecked)
            } else {
                Ok(())
            }
        }
        (FieldType::Select, ResponseValue::Text(choice)) => {
            if field.options().iter().any(|option| option == choice) {
                Ok(())
            } else {
                Err(ResponseIssueKind::OptionNotListed)
            }
        }
        _ => Err(wrong_kind()),
    }
}
