//! Form, field and submission entities with their invariants.

#![forbid(unsafe_code)]

mod field;
mod field_id;
mod form;
mod submission;

pub use field::{
    CheckboxFieldPatch, Field, FieldInput, FieldPatch, FieldType, InputFieldPatch,
    SelectFieldPatch,
};
pub use field_id::{FieldId, FieldIdGenerator, RandomFieldIdGenerator, SequentialFieldIdGenerator};
pub use form::{DEFAULT_FORM_TITLE, FormDocument, FormSummary};
pub use submission::{
    FieldResponse, LabeledResponse, ResponseIssue, ResponseIssueKind, ResponseValue, Submission,
    SubmissionDraft, audit_responses,
};
