use async_trait::async_trait;
use formcraft_core::{AppResult, FormId};
use formcraft_domain::{Field, FormDocument, FormSummary, Submission, SubmissionDraft};

/// Input payload for creating or replacing a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFormInput {
    /// Form title. Must not be blank.
    pub title: String,
    /// Ordered form fields.
    pub fields: Vec<Field>,
}

impl From<&FormDocument> for SaveFormInput {
    fn from(document: &FormDocument) -> Self {
        Self {
            title: document.title().to_owned(),
            fields: document.fields().to_vec(),
        }
    }
}

/// Repository port for form document persistence.
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Persists a new form, assigning its identifier and timestamps.
    async fn create_form(&self, form: FormDocument) -> AppResult<FormDocument>;

    /// Replaces title and fields of an existing form.
    ///
    /// Fails with `NotFound` when no form has the given id.
    async fn update_form(&self, form_id: FormId, form: FormDocument) -> AppResult<FormDocument>;

    /// Looks up a single form by id.
    async fn find_form(&self, form_id: FormId) -> AppResult<Option<FormDocument>>;

    /// Lists form summaries, newest first.
    async fn list_forms(&self) -> AppResult<Vec<FormSummary>>;
}

/// Repository port for submission persistence.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Persists a submission, assigning its identifier and timestamp.
    async fn create_submission(&self, draft: SubmissionDraft) -> AppResult<Submission>;

    /// Lists submissions for one form, newest first.
    async fn list_submissions(&self, form_id: FormId) -> AppResult<Vec<Submission>>;
}

/// Form store as seen by an editing client.
///
/// Implemented in-process by [`crate::FormService`] and remotely over HTTP by
/// the infrastructure client.
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Creates a form and returns its new identifier.
    async fn create(&self, form: &FormDocument) -> AppResult<FormId>;

    /// Updates the form with the given id and returns the stored document.
    async fn update(&self, form_id: FormId, form: &FormDocument) -> AppResult<FormDocument>;

    /// Fetches one form.
    async fn get(&self, form_id: FormId) -> AppResult<FormDocument>;

    /// Lists form summaries, newest first.
    async fn list(&self) -> AppResult<Vec<FormSummary>>;
}
