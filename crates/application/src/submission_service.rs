use std::sync::Arc;

use formcraft_core::{AppError, AppResult, FormId};
use formcraft_domain::{FieldResponse, FormDocument, Submission, SubmissionDraft, audit_responses};
use tracing::{info, warn};

use crate::form_ports::{FormRepository, SubmissionRepository};

/// A form together with the submissions collected for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReview {
    /// Reviewed form.
    pub form: FormDocument,
    /// Submissions, newest first.
    pub submissions: Vec<Submission>,
}

/// Application service accepting and listing respondent submissions.
///
/// Answers are validated by the respondent client. The service only checks that
/// the form exists and logs anything that would not have passed that validation.
#[derive(Clone)]
pub struct SubmissionService {
    forms: Arc<dyn FormRepository>,
    submissions: Arc<dyn SubmissionRepository>,
}

impl SubmissionService {
    /// Creates a submission service from repository implementations.
    #[must_use]
    pub fn new(
        forms: Arc<dyn FormRepository>,
        submissions: Arc<dyn SubmissionRepository>,
    ) -> Self {
        Self { forms, submissions }
    }

    /// Stores a submission for an existing form.
    pub async fn submit(
        &self,
        form_id: FormId,
        responses: Vec<FieldResponse>,
    ) -> AppResult<Submission> {
        let form = self.require_form(form_id).await?;

        for issue in audit_responses(&form, &responses) {
            warn!(
                target: "formcraft::trust_boundary",
                %form_id,
                field_id = %issue.field_id,
                "accepted submission with unvalidated answer: {issue}"
            );
        }

        let submission = self
            .submissions
            .create_submission(SubmissionDraft::unchecked(form_id, responses))
            .await?;

        info!(
            %form_id,
            submission_id = %submission.id(),
            responses = submission.responses().len(),
            "submission accepted"
        );
        Ok(submission)
    }

    /// Lists submissions for a form, newest first.
    pub async fn list_for_form(&self, form_id: FormId) -> AppResult<Vec<Submission>> {
        self.submissions.list_submissions(form_id).await
    }

    /// Returns a form with its submissions, or `NotFound` for an unknown form.
    pub async fn review(&self, form_id: FormId) -> AppResult<SubmissionReview> {
        let form = self.require_form(form_id).await?;
        let submissions = self.submissions.list_submissions(form_id).await?;
        Ok(SubmissionReview { form, submissions })
    }

    async fn require_form(&self, form_id: FormId) -> AppResult<FormDocument> {
        self.forms
            .find_form(form_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("form '{form_id}' does not exist")))
    }
}
