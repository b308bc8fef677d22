use async_trait::async_trait;
use chrono::Utc;
use formcraft_application::SubmissionRepository;
use formcraft_core::{AppResult, FormId, SubmissionId};
use formcraft_domain::{Submission, SubmissionDraft};
use tokio::sync::RwLock;

/// In-memory submission repository implementation.
///
/// Submissions are kept in insertion order, which is also timestamp order.
#[derive(Debug, Default)]
pub struct InMemorySubmissionRepository {
    submissions: RwLock<Vec<Submission>>,
}

impl InMemorySubmissionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn create_submission(&self, draft: SubmissionDraft) -> AppResult<Submission> {
        let mut submissions = self.submissions.write().await;
        let created_at = submissions
            .last()
            .map_or_else(Utc::now, |last| last.created_at().max(Utc::now()));
        let submission = Submission::new(SubmissionId::new(), draft, created_at);
        submissions.push(submission.clone());
        Ok(submission)
    }

    async fn list_submissions(&self, form_id: FormId) -> AppResult<Vec<Submission>> {
        Ok(self
            .submissions
            .read()
            .await
            .iter()
            .rev()
            .filter(|submission| submission.form_id() == form_id)
            .cloned()
            .collect())
    }
}
