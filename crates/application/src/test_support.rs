use async_trait::async_trait;
use chrono::Utc;
use formcraft_core::{AppError, AppResult, FormId, SubmissionId};
use formcraft_domain::{FormDocument, FormSummary, Submission, SubmissionDraft};
use tokio::sync::Mutex;

use crate::form_ports::{FormRepository, SubmissionRepository};

#[derive(Default)]
pub(crate) struct FakeFormRepository {
    forms: Mutex<Vec<FormDocument>>,
}

#[async_trait]
impl FormRepository for FakeFormRepository {
    async fn create_form(&self, form: FormDocument) -> AppResult<FormDocument> {
        let now = Utc::now();
        let stored = form.persisted(FormId::new(), now, now);
        self.forms.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn update_form(&self, form_id: FormId, form: FormDocument) -> AppResult<FormDocument> {
        let mut forms = self.forms.lock().await;
        let Some(existing) = forms.iter_mut().find(|stored| stored.id() == Some(form_id)) else {
            return Err(AppError::NotFound(format!("form '{form_id}' does not exist")));
        };

        let now = Utc::now();
        let created_at = existing.created_at().unwrap_or(now);
        *existing = form.persisted(form_id, created_at, now);
        Ok(existing.clone())
    }

    async fn find_form(&self, form_id: FormId) -> AppResult<Option<FormDocument>> {
        Ok(self
            .forms
            .lock()
            .await
            .iter()
            .find(|stored| stored.id() == Some(form_id))
            .cloned())
    }

    async fn list_forms(&self) -> AppResult<Vec<FormSummary>> {
        Ok(self
            .forms
            .lock()
            .await
            .iter()
            .rev()
            .filter_map(FormDocument::summary)
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeSubmissionRepository {
    submissions: Mutex<Vec<Submission>>,
}

#[async_trait]
impl SubmissionRepository for FakeSubmissionRepository {
    async fn create_submission(&self, draft: SubmissionDraft) -> AppResult<Submission> {
        let submission = Submission::new(SubmissionId::new(), draft, Utc::now());
        self.submissions.lock().await.push(submission.clone());
        Ok(submission)
    }

    async fn list_submissions(&self, form_id: FormId) -> AppResult<Vec<Submission>> {
        Ok(self
            .submissions
            .lock()
            .await
            .iter()
            .rev()
            .filter(|submission| submission.form_id() == form_id)
            .cloned()
            .collect())
    }
}
