use std::sync::Arc;

use async_trait::async_trait;
use formcraft_core::{AppError, AppResult, FormId, NonEmptyString};
use formcraft_domain::{FormDocument, FormSummary};
use tracing::info;

use crate::form_ports::{FormRepository, FormStore, SaveFormInput};

/// Application service for form definitions.
#[derive(Clone)]
pub struct FormService {
    repository: Arc<dyn FormRepository>,
}

impl FormService {
    /// Creates a form service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn FormRepository>) -> Self {
        Self { repository }
    }

    /// Persists a new form.
    pub async fn create_form(&self, input: SaveFormInput) -> AppResult<FormDocument> {
        let document = document_from_input(input)?;
        let created = self.repository.create_form(document).await?;
        let form_id = stored_id(&created)?;

        info!(%form_id, fields = created.fields().len(), "form created");
        Ok(created)
    }

    /// Replaces title and fields of an existing form.
    pub async fn update_form(
        &self,
        form_id: FormId,
        input: SaveFormInput,
    ) -> AppResult<FormDocument> {
        let document = document_from_input(input)?.with_id(form_id);
        let updated = self.repository.update_form(form_id, document).await?;

        info!(%form_id, fields = updated.fields().len(), "form updated");
        Ok(updated)
    }

    /// Returns one form or `NotFound`.
    pub async fn get_form(&self, form_id: FormId) -> AppResult<FormDocument> {
        self.repository
            .find_form(form_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("form '{form_id}' does not exist")))
    }

    /// Lists form summaries, newest first.
    pub async fn list_forms(&self) -> AppResult<Vec<FormSummary>> {
        self.repository.list_forms().await
    }
}

fn document_from_input(input: SaveFormInput) -> AppResult<FormDocument> {
    let title = NonEmptyString::new(input.title)
        .map_err(|_| AppError::Validation("form title must not be empty".to_owned()))?;
    FormDocument::from_parts(String::from(title), input.fields)
}

fn stored_id(document: &FormDocument) -> AppResult<FormId> {
    document
        .id()
        .ok_or_else(|| AppError::Internal("form repository returned a form without id".to_owned()))
}

#[async_trait]
impl FormStore for FormService {
    async fn create(&self, form: &FormDocument) -> AppResult<FormId> {
        let created = self.create_form(SaveFormInput::from(form)).await?;
        stored_id(&created)
    }

    async fn update(&self, form_id: FormId, form: &FormDocument) -> AppResult<FormDocument> {
        self.update_form(form_id, SaveFormInput::from(form)).await
    }

    async fn get(&self, form_id: FormId) -> AppResult<FormDocument> {
        self.get_form(form_id).await
    }

    async fn list(&self) -> AppResult<Vec<FormSummary>> {
        self.list_forms().await
    }
}
