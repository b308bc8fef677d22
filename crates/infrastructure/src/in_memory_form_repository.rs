use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use formcraft_application::FormRepository;
use formcraft_core::{AppError, AppResult, FormId};
use formcraft_domain::{FormDocument, FormSummary};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StoredForms {
    next_sequence: u64,
    forms: HashMap<FormId, (u64, FormDocument)>,
}

/// In-memory form repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryFormRepository {
    state: RwLock<StoredForms>,
}

impl InMemoryFormRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn create_form(&self, form: FormDocument) -> AppResult<FormDocument> {
        let mut state = self.state.write().await;
        let form_id = FormId::new();
        if state.forms.contains_key(&form_id) {
            return Err(AppError::Conflict(format!("form '{form_id}' already exists")));
        }

        let now = Utc::now();
        let stored = form.persisted(form_id, now, now);
        state.next_sequence += 1;
        let sequence = state.next_sequence;
        state.forms.insert(form_id, (sequence, stored.clone()));
        Ok(stored)
    }

    async fn update_form(&self, form_id: FormId, form: FormDocument) -> AppResult<FormDocument> {
        let mut state = self.state.write().await;
        let Some((_, existing)) = state.forms.get_mut(&form_id) else {
            return Err(AppError::NotFound(format!("form '{form_id}' does not exist")));
        };

        let now = Utc::now();
        let created_at = existing.created_at().unwrap_or(now);
        *existing = form.persisted(form_id, created_at, now);
        Ok(existing.clone())
    }

    async fn find_form(&self, form_id: FormId) -> AppResult<Option<FormDocument>> {
        Ok(self
            .state
            .read()
            .await
            .forms
            .get(&form_id)
            .map(|(_, form)| form.clone()))
    }

    async fn list_forms(&self) -> AppResult<Vec<FormSummary>> {
        let state = self.state.read().await;
        let mut entries: Vec<(u64, FormSummary)> = state
            .forms
            .values()
            .filter_map(|(sequence, form)| form.summary().map(|summary| (*sequence, summary)))
            .collect();
        entries.sort_by(|(left_sequence, left), (right_sequence, right)| {
            right
                .created_at
                .cmp(&left.created_at)
                .then(right_sequence.cmp(left_sequence))
        });

        Ok(entries.into_iter().map(|(_, summary)| summary).collect())
    }
}

#[cfg(test)]
mod tests {
    use formcraft_application::FormRepository;
    use formcraft_core::{AppError, FormId};
    use formcraft_domain::{FieldType, FormDocument, SequentialFieldIdGenerator};

    use super::InMemoryFormRepository;

    #[tokio::test]
    async fn create_then_find_returns_stored_document() {
        let repository = InMemoryFormRepository::new();
        let (document, _) = FormDocument::new()
            .add_field(FieldType::Select, &SequentialFieldIdGenerator::default())
            .unwrap_or_else(|_| unreachable!());

        let created = repository.create_form(document.clone()).await;
        assert!(created.is_ok());
        let created = created.unwrap_or_else(|_| unreachable!());
        let form_id = created.id().unwrap_or_else(|| unreachable!());

        let found = repository.find_form(form_id).await;
        assert_eq!(found.ok().flatten(), Some(created.clone()));
        assert_eq!(created.fields(), document.fields());
    }

    #[tokio::test]
    async fn update_replaces_content_and_keeps_created_at() {
        let repository = InMemoryFormRepository::new();
        let created = repository
            .create_form(FormDocument::new())
            .await
            .unwrap_or_else(|_| unreachable!());
        let form_id = created.id().unwrap_or_else(|| unreachable!());

        let updated = repository
            .update_form(form_id, FormDocument::new().with_title("Renamed"))
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(updated.id(), Some(form_id));
        assert_eq!(updated.title(), "Renamed");
        assert_eq!(updated.created_at(), created.created_at());
    }

    #[tokio::test]
    async fn update_unknown_form_is_not_found() {
        let repository = InMemoryFormRepository::new();
        let result = repository
            .update_form(FormId::new(), FormDocument::new())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_orders_newest_first_even_with_equal_timestamps() {
        let repository = InMemoryFormRepository::new();
        for title in ["a", "b", "c", "d"] {
            let created = repository
                .create_form(FormDocument::new().with_title(title))
                .await;
            assert!(created.is_ok());
        }

        let titles: Vec<String> = repository
            .list_forms()
            .await
            .unwrap_or_else(|_| unreachable!())
            .into_iter()
            .map(|summary| summary.title)
            .collect();
        assert_eq!(titles, vec!["d", "c", "b", "a"]);
    }
}
