use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formcraft_application::SubmissionRepository;
use formcraft_core::{AppError, AppResult, FormId, SubmissionId};
use formcraft_domain::{FieldResponse, Submission, SubmissionDraft};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// PostgreSQL-backed submission repository.
#[derive(Clone)]
pub struct PostgresSubmissionRepository {
    pool: PgPool,
}

impl PostgresSubmissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SubmissionRow {
    id: Uuid,
    form_id: Uuid,
    responses: Value,
    created_at: DateTime<Utc>,
}

fn submission_from_row(row: SubmissionRow) -> AppResult<Submission> {
    let submission_id = SubmissionId::from_uuid(row.id);
    let responses: Vec<FieldResponse> = serde_json::from_value(row.responses).map_err(|error| {
        AppError::Format(format!(
            "persisted responses are invalid for submission '{submission_id}': {error}"
        ))
    })?;

    Ok(Submission::new(
        submission_id,
        SubmissionDraft::unchecked(FormId::from_uuid(row.form_id), responses),
        row.created_at,
    ))
}

#[async_trait]
impl SubmissionRepository for PostgresSubmissionRepository {
    async fn create_submission(&self, draft: SubmissionDraft) -> AppResult<Submission> {
        let submission_id = SubmissionId::new();
        let form_id = draft.form_id();
        let responses = serde_json::to_value(draft.responses()).map_err(|error| {
            AppError::Internal(format!(
                "failed to serialize responses for form '{form_id}': {error}"
            ))
        })?;

        let row = sqlx::query_as::<_, SubmissionRow>(
            r#"
            INSERT INTO submissions (id, form_id, responses)
            VALUES ($1, $2, $3)
            RETURNING id, form_id, responses, created_at
            "#,
        )
        .bind(submission_id.as_uuid())
        .bind(form_id.as_uuid())
        .bind(responses)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to store submission for form '{form_id}': {error}"
            ))
        })?;

        submission_from_row(row)
    }

    async fn list_submissions(&self, form_id: FormId) -> AppResult<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, form_id, responses, created_at
            FROM submissions
            WHERE form_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(form_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list submissions for form '{form_id}': {error}"
            ))
        })?;

        rows.into_iter().map(submission_from_row).collect()
    }
}
