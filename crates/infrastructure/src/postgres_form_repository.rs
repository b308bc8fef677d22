use async_trait::async_trait;
use chrono::{DateTime, Utc};
use formcraft_application::FormRepository;
use formcraft_core::{AppError, AppResult, FormId};
use formcraft_domain::{Field, FormDocument, FormSummary};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;


/// PostgreSQL-backed form repository.
#[derive(Clone)]
pub struct PostgresFormRepository {
    pool: PgPool,
}

impl PostgresFormRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct FormRow {
    id: Uuid,
    title: String,
    fields: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct FormSummaryRow {
    id: Uuid,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn fields_to_value(form: &FormDocument) -> AppResult<Value> {
    serde_json::to_value(form.fields()).map_err(|error| {
        AppError::Internal(format!(
            "failed to serialize fields for form '{}': {error}",
            form.title()
        ))
    })
}

fn form_from_row(row: FormRow) -> AppResult<FormDocument> {
    let form_id = FormId::from_uuid(row.id);
    let fields: Vec<Field> = serde_json::from_value(row.fields).map_err(|error| {
        AppError::Format(format!("persisted fields are invalid for form '{form_id}': {error}"))
    })?;
    let document = FormDocument::from_parts(row.title, fields).map_err(|error| {
        AppError::Format(format!("persisted form '{form_id}' is inconsistent: {error}"))
    })?;

    Ok(document.persisted(form_id, row.created_at, row.updated_at))
}

#[async_trait]
impl FormRepository for PostgresFormRepository {
    async fn create_form(&self, form: FormDocument) -> AppResult<FormDocument> {
        let form_id = FormId::new();
        let fields = fields_to_value(&form)?;

        let row = sqlx::query_as::<_, FormRow>(
            r#"
            INSERT INTO forms (id, title, fields)
            VALUES ($1, $2, $3)
            RETURNING id, title, fields, created_at, updated_at
            "#,
        )
        .bind(form_id.as_uuid())
        .bind(form.title())
        .bind(fields)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to create form '{}': {error}", form.title()))
        })?;

        form_from_row(row)
    }

    async fn update_form(&self, form_id: FormId, form: FormDocument) -> AppResult<FormDocument> {
        let fields = fields_to_value(&form)?;

        let row = sqlx::query_as::<_, FormRow>(
            r#"
            UPDATE forms
            SET title = $2, fields = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, title, fields, created_at, updated_at
            "#,
        )
        .bind(form_id.as_uuid())
        .bind(form.title())
        .bind(fields)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update form '{form_id}': {error}")))?
        .ok_or_else(|| AppError::NotFound(format!("form '{form_id}' does not exist")))?;

        form_from_row(row)
    }

    async fn find_form(&self, form_id: FormId) -> AppResult<Option<FormDocument>> {
        let row = sqlx::query_as::<_, FormRow>(
            r#"
            SELECT id, title, fields, created_at, updated_at
            FROM forms
            WHERE id = $1
            "#,
        )
        .bind(form_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load form '{form_id}': {error}")))?;

        row.map(form_from_row).transpose()
    }

    async fn list_forms(&self) -> AppResult<Vec<FormSummary>> {
        let rows = sqlx::query_as::<_, FormSummaryRow>(
            r#"
            SELECT id, title, created_at, updated_at
            FROM forms
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list forms: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| FormSummary {
                id: FormId::from_uuid(row.id),
                title: row.title,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }
}
