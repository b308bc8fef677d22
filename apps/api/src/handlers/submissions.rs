use axum::Json;
use axum::extract::{Path, State};
use formcraft_core::AppError;

use super::parse_form_id;
use crate::dto::{CreateSubmissionRequest, CreatedResponse, SubmissionResponse};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn create_submission_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateSubmissionRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    let (Some(form_id), Some(answers)) = (payload.form_id, payload.responses) else {
        return Err(AppError::Validation("formId and responses required".to_owned()).into());
    };
    let responses = answers.into_responses()?;
    let form_id = parse_form_id(&form_id)?;

    let submission = state.submission_service.submit(form_id, responses).await?;

    Ok(Json(CreatedResponse {
        id: submission.id().to_string(),
        success: true,
    }))
}

pub async fn list_submissions_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> ApiResult<Json<Vec<SubmissionResponse>>> {
    let form_id = parse_form_id(&form_id)?;
    let submissions = state
        .submission_service
        .list_for_form(form_id)
        .await?
        .into_iter()
        .map(SubmissionResponse::from)
        .collect();

    Ok(Json(submissions))
}
