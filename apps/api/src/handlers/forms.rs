use axum::Json;
use axum::extract::{Path, State};
use formcraft_application::SaveFormInput;
use formcraft_core::{AppError, AppResult};

use super::parse_form_id;
use crate::dto::{
    CreatedResponse, FieldDto, FormResponse, FormSummaryResponse, SaveFormRequest,
    SubmissionReviewResponse, SubmitFormRequest, SubmitFormResponse,
};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;

fn save_input(payload: SaveFormRequest) -> AppResult<SaveFormInput> {
    let (Some(title), Some(fields)) = (payload.title, payload.fields) else {
        return Err(AppError::Validation("title and fields required".to_owned()));
    };

    let fields = fields
        .into_iter()
        .map(FieldDto::into_field)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(SaveFormInput { title, fields })
}

pub async fn create_form_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SaveFormRequest>,
) -> ApiResult<Json<CreatedResponse>> {
    let form = state.form_service.create_form(save_input(payload)?).await?;
    let id = form
        .id()
        .map(|id| id.to_string())
        .ok_or_else(|| AppError::Internal("created form has no id".to_owned()))?;

    Ok(Json(CreatedResponse { id, success: true }))
}

pub async fn list_forms_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<FormSummaryResponse>>> {
    let forms = state
        .form_service
        .list_forms()
        .await?
        .into_iter()
        .map(FormSummaryResponse::from)
        .collect();

    Ok(Json(forms))
}

pub async fn get_form_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> ApiResult<Json<FormResponse>> {
    let form_id = parse_form_id(&form_id)?;
    let form = state.form_service.get_form(form_id).await?;

    Ok(Json(FormResponse::from(form)))
}

pub async fn update_form_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    ApiJson(payload): ApiJson<SaveFormRequest>,
) -> ApiResult<Json<FormResponse>> {
    let input = save_input(payload)?;
    let form_id = parse_form_id(&form_id)?;
    let form = state.form_service.update_form(form_id, input).await?;

    Ok(Json(FormResponse::from(form)))
}

pub async fn submit_form_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    ApiJson(payload): ApiJson<SubmitFormRequest>,
) -> ApiResult<Json<SubmitFormResponse>> {
    let Some(answers) = payload.responses.or(payload.data) else {
        return Err(AppError::Validation("responses required".to_owned()).into());
    };
    let responses = answers.into_responses()?;
    let form_id = parse_form_id(&form_id)?;

    let submission = state.submission_service.submit(form_id, responses).await?;

    Ok(Json(SubmitFormResponse {
        id: submission.id().to_string(),
        success: true,
        submitted_at: submission
            .created_at()
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
    }))
}

pub async fn review_submissions_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> ApiResult<Json<SubmissionReviewResponse>> {
    let form_id = parse_form_id(&form_id)?;
    let review = state.submission_service.review(form_id).await?;

    Ok(Json(SubmissionReviewResponse::new(
        &review.form,
        &review.submissions,
    )))
}
