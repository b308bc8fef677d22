use async_trait::async_trait;
use formcraft_application::FormStore;
use formcraft_core::{AppError, AppResult, FormId, SubmissionId};
use formcraft_domain::{FormDocument, FormSummary, Submission, SubmissionDraft};
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

/// Form store client for the form-builder HTTP API.
#[derive(Clone)]
pub struct HttpFormStore {
    http_client: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse<T> {
    id: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpFormStore {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(http_client: reqwest::Client, base_url: &str) -> AppResult<Self> {
        let mut base_url = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid form store url '{base_url}': {error}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "form store url '{base_url}' cannot carry a path"
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Sends a validated submission and returns its new id.
    pub async fn submit(&self, draft: &SubmissionDraft) -> AppResult<SubmissionId> {
        let body = json!({
            "formId": draft.form_id(),
            "responses": draft.responses(),
        });
        let request = self.http_client.post(self.endpoint("submissions")?).json(&body);
        let created: CreatedResponse<SubmissionId> = self.send_json(request).await?;

        debug!(submission_id = %created.id, form_id = %draft.form_id(), "submission sent");
        Ok(created.id)
    }

    /// Lists submissions stored for a form, newest first.
    pub async fn list_submissions(&self, form_id: FormId) -> AppResult<Vec<Submission>> {
        let request = self
            .http_client
            .get(self.endpoint(&format!("submissions/{form_id}"))?);
        let submissions: Vec<Submission> = self.send_json(request).await?;

        debug!(%form_id, count = submissions.len(), "submissions listed");
        Ok(submissions)
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url.join(path).map_err(|error| {
            AppError::Internal(format!("failed to build form store url for '{path}': {error}"))
        })
    }

    fn document_request(
        &self,
        request: reqwest::RequestBuilder,
        form: &FormDocument,
    ) -> AppResult<reqwest::RequestBuilder> {
        Ok(request
            .header(CONTENT_TYPE, "application/json")
            .body(form.to_json_bytes()?))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<Vec<u8>> {
        let response = request
            .send()
            .await
            .map_err(|error| AppError::Transport(format!("form store is unreachable: {error}")))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|error| {
            AppError::Transport(format!("failed to read form store response: {error}"))
        })?;

        if status.is_success() {
            return Ok(body.to_vec());
        }

        let message = serde_json::from_slice::<ErrorBody>(&body)
            .map(|error_body| error_body.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
        Err(error_for_status(status, message))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> AppResult<T> {
        let body = self.send(request).await?;
        serde_json::from_slice(&body).map_err(|error| {
            AppError::Format(format!("form store returned an undecodable body: {error}"))
        })
    }
}

fn error_for_status(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::BAD_REQUEST => AppError::Validation(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Transport(format!("form store answered {status}: {message}")),
    }
}

#[async_trait]
impl FormStore for HttpFormStore {
    async fn create(&self, form: &FormDocument) -> AppResult<FormId> {
        let url = self.endpoint("forms")?;
        let request = self.document_request(self.http_client.post(url), form)?;
        let created: CreatedResponse<FormId> = self.send_json(request).await?;
        Ok(created.id)
    }

    async fn update(&self, form_id: FormId, form: &FormDocument) -> AppResult<FormDocument> {
        let url = self.endpoint(&format!("forms/{form_id}"))?;
        let request = self.document_request(self.http_client.put(url), form)?;
        let body = self.send(request).await?;
        FormDocument::from_json_bytes(&body)
    }

    async fn get(&self, form_id: FormId) -> AppResult<FormDocument> {
        let url = self.endpoint(&format!("forms/{form_id}"))?;
        let body = self.send(self.http_client.get(url)).await?;
        FormDocument::from_json_bytes(&body)
    }

    async fn list(&self) -> AppResult<Vec<FormSummary>> {
        let request = self.http_client.get(self.endpoint("forms")?);
        self.send_json(request).await
    }
}
