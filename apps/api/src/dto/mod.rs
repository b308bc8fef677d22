mod common;
mod forms;
mod submissions;

pub use common::{CreatedResponse, HealthResponse, ServiceStatusResponse};
pub use forms::{FieldDto, FormResponse, FormSummaryResponse, SaveFormRequest};
pub use submissions::{
    CreateSubmissionRequest, FieldResponseDto, SubmissionResponse, SubmissionReviewResponse,
    SubmitFormRequest, SubmitFormResponse, SubmittedAnswers,
};
