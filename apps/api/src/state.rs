use std::sync::Arc;

use formcraft_application::{
    FormRepository, FormService, SubmissionRepository, SubmissionService,
};
use formcraft_infrastructure::{InMemoryFormRepository, InMemorySubmissionRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub form_service: FormService,
    pub submission_service: SubmissionService,
}

impl AppState {
    /// Wires services over the given repositories.
    #[must_use]
    pub fn new(
        form_repository: Arc<dyn FormRepository>,
        submission_repository: Arc<dyn SubmissionRepository>,
    ) -> Self {
        Self {
            form_service: FormService::new(form_repository.clone()),
            submission_service: SubmissionService::new(form_repository, submission_repository),
        }
    }

    /// Wires services over fresh in-memory repositories.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryFormRepository::new()),
            Arc::new(InMemorySubmissionRepository::new()),
        )
    }
}
