pub mod forms;
pub mod health;
pub mod submissions;

use formcraft_core::{AppError, FormId};

/// Parses a form id taken from a request; malformed ids name no form.
pub(crate) fn parse_form_id(raw: &str) -> Result<FormId, AppError> {
    raw.parse::<FormId>()
        .map_err(|_| AppError::NotFound(format!("form '{raw}' does not exist")))
}
