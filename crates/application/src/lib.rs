//! Application services and ports.

#![forbid(unsafe_code)]

mod builder_session;
mod form_ports;
mod form_service;
mod submission_service;

#[cfg(test)]
mod test_support;

pub use builder_session::{BuilderSession, SessionState};
pub use form_ports::{FormRepository, FormStore, SaveFormInput, SubmissionRepository};
pub use form_service::FormService;
pub use submission_service::{SubmissionReview, SubmissionService};
