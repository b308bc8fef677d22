//! Infrastructure adapters: repositories and the HTTP form store client.

#![forbid(unsafe_code)]

mod http_form_store;
mod in_memory_form_repository;
mod in_memory_submission_repository;
mod postgres_form_repository;
mod postgres_submission_repository;

pub use http_form_store::HttpFormStore;
pub use in_memory_form_repository::InMemoryFormRepository;
pub use in_memory_submission_repository::InMemorySubmissionRepository;
pub use postgres_form_repository::PostgresFormRepository;
pub use postgres_submission_repository::PostgresSubmissionRepository;
