// Port Layer - Interfaces for external dependencies

pub mod credential_repository;
pub mod prompt_source;
pub mod reporter;
pub mod time_provider; // For deterministic testing

// Re-exports
pub use credential_repository::CredentialRepository;
pub use prompt_source::PromptSource;
pub use reporter::{ErrorReport, ReportError, Reporter, ReporterConfig, ReporterKind};
pub use time_provider::TimeProvider;
