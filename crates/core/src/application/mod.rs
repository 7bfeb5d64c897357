// Application Layer - Use Cases

pub mod credentials;
pub mod diagnostics;

// Re-exports
pub use credentials::{CredentialRequest, CredentialService};
pub use diagnostics::Diagnostics;
