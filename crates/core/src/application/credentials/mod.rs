// Credential Service - lookup with optional interactive enrollment

pub mod lookup;

pub use lookup::CredentialRequest;

use crate::domain::Credentials;
use crate::error::Result;
use crate::port::{CredentialRepository, PromptSource};
use std::sync::Arc;

/// Credential Service
pub struct CredentialService {
    repo: Arc<dyn CredentialRepository>,
    prompt: Arc<dyn PromptSource>,
}

impl CredentialService {
    pub fn new(repo: Arc<dyn CredentialRepository>, prompt: Arc<dyn PromptSource>) -> Self {
        Self { repo, prompt }
    }

    /// Look up (username, password) for a system
    pub fn lookup(&self, req: CredentialRequest) -> Result<Credentials> {
        lookup::execute(self.repo.as_ref(), self.prompt.as_ref(), req)
    }
}
