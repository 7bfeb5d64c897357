// Credential Repository Port

use crate::domain::CredentialFile;
use crate::error::Result;

/// Persistent store of the credential map
pub trait CredentialRepository: Send + Sync {
    /// Load the map; `Ok(None)` when the store does not exist yet
    fn load(&self) -> Result<Option<CredentialFile>>;

    /// Replace the stored map
    fn save(&self, file: &CredentialFile) -> Result<()>;

    /// Human-readable location, used in prompts and errors
    fn location(&self) -> String;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// In-memory repository that counts saves
    pub struct InMemoryCredentialRepository {
        file: Mutex<Option<CredentialFile>>,
        saves: Mutex<usize>,
    }

    impl InMemoryCredentialRepository {
        pub fn new(file: Option<CredentialFile>) -> Self {
            Self {
                file: Mutex::new(file),
                saves: Mutex::new(0),
            }
        }

        pub fn snapshot(&self) -> Option<CredentialFile> {
            self.file.lock().unwrap().clone()
        }

        pub fn save_count(&self) -> usize {
            *self.saves.lock().unwrap()
        }
    }

    impl CredentialRepository for InMemoryCredentialRepository {
        fn load(&self) -> Result<Option<CredentialFile>> {
            Ok(self.file.lock().unwrap().clone())
        }

        fn save(&self, file: &CredentialFile) -> Result<()> {
            *self.file.lock().unwrap() = Some(file.clone());
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }
}
