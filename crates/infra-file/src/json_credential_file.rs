// JSON file CredentialRepository Implementation

use crate::path::expand_path;
use mylib_core::domain::constants::DEFAULT_CREDENTIALS_PATH;
use mylib_core::domain::CredentialFile;
use mylib_core::error::{AppError, Result};
use mylib_core::port::CredentialRepository;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

// Helper to attach the file path to IO errors
fn map_io_error(path: &Path, err: std::io::Error) -> AppError {
    AppError::Io(std::io::Error::new(
        err.kind(),
        format!("{}: {}", path.display(), err),
    ))
}

/// Credential map stored as a JSON object in a single file
pub struct JsonCredentialFile {
    path: PathBuf,
}

impl JsonCredentialFile {
    /// Store at `path` (a leading `~` is expanded)
    pub fn new(path: &str) -> Self {
        Self {
            path: expand_path(path),
        }
    }

    /// Store at `~/.credentials.json`
    pub fn at_default_location() -> Self {
        Self::new(DEFAULT_CREDENTIALS_PATH)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialRepository for JsonCredentialFile {
    fn load(&self) -> Result<Option<CredentialFile>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Credentials file not found");
                return Ok(None);
            }
            Err(e) => return Err(map_io_error(&self.path, e)),
        };

        let file: CredentialFile = serde_json::from_str(&text)?;
        debug!(
            path = %self.path.display(),
            systems = file.systems().count(),
            "Credentials file loaded"
        );
        Ok(Some(file))
    }

    fn save(&self, file: &CredentialFile) -> Result<()> {
        let json = serde_json::to_string_pretty(file)?;

        // Sibling temp file (0600 on unix, removed on drop), renamed over the store
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| map_io_error(dir, e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| map_io_error(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| map_io_error(&self.path, e.error))?;

        debug!(path = %self.path.display(), "Credentials file saved");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
