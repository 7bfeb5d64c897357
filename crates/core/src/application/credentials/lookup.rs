// Lookup Use Case

use crate::domain::{CredentialFile, Credentials};
use crate::error::{AppError, Result};
use crate::port::prompt_source::{ask_yes_no, parse_yes_no};
use crate::port::{CredentialRepository, PromptSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Lookup request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRequest {
    /// System name, e.g. "ncs01.example.edu"
    pub system: String,

    /// Defaults to the first user listed for the system
    #[serde(default)]
    pub username: Option<String>,

    /// Prompt for anything missing instead of failing
    #[serde(default)]
    pub interactive: bool,
}

impl CredentialRequest {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            username: None,
            interactive: false,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

/// Execute lookup use case
///
/// # Arguments
///
/// * `repo` - Credential map store
/// * `prompt` - Interactive input (only used when `req.interactive`)
/// * `req` - Lookup request
///
/// # Errors
///
/// * `AppError::NotFound` - no store / no entry and not interactive
/// * `AppError::Domain` - entry is not a non-empty object
pub fn execute(
    repo: &dyn CredentialRepository,
    prompt: &dyn PromptSource,
    req: CredentialRequest,
) -> Result<Credentials> {
    let mut file = match repo.load()? {
        Some(file) => file,
        None => create_store(repo, prompt, req.interactive)?,
    };

    let mut username = req.username;
    if !file.contains(&req.system) {
        if !req.interactive {
            return Err(AppError::NotFound(format!(
                "No credentials for {}",
                req.system
            )));
        }
        username = Some(enroll(repo, prompt, &mut file, &req.system, username)?);
    }

    debug!(system = %req.system, "Resolving credentials");
    file.lookup(&req.system, username.as_deref())?
        .ok_or_else(|| AppError::NotFound(format!("No credentials for {}", req.system)))
}

/// Missing store: fail, or offer to create an empty one
fn create_store(
    repo: &dyn CredentialRepository,
    prompt: &dyn PromptSource,
    interactive: bool,
) -> Result<CredentialFile> {
    if !interactive {
        return Err(AppError::NotFound(format!(
            "Credentials file {} does not exist",
            repo.location()
        )));
    }

    prompt.notify(&format!("You do not have a {} file", repo.location()))?;
    let file = CredentialFile::new();
    if ask_yes_no(prompt, "Do you want to create one? (Y/N): ")? {
        repo.save(&file)?;
        info!(location = %repo.location(), "Created empty credentials file");
    }
    Ok(file)
}

/// Missing entry: ask for a user and password, optionally persist.
///
/// The username is asked once; an invalid Y/N answer asks for the
/// password again. Returns the username the entry was created for.
fn enroll(
    repo: &dyn CredentialRepository,
    prompt: &dyn PromptSource,
    file: &mut CredentialFile,
    system: &str,
    username: Option<String>,
) -> Result<String> {
    prompt.notify(&format!("No credentials found for {}", system))?;

    let username = match username {
        Some(name) => name,
        None => prompt.ask(&format!("Enter your default username for {}: ", system))?,
    };

    loop {
        let password =
            prompt.ask_secret(&format!("Enter password for {} on {}: ", username, system))?;
        let answer = prompt.ask(&format!(
            "Add these credentials to {}? (Y/N)",
            repo.location()
        ))?;

        let Some(persist) = parse_yes_no(&answer) else {
            continue;
        };

        file.insert(system, &username, &password);
        if persist {
            repo.save(file)?;
            info!(system = %system, username = %username, "Saved new credentials");
        }
        return Ok(username);
    }
}
