// Credential file model
//
// On disk: { "<system>": { "<username>": "<password>", ... }, ... }
// Key order is preserved, so "first username" means first in the file.

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A resolved (username, password) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    /// `None` when the requested user has no password on record
    pub password: Option<String>,
}

/// Whole credential map, keyed by system name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialFile(Map<String, Value>);

impl CredentialFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, system: &str) -> bool {
        self.0.contains_key(system)
    }

    pub fn systems(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Replace the entry for `system` with a single user
    pub fn insert(&mut self, system: &str, username: &str, password: &str) {
        let mut entry = Map::new();
        entry.insert(username.to_string(), Value::String(password.to_string()));
        self.0.insert(system.to_string(), Value::Object(entry));
    }

    /// Resolve credentials for `system`.
    ///
    /// Returns `Ok(None)` when the system has no entry. Without `username`
    /// the first listed user is returned; with one, that user and its
    /// password (if any).
    pub fn lookup(&self, system: &str, username: Option<&str>) -> Result<Option<Credentials>> {
        let Some(entry) = self.0.get(system) else {
            return Ok(None);
        };
        let users = match entry {
            Value::Object(users) if !users.is_empty() => users,
            _ => return Err(DomainError::InvalidCredentialEntry(system.to_string())),
        };

        let credentials = match username {
            Some(name) => Credentials {
                username: name.to_string(),
                password: users.get(name).and_then(password_text),
            },
            None => {
                let (name, password) = users
                    .iter()
                    .next()
                    .ok_or_else(|| DomainError::InvalidCredentialEntry(system.to_string()))?;
                Credentials {
                    username: name.clone(),
                    password: password_text(password),
                }
            }
        };
        Ok(Some(credentials))
    }
}

fn password_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}
