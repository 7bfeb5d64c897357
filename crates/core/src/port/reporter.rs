// Reporter Port
// Best-effort delivery of error reports (mail on Linux, console elsewhere)

use crate::domain::constants::{DEFAULT_MAILX_PATH, DEFAULT_MAILX_TIMEOUT_MS};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One error report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Home-zone timestamp text
    pub timestamp: String,
    pub message: String,
}

impl ErrorReport {
    pub fn new(timestamp: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: message.into(),
        }
    }

    /// Console form: "<timestamp> ERROR <message>"
    pub fn line(&self) -> String {
        format!("{} ERROR {}", self.timestamp, self.message)
    }
}

/// Reporter errors
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Mail transport exited with status {0}")]
    ExitStatus(i32),

    #[error("Mail transport timeout after {0}ms")]
    Timeout(u64),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Which reporter implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// Echo to console and send through the mail transport
    Mail,
    /// Echo to console only
    Console,
}

impl ReporterKind {
    /// Mail on Linux, console everywhere else
    pub fn platform_default() -> Self {
        if cfg!(target_os = "linux") {
            ReporterKind::Mail
        } else {
            ReporterKind::Console
        }
    }
}

impl Default for ReporterKind {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl std::fmt::Display for ReporterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReporterKind::Mail => write!(f, "mail"),
            ReporterKind::Console => write!(f, "console"),
        }
    }
}

/// Reporter settings, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    pub kind: ReporterKind,
    /// Mail subject; defaults to the program name
    pub subject: String,
    /// Mail recipients; empty means "derive from user and host"
    pub recipients: Vec<String>,
    pub mailx_path: PathBuf,
    pub timeout_ms: u64,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            kind: ReporterKind::default(),
            subject: program_name(),
            recipients: Vec::new(),
            mailx_path: PathBuf::from(DEFAULT_MAILX_PATH),
            timeout_ms: DEFAULT_MAILX_TIMEOUT_MS,
        }
    }
}

/// File name of the running executable
pub fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

/// Reporter trait
///
/// Implementations:
/// - MailReporter: console echo + mail transport subprocess
/// - ConsoleReporter: console echo only
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Deliver one report
    ///
    /// # Errors
    /// - ReportError::SpawnFailed if the transport cannot be started
    /// - ReportError::ExitStatus if the transport reports failure
    /// - ReportError::Timeout if delivery exceeds the configured bound
    async fn report(&self, report: &ErrorReport) -> Result<(), ReportError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Records reports; optionally fails every delivery
    #[derive(Default)]
    pub struct RecordingReporter {
        reports: Mutex<Vec<ErrorReport>>,
        fail: bool,
    }

    impl RecordingReporter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                reports: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn reports(&self) -> Vec<ErrorReport> {
            self.reports.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Reporter for RecordingReporter {
        async fn report(&self, report: &ErrorReport) -> Result<(), ReportError> {
            self.reports.lock().unwrap().push(report.clone());
            if self.fail {
                return Err(ReportError::ExitStatus(1));
            }
            Ok(())
        }
    }
}
