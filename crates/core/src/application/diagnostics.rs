// Diagnostics - timestamped progress lines and best-effort error reports

use crate::domain::constants::{DEFAULT_TIME_PATTERN, ERROR_STAMP_PATTERN};
use crate::domain::{TimeCodec, Verbosity};
use crate::port::{ErrorReport, Reporter, TimeProvider};
use std::io::Write;
use std::sync::Arc;
use tracing::{error, warn};

/// Diagnostics service
///
/// Stamps messages with the current home-zone time and routes error
/// reports to the configured `Reporter`.
pub struct Diagnostics {
    reporter: Arc<dyn Reporter>,
    time_provider: Arc<dyn TimeProvider>,
    codec: TimeCodec,
}

impl Diagnostics {
    pub fn new(
        reporter: Arc<dyn Reporter>,
        time_provider: Arc<dyn TimeProvider>,
        codec: TimeCodec,
    ) -> Self {
        Self {
            reporter,
            time_provider,
            codec,
        }
    }

    fn stamp(&self, pattern: &str) -> String {
        self.codec
            .format_local(self.time_provider.now_millis(), pattern, false)
    }

    /// Report an error. Never fails; delivery problems are logged.
    ///
    /// Returns the report that was handed to the reporter.
    pub async fn log_err(&self, message: &str) -> ErrorReport {
        let report = ErrorReport::new(self.stamp(ERROR_STAMP_PATTERN), message);
        error!(timestamp = %report.timestamp, message = %report.message, "Error reported");

        if let Err(e) = self.reporter.report(&report).await {
            warn!(error = %e, message = %report.message, "Error report delivery failed");
        }
        report
    }

    /// Write "<timestamp> <message>" when `verbosity` is enabled.
    ///
    /// Returns whether a line was written.
    pub fn print_if<W: Write>(
        &self,
        out: &mut W,
        verbosity: Verbosity,
        message: &str,
    ) -> std::io::Result<bool> {
        if !verbosity.is_enabled() {
            return Ok(false);
        }
        writeln!(out, "{} {}", self.stamp(DEFAULT_TIME_PATTERN), message)?;
        Ok(true)
    }
}
