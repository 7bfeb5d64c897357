// Console Reporter implementation

use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::debug;

use mylib_core::port::{ErrorReport, ReportError, Reporter};

/// Prints "<timestamp> ERROR <message>" lines
pub struct ConsoleReporter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleReporter {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Write the report line and flush
    pub fn echo(&self, report: &ErrorReport) -> Result<(), ReportError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| ReportError::IoError("console writer poisoned".to_string()))?;
        writeln!(out, "{}", report.line()).map_err(|e| ReportError::IoError(e.to_string()))?;
        out.flush().map_err(|e| ReportError::IoError(e.to_string()))
    }
}

#[async_trait]
impl Reporter for ConsoleReporter {
    async fn report(&self, report: &ErrorReport) -> Result<(), ReportError> {
        self.echo(report)?;
        debug!(message = %report.message, "Error report printed (no mail transport)");
        Ok(())
    }
}
