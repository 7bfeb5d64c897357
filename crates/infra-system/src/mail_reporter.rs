// Mail Reporter implementation
// reason: tokio process + timeout so a hung mail transport cannot block the caller
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::console_reporter::ConsoleReporter;
use mylib_core::port::{ErrorReport, ReportError, Reporter, ReporterConfig};

/// Echoes the report to the console, then pipes the message to
/// `<mailx_path> -s <subject> <recipients...>`
pub struct MailReporter {
    config: ReporterConfig,
    echo: ConsoleReporter,
}

impl MailReporter {
    /// Create a new mail reporter
    ///
    /// # Arguments
    /// * `config` - Subject, recipients (already resolved), transport path and timeout
    /// * `echo` - Console sink for the report line
    ///
    /// # Example
    /// ```ignore
    /// let reporter = MailReporter::new(
    ///     resolve_recipients(&ReporterConfig::default()),
    ///     ConsoleReporter::stdout(),
    /// );
    /// ```
    pub fn new(config: ReporterConfig, echo: ConsoleReporter) -> Self {
        Self { config, echo }
    }

    /// Arguments passed to the mail transport
    fn command_args(&self) -> Vec<String> {
        let mut args = vec!["-s".to_string(), self.config.subject.clone()];
        args.extend(self.config.recipients.iter().cloned());
        args
    }

    /// Spawn the transport, feed `message` on stdin and wait for it
    async fn send(&self, message: &str) -> Result<(), ReportError> {
        let args = self.command_args();
        debug!(
            transport = %self.config.mailx_path.display(),
            args = ?args,
            "Spawning mail transport"
        );

        let mut child = Command::new(&self.config.mailx_path)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ReportError::SpawnFailed(e.to_string()))?;

        let stdin = child.stdin.take();
        let delivery = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(message.as_bytes()).await {
                    Ok(()) => {}
                    // transport exited without reading; its status decides
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {}
                    Err(e) => return Err(ReportError::IoError(e.to_string())),
                }
                // closes the pipe so the transport sees end of input
                drop(stdin);
            }
            child
                .wait_with_output()
                .await
                .map_err(|e| ReportError::IoError(e.to_string()))
        };

        // feeding stdin and waiting for exit share one deadline
        let timeout_ms = self.config.timeout_ms;
        let output = match timeout(Duration::from_millis(timeout_ms), delivery).await {
            Ok(result) => result?,
            Err(_) => return Err(ReportError::Timeout(timeout_ms)),
        };

        if output.status.success() {
            Ok(())
        } else {
            warn!(
                exit_code = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "Mail transport failed"
            );
            Err(ReportError::ExitStatus(output.status.code().unwrap_or(-1)))
        }
    }
}

#[async_trait]
impl Reporter for MailReporter {
    async fn report(&self, report: &ErrorReport) -> Result<(), ReportError> {
        self.echo.echo(report)?;
        self.send(&report.message).await?;

        info!(
            subject = %self.config.subject,
            recipients = ?self.config.recipients,
            "Error report mailed"
        );
        Ok(())
    }
}
