// Reporter selection (composition helper)

use std::sync::Arc;
use tracing::info;

use crate::console_reporter::ConsoleReporter;
use crate::mail_reporter::MailReporter;
use mylib_core::domain::constants::CONSOLE_RECIPIENT;
use mylib_core::port::{Reporter, ReporterConfig, ReporterKind};

/// Build the reporter named by `config.kind`
pub fn build_reporter(config: &ReporterConfig) -> Arc<dyn Reporter> {
    let config = resolve_recipients(config);
    info!(
        kind = %config.kind,
        subject = %config.subject,
        recipients = ?config.recipients,
        "Error reporter configured"
    );

    match config.kind {
        ReporterKind::Mail => Arc::new(MailReporter::new(config, ConsoleReporter::stdout())),
        ReporterKind::Console => Arc::new(ConsoleReporter::stdout()),
    }
}

/// Fill in default recipients when none are configured
pub fn resolve_recipients(config: &ReporterConfig) -> ReporterConfig {
    let mut config = config.clone();
    if config.recipients.is_empty() {
        config.recipients = match config.kind {
            ReporterKind::Mail => vec![default_mail_recipient()],
            ReporterKind::Console => vec![CONSOLE_RECIPIENT.to_string()],
        };
    }
    config
}

/// `<user>@<last two labels of the host name>`
pub fn default_mail_recipient() -> String {
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "localhost".to_string());
    format!("{}@{}", current_user(), mail_domain(&host))
}

fn current_user() -> String {
    ["LOGNAME", "USER", "LNAME", "USERNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "root".to_string())
}

fn mail_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    labels[labels.len().saturating_sub(2)..].join(".")
}
