//! Error reports flowing from Diagnostics into the system reporters

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use mylib_core::application::Diagnostics;
use mylib_core::domain::TimeCodec;
use mylib_core::port::time_provider::mocks::FixedTimeProvider;
use mylib_core::port::{ReporterConfig, ReporterKind};
use mylib_infra_system::{build_reporter, resolve_recipients, ConsoleReporter};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn diagnostics_with(reporter: Arc<dyn mylib_core::port::Reporter>) -> Diagnostics {
    Diagnostics::new(
        reporter,
        Arc::new(FixedTimeProvider(1_700_000_000_000)),
        TimeCodec::default(),
    )
}

#[tokio::test]
async fn test_console_report_line() {
    let out = Captured::default();
    let diagnostics = diagnostics_with(Arc::new(ConsoleReporter::with_writer(out.clone())));

    let report = diagnostics.log_err("rsync exited with 23").await;

    assert_eq!(report.timestamp, "23-11-14T17:13:20");
    assert_eq!(out.text(), "23-11-14T17:13:20 ERROR rsync exited with 23\n");
}

#[tokio::test]
async fn test_failed_delivery_is_swallowed() {
    let config = ReporterConfig {
        kind: ReporterKind::Mail,
        recipients: vec!["ops@example.edu".to_string()],
        mailx_path: "/nonexistent/mailx".into(),
        ..ReporterConfig::default()
    };
    let diagnostics = diagnostics_with(build_reporter(&config));

    let report = diagnostics.log_err("disk full").await;
    assert_eq!(report.message, "disk full");
}

#[test]
fn test_console_recipients_default() {
    let config = ReporterConfig {
        kind: ReporterKind::Console,
        ..ReporterConfig::default()
    };
    assert_eq!(resolve_recipients(&config).recipients, vec!["default"]);
}
