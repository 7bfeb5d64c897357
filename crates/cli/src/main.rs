//! mylib CLI - time conversions, credential lookup, histograms, error reports

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mylib_core::application::{CredentialRequest, CredentialService, Diagnostics};
use mylib_core::domain::constants::DEFAULT_TIME_PATTERN;
use mylib_core::domain::{buckets, DomainError, TimeValue, Verbosity};
use mylib_core::port::time_provider::SystemTimeProvider;
use mylib_core::{install_home, secs_to_millis, to_seconds, TimeCodec};
use mylib_infra_file::JsonCredentialFile;
use mylib_infra_system::{build_reporter, ConsolePrompt};

use crate::config::{AppConfig, DEFAULT_CONFIG_PATH};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "mylib")]
#[command(about = "Home-zone time conversions, credentials and error reports", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(long, env = "MYLIB_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert between epoch millis, epoch seconds and home-zone text
    Time {
        #[command(subcommand)]
        command: TimeCommand,
    },

    /// Look up stored credentials
    Creds {
        #[command(subcommand)]
        command: CredsCommand,
    },

    /// Histogram of values over ascending breakpoints
    Buckets {
        /// Breakpoints, comma separated (e.g. 10,20,50)
        #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
        lows: Vec<f64>,

        /// Values to count
        #[arg(allow_hyphen_values = true)]
        values: Vec<f64>,
    },

    /// Send an error report through the configured reporter
    Report {
        /// Message words (joined with spaces)
        #[arg(required = true)]
        message: Vec<String>,
    },
}

#[derive(Subcommand)]
enum TimeCommand {
    /// Any representation to epoch seconds (integer input = millis)
    ToSecs {
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Added to millisecond input only
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset: f64,
    },

    /// Float epoch seconds to epoch millis (truncating)
    ToMillis {
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Subtracted before conversion
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        delta: f64,
    },

    /// Format a value in the home zone
    Format {
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// strftime pattern
        #[arg(short, long, default_value = DEFAULT_TIME_PATTERN)]
        pattern: String,

        /// Append 3-digit milliseconds
        #[arg(long)]
        millis: bool,
    },

    /// Parse home-zone wall-clock text to epoch seconds
    Parse {
        text: String,

        /// strftime pattern
        #[arg(short, long, default_value = DEFAULT_TIME_PATTERN)]
        pattern: String,
    },
}

#[derive(Subcommand)]
enum CredsCommand {
    /// Print (username, password) for a system
    Get {
        /// System name, e.g. ncs01.example.edu
        system: String,

        /// Username (default: first user listed for the system)
        #[arg(short, long)]
        user: Option<String>,

        /// Prompt to create missing entries
        #[arg(short, long)]
        interactive: bool,

        /// Print the password instead of a mask
        #[arg(long)]
        show_password: bool,
    },
}

#[derive(Tabled)]
struct BucketRow {
    low: f64,
    count: usize,
}

/// Read a command-line value: JSON numbers keep their int/float kind,
/// anything that is not JSON is text.
fn read_value(raw: &str, operation: &'static str) -> std::result::Result<TimeValue, DomainError> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => TimeValue::from_json(&value, operation),
        Err(_) => Ok(TimeValue::Text(raw.to_string())),
    }
}

fn init_logging(verbose: u8) {
    let log_format = std::env::var("MYLIB_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let default_directive = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run_time(codec: &TimeCodec, command: TimeCommand) -> Result<()> {
    match command {
        TimeCommand::ToSecs { value, offset } => {
            let secs = to_seconds(read_value(&value, "to_seconds")?, offset)?;
            println!("{:?}", secs);
        }

        TimeCommand::ToMillis { value, delta } => {
            let millis = secs_to_millis(read_value(&value, "secs_to_millis")?, delta)?;
            println!("{}", millis);
        }

        TimeCommand::Format {
            value,
            pattern,
            millis,
        } => {
            let input =
                read_value(&value, "format_local").unwrap_or_else(|_| TimeValue::Text(value));
            println!("{}", codec.format_local(input, &pattern, millis));
        }

        TimeCommand::Parse { text, pattern } => {
            let secs = codec
                .parse_local(&text, &pattern)
                .with_context(|| format!("Cannot parse {:?} with {:?}", text, pattern))?;
            println!("{:?}", secs);
        }
    }
    Ok(())
}

fn run_creds(
    config: &AppConfig,
    diagnostics: &Diagnostics,
    verbosity: Verbosity,
    command: CredsCommand,
) -> Result<()> {
    let CredsCommand::Get {
        system,
        user,
        interactive,
        show_password,
    } = command;

    let service = CredentialService::new(
        Arc::new(JsonCredentialFile::new(&config.credentials.path)),
        Arc::new(ConsolePrompt::stdio()),
    );

    diagnostics.print_if(
        &mut std::io::stderr(),
        verbosity,
        &format!("Looking up credentials for {}", system),
    )?;

    let mut request = CredentialRequest::new(system).interactive(interactive);
    if let Some(user) = user {
        request = request.with_username(user);
    }
    let creds = service.lookup(request).context("Credential lookup failed")?;

    let password = match (&creds.password, show_password) {
        (Some(password), true) => password.normal(),
        (Some(_), false) => "********".dimmed(),
        (None, _) => "(none)".yellow(),
    };
    println!("  {} {}", "Username:".bold(), creds.username);
    println!("  {} {}", "Password:".bold(), password);
    Ok(())
}

/// Breakpoints must be ascending and nothing may be NaN
fn check_histogram_input(lows: &[f64], values: &[f64]) -> Result<()> {
    if lows.iter().chain(values).any(|v| v.is_nan()) {
        anyhow::bail!("Breakpoints and values must be numbers, not NaN");
    }
    if lows.windows(2).any(|pair| pair[0] > pair[1]) {
        anyhow::bail!("Breakpoints must be in ascending order");
    }
    Ok(())
}

fn run_buckets(lows: Vec<f64>, mut values: Vec<f64>) -> Result<()> {
    check_histogram_input(&lows, &values)?;

    let rows: Vec<BucketRow> = buckets(&mut values, &lows)
        .into_iter()
        .map(|(low, count)| BucketRow { low, count })
        .collect();

    println!("{}", Table::new(rows));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    init_logging(cli.verbose);
    info!("mylib v{} starting", VERSION);

    // 2. Load configuration
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;

    // 3. Fix the home zone for the whole process
    let codec = *install_home(&config.time).context("Invalid home zone")?;

    // 4. Setup dependencies (DI wiring)
    let verbosity = Verbosity::new(cli.verbose);
    let diagnostics = Diagnostics::new(
        build_reporter(&config.reporter),
        Arc::new(SystemTimeProvider),
        codec,
    );

    match cli.command {
        Commands::Time { command } => run_time(&codec, command)?,

        Commands::Creds { command } => run_creds(&config, &diagnostics, verbosity, command)?,

        Commands::Buckets { lows, values } => run_buckets(lows, values)?,

        Commands::Report { message } => {
            diagnostics.log_err(&message.join(" ")).await;
        }
    }

    Ok(())
}
