//! Layered configuration: defaults, optional TOML file, `MYLIB__*` environment.
//!
//! ```text
//! # ~/.mylib.toml
//! [time]
//! home_zone = "US/Eastern"
//!
//! [credentials]
//! path = "~/.credentials.json"
//!
//! [reporter]
//! kind = "mail"
//! subject = "nightly-sync"
//! recipients = ["ops@example.edu"]
//! ```
//!
//! Environment overrides use `__` between sections, e.g.
//! `MYLIB__TIME__HOME_ZONE=UTC` or `MYLIB__REPORTER__RECIPIENTS=a@x,b@y`.

use config::{Config, ConfigError, Environment, File, FileFormat};
use mylib_core::domain::constants::DEFAULT_CREDENTIALS_PATH;
use mylib_core::domain::TimeZoneConfig;
use mylib_core::port::ReporterConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "~/.mylib.toml";
const ENV_PREFIX: &str = "MYLIB";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub time: TimeZoneConfig,
    pub credentials: CredentialsConfig,
    pub reporter: ReporterConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Credential file; a leading `~` is expanded
    pub path: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_CREDENTIALS_PATH.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration; a missing file is not an error
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let path = shellexpand::tilde(path).into_owned();

        Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("reporter.recipients")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
