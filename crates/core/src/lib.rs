// mylib Core - Domain Logic & Ports
// NO infrastructure dependencies (filesystem, console, subprocess live in infra crates)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use domain::time_codec::{
    home, install_home, millis_to_secs, parse_iso, secs_to_millis, to_seconds, to_seconds_json,
    TimeCodec,
};
pub use domain::{DomainError, TimeValue};
pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
