// Domain Layer - Pure logic and value types

pub mod constants;
pub mod credentials;
pub mod error;
pub mod histogram;
pub mod time_codec;
pub mod time_value;
pub mod verbosity;
pub mod zone;

// Re-exports
pub use credentials::{CredentialFile, Credentials};
pub use error::DomainError;
pub use histogram::buckets;
pub use time_codec::TimeCodec;
pub use time_value::{EpochSeconds, TimeValue};
pub use verbosity::Verbosity;
pub use zone::TimeZoneConfig;
