// Domain constants (No magic values)

/// Home zone used when no configuration is supplied
pub const DEFAULT_HOME_ZONE: &str = "US/Eastern";

/// Default strftime pattern for `format_local` and `parse_local`
pub const DEFAULT_TIME_PATTERN: &str = "%Y-%m-%dT%H:%M:%S";

/// Timestamp pattern for error report lines (two-digit year)
pub const ERROR_STAMP_PATTERN: &str = "%y-%m-%dT%H:%M:%S";

/// Default credentials file (tilde expanded by the adapter)
pub const DEFAULT_CREDENTIALS_PATH: &str = "~/.credentials.json";

/// Default mail transport binary
pub const DEFAULT_MAILX_PATH: &str = "/usr/bin/mailx";

/// Upper bound for one mail transport invocation (30s)
pub const DEFAULT_MAILX_TIMEOUT_MS: u64 = 30_000;

/// Recipient placeholder when mail delivery is not available
pub const CONSOLE_RECIPIENT: &str = "default";
