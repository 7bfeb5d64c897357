// Verbosity level passed down through call layers

use serde::{Deserialize, Serialize};

/// Verbosity level; 0 is quiet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const QUIET: Verbosity = Verbosity(0);

    pub fn new(level: u8) -> Self {
        Self(level)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn is_enabled(self) -> bool {
        self.0 > 0
    }

    /// Level for the next layer down (never below quiet)
    pub fn lower(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl From<bool> for Verbosity {
    fn from(verbose: bool) -> Self {
        Self(u8::from(verbose))
    }
}

impl From<u8> for Verbosity {
    fn from(level: u8) -> Self {
        Self(level)
    }
}
