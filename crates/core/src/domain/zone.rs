// Home zone configuration

use crate::domain::constants::DEFAULT_HOME_ZONE;
use crate::domain::error::{DomainError, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Home time zone used for all text input and output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeZoneConfig {
    /// IANA zone name, e.g. "US/Eastern"
    pub home_zone: String,
}

impl TimeZoneConfig {
    pub fn new(home_zone: impl Into<String>) -> Self {
        Self {
            home_zone: home_zone.into(),
        }
    }

    /// Resolve the zone name against the tz database
    pub fn resolve(&self) -> Result<Tz> {
        self.home_zone
            .parse::<Tz>()
            .map_err(|_| DomainError::UnknownZone(self.home_zone.clone()))
    }
}

impl Default for TimeZoneConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOME_ZONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zone_resolves() {
        let tz = TimeZoneConfig::default().resolve().unwrap();
        assert_eq!(tz, chrono_tz::US::Eastern);
    }

    #[test]
    fn test_unknown_zone() {
        let err = TimeZoneConfig::new("Mars/Olympus_Mons").resolve().unwrap_err();
        assert_eq!(err, DomainError::UnknownZone("Mars/Olympus_Mons".to_string()));
    }
}
