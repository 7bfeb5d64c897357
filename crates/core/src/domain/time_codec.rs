// Time codec: epoch millis <-> epoch seconds <-> ISO-like text in the home zone
//
// Instants are always UTC-referenced f64 seconds. The home zone only matters
// when formatting to text (`format_local`) or reading wall-clock text
// (`parse_local`).

use std::fmt::Write as _;
use std::sync::{LazyLock, OnceLock};

use chrono::format::{self, ParseResult, Parsed, StrftimeItems};
use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::error::{DomainError, Result};
use crate::domain::time_value::{EpochSeconds, TimeValue};
use crate::domain::zone::TimeZoneConfig;

/// `YYYY-MM-DDTHH:MM:SS[.f+](Z|+HHMM|-HHMM)`, full match
static ISO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2})(\.[0-9]+)?(Z|[+-][0-9]{4})$",
    )
    .expect("ISO pattern compiles")
});

const ISO_BASE_PATTERN: &str = "%Y-%m-%dT%H:%M:%S";

static HOME: OnceLock<TimeCodec> = OnceLock::new();

/// Install the process-wide home codec.
///
/// The first successful call wins; later calls with a different zone are
/// ignored (with a warning) and return the codec already installed.
pub fn install_home(config: &TimeZoneConfig) -> Result<&'static TimeCodec> {
    let codec = TimeCodec::from_config(config)?;
    let installed = HOME.get_or_init(|| codec);
    if installed.zone() != codec.zone() {
        warn!(
            installed = %installed.zone(),
            requested = %codec.zone(),
            "Home zone already installed; ignoring new zone"
        );
    }
    Ok(installed)
}

/// Process-wide home codec (US/Eastern unless `install_home` ran first)
pub fn home() -> &'static TimeCodec {
    HOME.get_or_init(TimeCodec::default)
}

/// Convert epoch milliseconds to epoch seconds: `millis / 1000 + delta`
pub fn millis_to_secs(millis: i64, delta: f64) -> EpochSeconds {
    millis as f64 / 1000.0 + delta
}

/// Convert epoch seconds to epoch milliseconds, truncating toward zero.
///
/// Only a float `Seconds` value is accepted; integers are rejected even
/// when they hold a whole number of seconds. NaN, infinities and results
/// outside the `i64` range are `OutOfRange`.
pub fn secs_to_millis(value: impl Into<TimeValue>, delta: f64) -> Result<i64> {
    match value.into() {
        TimeValue::Seconds(secs) => {
            let millis = ((secs - delta) * 1000.0).trunc();
            // i64::MAX as f64 rounds up to 2^63, which is already out of range
            if !millis.is_finite() || millis < i64::MIN as f64 || millis >= i64::MAX as f64 {
                return Err(DomainError::OutOfRange {
                    operation: "secs_to_millis",
                    value: format!("{:?}", secs - delta),
                });
            }
            Ok(millis as i64)
        }
        other => Err(DomainError::TypeKind {
            operation: "secs_to_millis",
            found: other.kind().to_string(),
        }),
    }
}

/// Convert any representation to epoch seconds.
///
/// `offset` only applies to the milliseconds path. Float seconds are
/// returned unchanged and text goes through [`parse_iso`].
pub fn to_seconds(value: impl Into<TimeValue>, offset: f64) -> Result<EpochSeconds> {
    match value.into() {
        TimeValue::Millis(millis) => Ok(millis_to_secs(millis, offset)),
        TimeValue::Seconds(secs) => Ok(secs),
        TimeValue::Text(text) => parse_iso(&text),
    }
}

/// [`to_seconds`] for dynamically typed input
pub fn to_seconds_json(value: &Value, offset: f64) -> Result<EpochSeconds> {
    to_seconds(TimeValue::from_json(value, "to_seconds")?, offset)
}

/// Parse ISO-like text to UTC epoch seconds.
///
/// `Z` is offset zero. For `+HHMM` the offset minutes are subtracted and
/// for `-HHMM` they are added. This sign handling is kept for compatibility
/// with existing stored values; confirm with callers before changing it.
///
/// A fraction is added as a decimal value whatever its digit count, so
/// `.5` and `.500` both add half a second.
pub fn parse_iso(text: &str) -> Result<EpochSeconds> {
    let caps = ISO_PATTERN
        .captures(text)
        .ok_or_else(|| DomainError::Format(format!("{:?} does not match ISO format", text)))?;

    let base = NaiveDateTime::parse_from_str(&caps[1], ISO_BASE_PATTERN)
        .map_err(|e| format_error(text, e))?;
    let mut secs = base.and_utc().timestamp() as f64;

    if let Some(fraction) = caps.get(2) {
        secs += fraction
            .as_str()
            .parse::<f64>()
            .map_err(|e| format_error(text, e))?;
    }

    let offset = zone_offset_secs(&caps[3]).map_err(|e| format_error(text, e))?;
    Ok(secs + offset as f64)
}

/// Seconds to add to the wall-clock reading for a zone suffix
fn zone_offset_secs(zone: &str) -> std::result::Result<i64, std::num::ParseIntError> {
    if zone == "Z" {
        return Ok(0);
    }
    let (sign, digits) = zone.split_at(1);
    let hours: i64 = digits[..2].parse()?;
    let minutes: i64 = digits[2..4].parse()?;
    let factor = if sign == "+" { -60 } else { 60 };
    Ok(factor * (hours * 60 + minutes))
}

fn format_error(text: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Format(format!("{:?}: {}", text, err))
}

/// Epoch seconds of a zoned datetime, microsecond precision
fn epoch_seconds<Z: TimeZone>(dt: &DateTime<Z>) -> EpochSeconds {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_micros()) / 1_000_000.0
}

/// Formatter and wall-clock parser bound to one home zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeCodec {
    zone: Tz,
}

impl TimeCodec {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn from_config(config: &TimeZoneConfig) -> Result<Self> {
        Ok(Self::new(config.resolve()?))
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Zoned datetime for an instant, `None` when out of range or not finite
    pub fn to_local(&self, secs: EpochSeconds) -> Option<DateTime<Tz>> {
        let micros = (secs * 1_000_000.0).round_ties_even();
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return None;
        }
        DateTime::from_timestamp_micros(micros as i64).map(|utc| utc.with_timezone(&self.zone))
    }

    /// Format a value as home-zone text. Never fails.
    ///
    /// Text that is not ISO-like is returned unchanged. When the instant
    /// cannot be rendered (out of range, not finite, bad pattern) the
    /// value's own string form is returned.
    pub fn format_local(
        &self,
        value: impl Into<TimeValue>,
        pattern: &str,
        with_millis: bool,
    ) -> String {
        let value = value.into();
        let secs = match &value {
            TimeValue::Seconds(secs) => *secs,
            TimeValue::Millis(millis) => millis_to_secs(*millis, 0.0),
            TimeValue::Text(text) => match parse_iso(text) {
                Ok(secs) => secs,
                Err(_) => return text.clone(),
            },
        };

        match self.render(secs, pattern, with_millis) {
            Some(out) => out,
            None => {
                debug!(value = %value, pattern = pattern, "Could not format instant, passing through");
                value.to_string()
            }
        }
    }

    fn render(&self, secs: EpochSeconds, pattern: &str, with_millis: bool) -> Option<String> {
        let local = self.to_local(secs)?;
        let mut out = String::new();
        write!(out, "{}", local.format(pattern)).ok()?;
        if with_millis {
            // first three digits of the six-digit microsecond fraction
            let micros = format!("{:06}", local.timestamp_subsec_micros());
            out.push('.');
            out.push_str(&micros[..3]);
        }
        Some(out)
    }

    /// Parse wall-clock text in the home zone to UTC epoch seconds.
    ///
    /// Fields the pattern leaves out take strptime defaults: year 1900,
    /// month and day 1, time 00:00:00, and `%I` without `%p` is AM. An
    /// ambiguous local time (clocks going back) resolves to standard time;
    /// a skipped local time (clocks going forward) is read with the
    /// standard offset.
    pub fn parse_local(&self, text: &str, pattern: &str) -> Result<EpochSeconds> {
        let mismatch = |e: format::ParseError| {
            DomainError::Format(format!("{:?} does not match {:?}: {}", text, pattern, e))
        };

        let mut parsed = Parsed::new();
        format::parse(&mut parsed, text, StrftimeItems::new(pattern)).map_err(mismatch)?;
        fill_strptime_defaults(&mut parsed).map_err(mismatch)?;
        let naive = parsed.to_naive_datetime_with_offset(0).map_err(mismatch)?;

        let secs = match self.zone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => epoch_seconds(&dt),
            LocalResult::Ambiguous(_, standard) => epoch_seconds(&standard),
            LocalResult::None => {
                let offset = self.zone.offset_from_utc_datetime(&naive).fix();
                let utc = naive - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
                epoch_seconds(&utc.and_utc())
            }
        };
        Ok(secs)
    }
}

/// Complete a partial parse the way `strptime` does
fn fill_strptime_defaults(parsed: &mut Parsed) -> ParseResult<()> {
    // an epoch timestamp pins every field on its own
    if parsed.timestamp().is_some() {
        return Ok(());
    }

    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some()
        || parsed.isoyear().is_some();
    if !has_year {
        parsed.set_year(1900)?;
    }

    let has_week_or_ordinal = parsed.ordinal().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some()
        || parsed.isoweek().is_some();
    if !has_week_or_ordinal {
        if parsed.month().is_none() {
            parsed.set_month(1)?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1)?;
        }
    }

    if parsed.hour_mod_12().is_none() {
        parsed.set_hour12(12)?;
    }
    if parsed.hour_div_12().is_none() {
        parsed.set_ampm(false)?;
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0)?;
    }
    Ok(())
}

impl Default for TimeCodec {
    fn default() -> Self {
        Self::new(chrono_tz::US::Eastern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::DEFAULT_TIME_PATTERN;
    use serde_json::json;

    fn eastern() -> TimeCodec {
        TimeCodec::default()
    }

    fn utc() -> TimeCodec {
        TimeCodec::new(chrono_tz::UTC)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    // ------------------------------------------------------------------
    // to_seconds / millis_to_secs / secs_to_millis
    // ------------------------------------------------------------------

    #[test]
    fn test_to_seconds_millis_path() {
        assert_eq!(to_seconds(1700000000000_i64, 0.0).unwrap(), 1700000000.0);
        assert_eq!(to_seconds(1700000000000_i64, 0.25).unwrap(), 1700000000.25);
    }

    #[test]
    fn test_to_seconds_float_ignores_offset() {
        assert_eq!(to_seconds(1700000000.5, 0.0).unwrap(), 1700000000.5);
        assert_eq!(to_seconds(1700000000.5, 99.0).unwrap(), 1700000000.5);
    }

    #[test]
    fn test_to_seconds_text_ignores_offset() {
        assert_eq!(to_seconds("2023-11-14T22:13:20Z", 99.0).unwrap(), 1700000000.0);
    }

    #[test]
    fn test_to_seconds_json() {
        assert_eq!(to_seconds_json(&json!(1700000000000_i64), 0.0).unwrap(), 1700000000.0);
        assert_eq!(to_seconds_json(&json!(1700000000.5), 1.0).unwrap(), 1700000000.5);

        let err = to_seconds_json(&json!(true), 0.0).unwrap_err();
        assert!(matches!(err, DomainError::TypeKind { .. }));
        let err = to_seconds_json(&json!(null), 0.0).unwrap_err();
        assert!(matches!(err, DomainError::TypeKind { .. }));
    }

    #[test]
    fn test_millis_to_secs() {
        assert_eq!(millis_to_secs(1500, 0.0), 1.5);
        assert_eq!(millis_to_secs(1500, 2.0), 3.5);
        assert_eq!(millis_to_secs(-1500, 0.0), -1.5);
    }

    #[test]
    fn test_secs_to_millis_truncates() {
        assert_eq!(secs_to_millis(1700000000.999, 0.0).unwrap(), 1700000000999);
        assert_eq!(secs_to_millis(0.0019, 0.0).unwrap(), 1);
        assert_eq!(secs_to_millis(-1.5, 0.0).unwrap(), -1500);
        assert_eq!(secs_to_millis(10.5, 0.5).unwrap(), 10000);
    }

    #[test]
    fn test_secs_to_millis_rejects_unrepresentable() {
        for secs in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1e300, -1e300, 9.3e15] {
            let err = secs_to_millis(secs, 0.0).unwrap_err();
            assert!(
                matches!(err, DomainError::OutOfRange { operation: "secs_to_millis", .. }),
                "{} gave {:?}",
                secs,
                err
            );
        }
        assert!(secs_to_millis(1.0, f64::NAN).is_err());
        assert_eq!(secs_to_millis(9.2e15, 0.0).unwrap(), 9_200_000_000_000_000_000);
    }

    #[test]
    fn test_secs_to_millis_rejects_non_float() {
        let err = secs_to_millis(1700000000_i64, 0.0).unwrap_err();
        assert_eq!(
            err,
            DomainError::TypeKind {
                operation: "secs_to_millis",
                found: "integer milliseconds".to_string(),
            }
        );
        assert!(secs_to_millis("2023-11-14T22:13:20Z", 0.0).is_err());
    }

    // ------------------------------------------------------------------
    // parse_iso
    // ------------------------------------------------------------------

    #[test]
    fn test_parse_iso_zulu() {
        assert_eq!(parse_iso("2023-11-14T22:13:20Z").unwrap(), 1700000000.0);
        assert_eq!(parse_iso("2023-11-14T22:13:20.5Z").unwrap(), 1700000000.5);
    }

    #[test]
    fn test_parse_iso_fraction_digit_count_irrelevant() {
        assert_eq!(
            parse_iso("2023-11-14T22:13:20.5Z").unwrap(),
            parse_iso("2023-11-14T22:13:20.500Z").unwrap()
        );
        assert_close(parse_iso("2023-11-14T22:13:20.000001Z").unwrap(), 1700000000.000001);
    }

    #[test]
    fn test_parse_iso_plus_offset_is_subtracted() {
        let secs = parse_iso("2023-11-14T22:13:20.123+0500").unwrap();
        assert_close(secs, 1699982000.123);
    }

    #[test]
    fn test_parse_iso_minus_offset_is_added() {
        let secs = parse_iso("2023-11-14T22:13:20-0130").unwrap();
        assert_eq!(secs, 1700000000.0 + 5400.0);
    }

    #[test]
    fn test_parse_iso_rejects_other_shapes() {
        for text in [
            "not-a-date",
            "2023-11-14T22:13:20",
            "2023-11-14 22:13:20Z",
            "2023-11-14T22:13:20+05:00",
            "2023-11-14T22:13:20.Z",
            " 2023-11-14T22:13:20Z",
            "2023-11-14T22:13:20Zjunk",
        ] {
            let err = parse_iso(text).unwrap_err();
            assert!(matches!(err, DomainError::Format(_)), "{} should fail", text);
        }
    }

    #[test]
    fn test_parse_iso_rejects_impossible_dates() {
        assert!(matches!(
            parse_iso("2023-13-40T22:13:20Z"),
            Err(DomainError::Format(_))
        ));
        assert!(matches!(
            parse_iso("2023-02-29T00:00:00Z"),
            Err(DomainError::Format(_))
        ));
    }

    // ------------------------------------------------------------------
    // format_local
    // ------------------------------------------------------------------

    #[test]
    fn test_format_local_numeric_inputs() {
        let codec = eastern();
        assert_eq!(
            codec.format_local(1700000000.0, DEFAULT_TIME_PATTERN, false),
            "2023-11-14T17:13:20"
        );
        assert_eq!(
            codec.format_local(1700000000000_i64, DEFAULT_TIME_PATTERN, false),
            "2023-11-14T17:13:20"
        );
        assert_eq!(
            codec.format_local(0.0, DEFAULT_TIME_PATTERN, false),
            "1969-12-31T19:00:00"
        );
    }

    #[test]
    fn test_format_local_millis_truncated() {
        let codec = eastern();
        assert_eq!(
            codec.format_local(1700000000.9876, DEFAULT_TIME_PATTERN, true),
            "2023-11-14T17:13:20.987"
        );
        assert_eq!(
            codec.format_local(1700000000.9996, DEFAULT_TIME_PATTERN, true),
            "2023-11-14T17:13:20.999"
        );
        assert_eq!(
            codec.format_local(-1.5, DEFAULT_TIME_PATTERN, true),
            "1969-12-31T18:59:58.500"
        );
    }

    #[test]
    fn test_format_local_text_is_reformatted() {
        assert_eq!(
            eastern().format_local("2023-11-14T22:13:20Z", DEFAULT_TIME_PATTERN, false),
            "2023-11-14T17:13:20"
        );
    }

    #[test]
    fn test_format_local_garbage_passthrough() {
        assert_eq!(
            eastern().format_local("garbage-string", DEFAULT_TIME_PATTERN, true),
            "garbage-string"
        );
    }

    #[test]
    fn test_format_local_degrades_on_bad_instant() {
        let codec = eastern();
        assert_eq!(codec.format_local(f64::NAN, DEFAULT_TIME_PATTERN, false), "NaN");
        assert_eq!(codec.format_local(1e300, DEFAULT_TIME_PATTERN, false), "1e300");
        assert_eq!(
            codec.format_local(i64::MAX, DEFAULT_TIME_PATTERN, false),
            i64::MAX.to_string()
        );
    }

    #[test]
    fn test_format_local_degrades_on_bad_pattern() {
        assert_eq!(
            eastern().format_local(1700000000.0, "%Q", false),
            "1700000000.0"
        );
    }

    #[test]
    fn test_format_local_custom_pattern() {
        assert_eq!(
            eastern().format_local(1699999999.0, "%y-%m-%dT%H:%M:%S", false),
            "23-11-14T17:13:19"
        );
    }

    #[test]
    fn test_round_trip_in_utc_home_zone() {
        let codec = utc();
        for secs in [0.0, 1700000000.75, 1709208000.999] {
            let text = codec.format_local(secs, DEFAULT_TIME_PATTERN, false) + "Z";
            assert_eq!(parse_iso(&text).unwrap(), f64::trunc(secs));
        }
    }

    // ------------------------------------------------------------------
    // parse_local / to_local
    // ------------------------------------------------------------------

    #[test]
    fn test_parse_local_standard_and_daylight() {
        let codec = eastern();
        assert_eq!(
            codec
                .parse_local("2023-11-14T17:13:20", DEFAULT_TIME_PATTERN)
                .unwrap(),
            1700000000.0
        );
        assert_eq!(
            codec
                .parse_local("2023-07-01T12:00:00", DEFAULT_TIME_PATTERN)
                .unwrap(),
            1688227200.0
        );
    }

    #[test]
    fn test_parse_local_dst_edges() {
        let codec = eastern();
        // 01:30 happens twice; standard time wins
        assert_eq!(
            codec
                .parse_local("2023-11-05T01:30:00", DEFAULT_TIME_PATTERN)
                .unwrap(),
            1699165800.0
        );
        // 02:30 never happens; read with the standard offset
        assert_eq!(
            codec
                .parse_local("2023-03-12T02:30:00", DEFAULT_TIME_PATTERN)
                .unwrap(),
            1678606200.0
        );
    }

    #[test]
    fn test_parse_local_date_only_is_midnight() {
        assert_eq!(
            eastern().parse_local("2023-11-14", "%Y-%m-%d").unwrap(),
            1699938000.0
        );
    }

    #[test]
    fn test_parse_local_partial_time_fields() {
        let codec = TimeCodec::new(chrono_tz::UTC);
        assert_eq!(
            codec.parse_local("2023-11-14 17", "%Y-%m-%d %H").unwrap(),
            1699981200.0
        );
        // %I without %p is AM
        assert_eq!(
            codec.parse_local("2023-11-14 05:30", "%Y-%m-%d %I:%M").unwrap(),
            1699939800.0
        );
        assert_eq!(
            codec.parse_local("2023-11-14 12:30", "%Y-%m-%d %I:%M").unwrap(),
            1699921800.0
        );
        assert_eq!(
            codec.parse_local("2023-11-14 05:30 PM", "%Y-%m-%d %I:%M %p").unwrap(),
            1699983000.0
        );
    }

    #[test]
    fn test_parse_local_missing_date_is_1900_01_01() {
        let codec = TimeCodec::new(chrono_tz::UTC);
        assert_eq!(codec.parse_local("17:13", "%H:%M").unwrap(), -2208926820.0);
        assert_eq!(codec.parse_local("2023", "%Y").unwrap(), 1672531200.0);
        assert_eq!(codec.parse_local("2023-11", "%Y-%m").unwrap(), 1698796800.0);
    }

    #[test]
    fn test_parse_local_mismatch() {
        let err = eastern()
            .parse_local("14/11/2023", DEFAULT_TIME_PATTERN)
            .unwrap_err();
        assert!(matches!(err, DomainError::Format(_)));
    }

    #[test]
    fn test_to_local_offsets() {
        let local = eastern().to_local(1700000000.0).unwrap();
        assert_eq!(local.offset().fix().local_minus_utc(), -5 * 3600);
        assert!(eastern().to_local(f64::INFINITY).is_none());
    }

    #[test]
    fn test_home_defaults_to_eastern() {
        assert_eq!(home().zone(), chrono_tz::US::Eastern);
    }
}
