//! Decoder for Crowdin timestamps.
//!
//! Crowdin reports every timestamp as `YYYY-MM-DD HH:MM:SS` with no zone.
//! Experimentation shows the wall clock is US Eastern time, so values are
//! interpreted in `America/New_York` and converted to UTC. Parsing is strict:
//! any deviation from the pattern is an error rather than a best guess.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::{America::New_York, Tz};
use regex::Regex;
use std::sync::OnceLock;

use super::error::ModelError;

/// Zone Crowdin records its wall-clock timestamps in
pub const TIME_ZONE: Tz = New_York;

fn time_re() -> &'static Regex {
  static TIME_RE: OnceLock<Regex> = OnceLock::new();
  TIME_RE.get_or_init(|| {
    // [0-9] rather than \d: \d matches any Unicode digit
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2}) ([0-9]{2}):([0-9]{2}):([0-9]{2})$")
      .expect("timestamp pattern is valid")
  })
}

/// Parse a Crowdin timestamp into a UTC instant.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ModelError> {
  let naive = parse_naive(raw).ok_or_else(|| ModelError::malformed_timestamp(raw))?;
  localize(naive).ok_or_else(|| ModelError::malformed_timestamp(raw))
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
  let caps = time_re().captures(raw)?;
  let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

  let year = i32::try_from(num(1)?).ok()?;
  NaiveDate::from_ymd_opt(year, num(2)?, num(3)?)?.and_hms_opt(num(4)?, num(5)?, num(6)?)
}

/// Resolve a wall-clock time in [`TIME_ZONE`] to UTC.
///
/// Fall-back overlaps resolve to the earlier instant. Spring-forward gaps use
/// the offset in effect just before the transition.
fn localize(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
  match TIME_ZONE.from_local_datetime(&naive) {
    LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
    LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
    LocalResult::None => {
      let before = TIME_ZONE
        .from_local_datetime(&(naive - Duration::hours(1)))
        .earliest()?;
      Some(before.with_timezone(&Utc) + Duration::hours(1))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
  }

  #[test]
  fn test_summer_time_is_edt() {
    assert_eq!(
      parse_timestamp("2015-06-01 12:00:00").unwrap(),
      utc("2015-06-01T16:00:00Z")
    );
  }

  #[test]
  fn test_winter_time_is_est() {
    assert_eq!(
      parse_timestamp("2015-01-15 12:00:00").unwrap(),
      utc("2015-01-15T17:00:00Z")
    );
  }

  #[test]
  fn test_crosses_utc_midnight() {
    assert_eq!(
      parse_timestamp("2014-12-31 23:30:05").unwrap(),
      utc("2015-01-01T04:30:05Z")
    );
  }

  #[test]
  fn test_wrong_separator_is_malformed() {
    assert_eq!(
      parse_timestamp("2015-06-01T12:00:00"),
      Err(ModelError::malformed_timestamp("2015-06-01T12:00:00"))
    );
  }

  #[test]
  fn test_rejects_near_misses() {
    for raw in [
      "",
      "2015-06-01",
      "2015-6-01 12:00:00",
      "2015-06-01 12:00",
      "2015-06-01 12:00:00.123",
      "2015-06-01 12:00:00Z",
      "2015-06-01 12:00:00 -0400",
      "2015-06-01 12:00:00\n",
      " 2015-06-01 12:00:00",
      "2015-06-01  12:00:00",
      "+2015-06-01 12:00:00",
      "２０１５-06-01 12:00:00",
    ] {
      assert!(
        matches!(
          parse_timestamp(raw),
          Err(ModelError::MalformedTimestamp { .. })
        ),
        "expected {:?} to be rejected",
        raw
      );
    }
  }

  #[test]
  fn test_out_of_range_components_are_malformed() {
    for raw in [
      "2015-13-01 12:00:00",
      "2015-02-30 12:00:00",
      "2015-06-01 24:00:00",
      "2015-06-01 12:60:00",
      "2015-06-01 12:00:60",
    ] {
      assert!(parse_timestamp(raw).is_err(), "expected {:?} to be rejected", raw);
    }
  }

  #[test]
  fn test_error_carries_raw_value() {
    let err = parse_timestamp("yesterday").unwrap_err();
    assert_eq!(
      err,
      ModelError::MalformedTimestamp {
        raw: "yesterday".to_string()
      }
    );
    assert!(err.to_string().contains("yesterday"));
  }

  #[test]
  fn test_fall_back_overlap_takes_earlier_instant() {
    // 01:30 happens twice on 2015-11-01; the first one is still EDT
    assert_eq!(
      parse_timestamp("2015-11-01 01:30:00").unwrap(),
      utc("2015-11-01T05:30:00Z")
    );
  }

  #[test]
  fn test_spring_forward_gap_uses_prior_offset() {
    // 02:30 does not exist on 2015-03-08; read it with the EST offset
    assert_eq!(
      parse_timestamp("2015-03-08 02:30:00").unwrap(),
      utc("2015-03-08T07:30:00Z")
    );
  }
}
