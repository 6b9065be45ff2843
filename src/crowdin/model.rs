//! Field coercion for raw Crowdin records.
//!
//! Crowdin returns loosely typed JSON: numbers arrive as strings and
//! timestamps in a zone-less local format. A [`Model`] keeps the raw object
//! as received and decodes individual fields on read. Record types declare a
//! table of [`FieldDef`]s and expose typed accessors on top of it.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;

use super::error::ModelError;
use super::timestamp::parse_timestamp;

/// Raw JSON object as returned by the API
pub type RawMap = Map<String, Value>;

/// How a raw value is converted when read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  /// Passed through as a string
  Raw,
  /// Parsed to an integer
  Integer,
  /// Parsed as a Crowdin timestamp
  Time,
}

/// A named field and its coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
  pub name: &'static str,
  pub kind: FieldKind,
}

pub const fn raw_field(name: &'static str) -> FieldDef {
  FieldDef {
    name,
    kind: FieldKind::Raw,
  }
}

pub const fn integer_field(name: &'static str) -> FieldDef {
  FieldDef {
    name,
    kind: FieldKind::Integer,
  }
}

pub const fn time_field(name: &'static str) -> FieldDef {
  FieldDef {
    name,
    kind: FieldKind::Time,
  }
}

/// A decoded field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Absent,
  Raw(String),
  Integer(i64),
  Time(DateTime<Utc>),
}

impl fmt::Display for FieldValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FieldValue::Absent => f.write_str("-"),
      FieldValue::Raw(s) => f.write_str(s),
      FieldValue::Integer(n) => write!(f, "{}", n),
      FieldValue::Time(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S UTC")),
    }
  }
}

/// Wrapper around one raw JSON object
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
  data: RawMap,
}

impl Model {
  pub fn new(data: RawMap) -> Self {
    Self { data }
  }

  /// Wrap a raw value, which must be a JSON object.
  pub fn from_value(value: Value, what: &str) -> Result<Self, ModelError> {
    match value {
      Value::Object(data) => Ok(Self::new(data)),
      other => Err(ModelError::InvalidPayload(format!(
        "{} is not an object: {}",
        what, other
      ))),
    }
  }

  pub fn data(&self) -> &RawMap {
    &self.data
  }

  /// Value at `name`, with null treated as absent
  pub fn raw_value(&self, name: &str) -> Option<&Value> {
    self.data.get(name).filter(|v| !v.is_null())
  }

  /// String value at `name`. A present value that is not a string is an
  /// error, never read as absent.
  pub fn raw(&self, name: &str) -> Result<Option<&str>, ModelError> {
    match self.raw_value(name) {
      None => Ok(None),
      Some(Value::String(s)) => Ok(Some(s.as_str())),
      Some(_) => Err(ModelError::unexpected_type(name, "a string")),
    }
  }

  /// Like `raw_value`, but `false` also reads as absent
  fn present_value(&self, name: &str) -> Option<&Value> {
    self
      .raw_value(name)
      .filter(|v| !matches!(v, Value::Bool(false)))
  }

  /// Integer value at `name`.
  ///
  /// Accepts JSON numbers (fractions truncate) and strings, which are read
  /// by their leading integer prefix; a string without one reads as 0.
  /// `false` reads as absent. Values outside `i64` are errors.
  pub fn integer(&self, name: &str) -> Result<Option<i64>, ModelError> {
    let Some(value) = self.present_value(name) else {
      return Ok(None);
    };

    match value {
      Value::Number(n) => n
        .as_i64()
        .or_else(|| n.as_f64().and_then(truncate_to_i64))
        .map(Some)
        .ok_or_else(|| ModelError::unexpected_type(name, "an integer within 64 bits")),
      Value::String(s) => leading_integer(s)
        .map(Some)
        .ok_or_else(|| ModelError::unexpected_type(name, "an integer within 64 bits")),
      _ => Err(ModelError::unexpected_type(name, "an integer")),
    }
  }

  /// Timestamp at `name`, converted to UTC.
  ///
  /// Anything present that is not a well-formed Crowdin timestamp string is
  /// a [`ModelError::MalformedTimestamp`]. `false` reads as absent.
  pub fn time(&self, name: &str) -> Result<Option<DateTime<Utc>>, ModelError> {
    match self.present_value(name) {
      None => Ok(None),
      Some(Value::String(s)) => parse_timestamp(s).map(Some),
      Some(other) => Err(ModelError::malformed_timestamp(other.to_string())),
    }
  }

  /// Decode one field by its kind
  pub fn get(&self, field: FieldDef) -> Result<FieldValue, ModelError> {
    let value = match field.kind {
      FieldKind::Raw => self
        .raw(field.name)?
        .map(|s| FieldValue::Raw(s.to_string())),
      FieldKind::Integer => self.integer(field.name)?.map(FieldValue::Integer),
      FieldKind::Time => self.time(field.name)?.map(FieldValue::Time),
    };
    Ok(value.unwrap_or(FieldValue::Absent))
  }

  /// Decode every field of a table, in table order
  pub fn decode_all(
    &self,
    fields: &[FieldDef],
  ) -> Result<Vec<(&'static str, FieldValue)>, ModelError> {
    fields
      .iter()
      .map(|field| Ok((field.name, self.get(*field)?)))
      .collect()
  }
}

/// A typed view over a [`Model`] with a declared field table
pub trait Record {
  /// Fields this record declares, in display order
  const FIELDS: &'static [FieldDef];

  fn model(&self) -> &Model;

  fn data(&self) -> &RawMap {
    self.model().data()
  }

  /// Decode all declared fields
  fn fields(&self) -> Result<Vec<(&'static str, FieldValue)>, ModelError> {
    self.model().decode_all(Self::FIELDS)
  }
}

/// Truncate a float toward zero, if the result fits in an `i64`
fn truncate_to_i64(f: f64) -> Option<i64> {
  let t = f.trunc();
  // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
  (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

/// Read the leading integer of a string: optional whitespace, optional sign,
/// then digits. No digits reads as 0. `None` only on overflow.
fn leading_integer(s: &str) -> Option<i64> {
  let s = s.trim_start();
  let (negative, rest) = match s.as_bytes().first() {
    Some(b'-') => (true, &s[1..]),
    Some(b'+') => (false, &s[1..]),
    _ => (false, s),
  };

  let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
  if digits_len == 0 {
    return Some(0);
  }

  let magnitude: i64 = rest[..digits_len].parse().ok()?;
  Some(if negative { -magnitude } else { magnitude })
}
