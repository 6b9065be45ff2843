//! Crowdin error types
//!
//! `ModelError` covers everything that can go wrong while decoding the raw
//! payload. `Error` adds the opaque failure of the underlying fetch.

/// Decoding errors for raw Crowdin payloads
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
  /// A timestamp did not match `YYYY-MM-DD HH:MM:SS` exactly.
  /// Crowdin's timestamp format is undocumented; a mismatch means it changed.
  #[error("Failed to parse timestamp {raw:?}, format may have changed")]
  MalformedTimestamp { raw: String },

  #[error("Field {field:?} has unexpected type, expected {expected}")]
  UnexpectedType {
    field: String,
    expected: &'static str,
  },

  #[error("Missing field {field:?}")]
  MissingField { field: String },

  #[error("Invalid payload: {0}")]
  InvalidPayload(String),
}

impl ModelError {
  pub fn malformed_timestamp(raw: impl Into<String>) -> Self {
    ModelError::MalformedTimestamp { raw: raw.into() }
  }

  pub fn unexpected_type(field: impl Into<String>, expected: &'static str) -> Self {
    ModelError::UnexpectedType {
      field: field.into(),
      expected,
    }
  }

  pub fn missing_field(field: impl Into<String>) -> Self {
    ModelError::MissingField {
      field: field.into(),
    }
  }
}

/// Errors surfaced by the Crowdin accessors
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  Model(#[from] ModelError),

  /// Failure of the project info fetch, passed through untouched.
  #[error("Failed to fetch project info: {0}")]
  Fetch(color_eyre::Report),
}

impl Error {
  /// True when the error is a timestamp format mismatch
  pub fn is_malformed_timestamp(&self) -> bool {
    matches!(self, Error::Model(ModelError::MalformedTimestamp { .. }))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
