//! Error taxonomy for the generation pipeline.
//!
//! Per-level failures (`Backend`, `Malformed`, `Schema`) are recovered locally
//! by substituting fallback content; only `Persistence` aborts a run, and it
//! does so before any partial catalog reaches disk.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum GenError {
  /// Transport error, timeout, non-2xx status, or an unusable response
  /// envelope from the generative backend.
  #[error("backend unavailable: {0}")]
  Backend(String),

  /// Backend text that is not parseable as the expected structure after
  /// stripping formatting.
  #[error("malformed response: {0}")]
  Malformed(String),

  /// Parsed content missing the fields a level needs.
  #[error("schema violation: {0}")]
  Schema(String),

  /// The catalog file cannot be read or written.
  #[error("persistence failure: {0}")]
  Persistence(String),
}

pub type GenResult<T> = Result<T, GenError>;

impl From<std::io::Error> for GenError {
  fn from(err: std::io::Error) -> Self {
    GenError::Persistence(err.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_messages_carry_the_reason() {
    let err = GenError::Backend("connection refused".into());
    assert_eq!(err.to_string(), "backend unavailable: connection refused");

    let err = GenError::Malformed("expected value at line 1".into());
    assert!(err.to_string().starts_with("malformed response:"));
  }

  #[test]
  fn io_errors_map_to_persistence() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: GenError = io.into();
    assert!(matches!(err, GenError::Persistence(_)));
  }
}
