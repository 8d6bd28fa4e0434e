//! Tolerant extraction of structured JSON from raw model text.
//!
//! Models routinely wrap their JSON in markdown fences, with or without a
//! language tag. We strip one layer of fencing, trim, and hand the rest to
//! serde. Parse failures are reported, never raised; the offending text is
//! logged as a bounded preview.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::errors::{GenError, GenResult};
use crate::util::trunc_for_log;

const PREVIEW_BYTES: usize = 200;

/// Strip a single layer of markdown code fencing, if present.
pub fn strip_code_fences(raw: &str) -> &str {
  let mut s = raw.trim();
  if let Some(rest) = s.strip_prefix("```") {
    // Drop an optional language tag on the opening fence line.
    let rest = match rest.find('\n') {
      Some(nl) if rest[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => &rest[nl + 1..],
      _ => rest,
    };
    s = rest.strip_suffix("```").unwrap_or(rest).trim();
  }
  s
}

/// Parse model output as `T` after stripping fences.
pub fn extract<T: DeserializeOwned>(raw: &str) -> GenResult<T> {
  let text = strip_code_fences(raw);
  serde_json::from_str::<T>(text).map_err(|e| {
    warn!(
      target: "generate",
      error = %e,
      preview = %trunc_for_log(raw, PREVIEW_BYTES),
      "Response is not valid JSON"
    );
    GenError::Malformed(e.to_string())
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::Value;

  #[test]
  fn plain_json_passes_through() {
    let v: Value = extract(r#"{"description": "ok"}"#).unwrap();
    assert_eq!(v["description"], "ok");
  }

  #[test]
  fn tagged_fence_is_stripped() {
    let raw = "```json\n{\"description\": \"ok\"}\n```";
    let v: Value = extract(raw).unwrap();
    assert_eq!(v["description"], "ok");
  }

  #[test]
  fn bare_fence_is_stripped() {
    let raw = "```\n[1, 2, 3]\n```";
    let v: Value = extract(raw).unwrap();
    assert_eq!(v, serde_json::json!([1, 2, 3]));
  }

  #[test]
  fn fence_without_newline_is_stripped() {
    let v: Value = extract("```{\"a\": 1}```").unwrap();
    assert_eq!(v["a"], 1);
  }

  #[test]
  fn surrounding_whitespace_is_trimmed() {
    let raw = "  \n```json\n{\"a\": 1}\n```  \n";
    let v: Value = extract(raw).unwrap();
    assert_eq!(v["a"], 1);
  }

  #[test]
  fn inner_fences_survive() {
    // Only the outermost fencing layer is formatting; fences inside JSON
    // strings are content.
    let raw = "```json\n{\"example\": \"``` not a fence ```\"}\n```";
    let v: Value = extract(raw).unwrap();
    assert_eq!(v["example"], "``` not a fence ```");
  }

  #[test]
  fn junk_reports_malformed() {
    let err = extract::<Value>("Sure! Here is your JSON: {oops").unwrap_err();
    assert!(matches!(err, GenError::Malformed(_)));
  }

  #[test]
  fn prose_with_language_tag_reports_malformed() {
    let err = extract::<Value>("```text\nnot json at all\n```").unwrap_err();
    assert!(matches!(err, GenError::Malformed(_)));
  }
}
