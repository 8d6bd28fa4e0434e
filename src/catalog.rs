//! Catalog persistence: load, merge by level id, atomic rewrite.
//!
//! The catalog file is the sole durable artifact. We read-modify-write the
//! whole document; the write goes to a temp file first and is renamed over
//! the original, so a failed run leaves the previous catalog intact.

use std::fs;
use std::path::Path;

use tracing::{info, instrument};

use crate::domain::{Catalog, Course, Level};
use crate::errors::{GenError, GenResult};

/// Which fields of an existing level survive a regeneration pass.
/// Replacement is wholesale except where the policy says otherwise.
#[derive(Clone, Copy, Debug)]
pub struct MergePolicy {
  /// Keep a previously curated non-empty `videoUrl` when the incoming level
  /// carries an empty one.
  pub preserve_video_url: bool,
}

impl Default for MergePolicy {
  fn default() -> Self {
    Self { preserve_video_url: true }
  }
}

/// Read the catalog, or start an empty one when the file does not exist yet.
pub fn load(path: &Path) -> GenResult<Catalog> {
  if !path.exists() {
    return Ok(Catalog::default());
  }
  let text = fs::read_to_string(path)?;
  serde_json::from_str(&text)
    .map_err(|e| GenError::Persistence(format!("unreadable catalog {}: {}", path.display(), e)))
}

/// Replace-or-insert `levels` in the named course. Levels already present
/// but not regenerated are left untouched; the pipeline never deletes one.
pub fn merge_course(
  catalog: &mut Catalog,
  key: &str,
  name: &str,
  icon: &str,
  levels: Vec<Level>,
  policy: &MergePolicy,
) {
  let course = catalog.courses.entry(key.to_string()).or_insert_with(Course::default);
  course.name = name.to_string();
  course.icon = icon.to_string();

  for mut level in levels {
    match course.levels.iter_mut().find(|l| l.id == level.id) {
      Some(existing) => {
        if policy.preserve_video_url && level.video_url.is_empty() && !existing.video_url.is_empty()
        {
          level.video_url = existing.video_url.clone();
        }
        *existing = level;
      }
      None => course.levels.push(level),
    }
  }
  course.levels.sort_by_key(|l| l.id);
}

/// Atomically rewrite the catalog: write to a temp file, then rename.
#[instrument(level = "info", skip(catalog), fields(path = %path.display()))]
pub fn save(path: &Path, catalog: &Catalog) -> GenResult<()> {
  let text = serde_json::to_string_pretty(catalog)
    .map_err(|e| GenError::Persistence(e.to_string()))?;

  if let Some(dir) = path.parent() {
    if !dir.as_os_str().is_empty() {
      fs::create_dir_all(dir)?;
    }
  }

  let tmp = path.with_extension("json.tmp");
  fs::write(&tmp, text + "\n")?;
  fs::rename(&tmp, path)?;

  info!(target: "courseforge", courses = catalog.courses.len(), "Catalog written");
  Ok(())
}
