//! Courseforge · AI course-catalog generator
//!
//! - Batch pipeline: generate every level of every configured course through
//!   the Gemini backend, normalize the output, merge into the catalog file
//! - Optional Gemini integration (via environment variables); without a key
//!   the whole catalog is still produced from fallback content
//! - One writer, strictly sequential, paced between backend calls
//!
//! Important env variables:
//!   GEMINI_API_KEY          : enables Gemini integration if present
//!   GEMINI_API_URL          : default generateContent endpoint
//!   GEMINI_TIMEOUT_SECS     : per-call timeout (default 30)
//!   CATALOG_PATH            : catalog JSON location (default "data/courses-config.json")
//!   COURSEFORGE_CONFIG_PATH : path to TOML config (prompts, course plans, pacing)
//!   LOG_LEVEL               : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT              : "pretty" (default) or "json"

mod assembler;
mod catalog;
mod config;
mod domain;
mod errors;
mod extract;
mod fallback;
mod gemini;
mod pacing;
mod quiz;
mod telemetry;
mod util;

use std::path::Path;
use std::time::Duration;

use tracing::{info, instrument};

use crate::assembler::LevelAssembler;
use crate::catalog::MergePolicy;
use crate::config::{load_generator_config, GeminiConfig};
use crate::domain::{LevelKind, LevelSource, MILESTONE_CADENCE};
use crate::gemini::Gemini;
use crate::pacing::Pacer;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = load_generator_config();

  let mut gemini_cfg = GeminiConfig::from_env();
  gemini_cfg.params = cfg.generation.clone();
  let gemini = Gemini::new(&gemini_cfg);
  match &gemini {
    Some(g) => info!(target: "courseforge", endpoint = %g.endpoint, "Gemini enabled."),
    None => {
      info!(target: "courseforge", "Gemini disabled (no GEMINI_API_KEY). Using fallback content.")
    }
  }

  let assembler = LevelAssembler::new(gemini, cfg.prompts.clone());
  let mut pacer = Pacer::new(Duration::from_secs(cfg.pacing_secs));

  let path = Path::new(&cfg.catalog_path);
  let mut catalog = catalog::load(path)?;

  for plan in &cfg.courses {
    info!(target: "courseforge", course = %plan.key, levels = plan.total_levels, "Generating course");
    let course = assembler.generate_course(plan, &mut pacer).await;

    let generated =
      course.levels.iter().filter(|l| l.source == LevelSource::Generated).count();
    let milestones = course
      .levels
      .iter()
      .filter(|l| LevelKind::for_id(l.id, MILESTONE_CADENCE) == LevelKind::Milestone)
      .count();
    info!(
      target: "courseforge",
      course = %plan.key,
      total = course.levels.len(),
      generated,
      fallback = course.levels.len() - generated,
      milestones,
      "Course complete"
    );

    catalog::merge_course(
      &mut catalog,
      &plan.key,
      &course.name,
      &course.icon,
      course.levels,
      &MergePolicy::default(),
    );
  }

  catalog::save(path, &catalog)?;
  info!(
    target: "courseforge",
    path = %cfg.catalog_path,
    courses = catalog.courses.len(),
    "Catalog generation complete"
  );
  Ok(())
}
