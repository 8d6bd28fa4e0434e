//! Level assembly: prompt construction, the generate → extract → normalize
//! chain, and fallback substitution.
//!
//! Every failure path degrades to the static fallback table; the assembler
//! never returns a partially populated level, and a batch run always ends
//! with a structurally valid course.

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::config::{CoursePlan, Prompts};
use crate::domain::{
  Coding, Concept, Course, Level, LevelKind, LevelSource, MILESTONE_CADENCE, QUIZ_SIZE,
};
use crate::errors::{GenError, GenResult};
use crate::extract::extract;
use crate::fallback::{default_coding, fallback_milestone_level, fallback_regular_level};
use crate::gemini::Gemini;
use crate::pacing::Pacer;
use crate::quiz::{normalize_quiz, TopicContext};
use crate::util::fill_template;

/// Loosely-typed level content as the model returns it. Every field is
/// optional; consumers pattern-match instead of probing a dynamic map.
#[derive(Debug, Default, Deserialize)]
pub struct LevelDraft {
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub icon: Option<String>,
  #[serde(default)]
  pub concepts: Vec<Concept>,
  #[serde(rename = "reviewConcepts", default)]
  pub review_concepts: Vec<Concept>,
  /// Kept untyped: the quiz normalizer owns all coercion.
  #[serde(default)]
  pub quiz: Option<Value>,
  #[serde(rename = "gameManual", default)]
  pub game_manual: Option<String>,
  #[serde(default)]
  pub coding: Option<Coding>,
}

pub struct LevelAssembler {
  gemini: Option<Gemini>,
  prompts: Prompts,
}

impl LevelAssembler {
  pub fn new(gemini: Option<Gemini>, prompts: Prompts) -> Self {
    Self { gemini, prompts }
  }

  /// Regular level: concepts + 5-question quiz + coding exercise.
  #[instrument(level = "info", skip(self, subject, topic, difficulty), fields(%id, %topic))]
  pub async fn assemble_regular(&self, subject: &str, id: u32, topic: &str, difficulty: &str) -> Level {
    match self.generate_regular(subject, id, topic, difficulty).await {
      Ok(level) => {
        info!(target: "generate", %id, source = "generated", "Level assembled");
        level
      }
      Err(e) => {
        error!(target: "generate", %id, error = %e, "Generation failed; using fallback level");
        fallback_regular_level(id, topic)
      }
    }
  }

  /// Milestone level: review concepts + game + coding, no quiz.
  #[instrument(level = "info", skip(self, subject, course_key, prev_topics), fields(%id, course = %course_key))]
  pub async fn assemble_milestone(
    &self,
    subject: &str,
    course_key: &str,
    id: u32,
    prev_topics: &[String],
  ) -> Level {
    match self.generate_milestone(subject, course_key, id, prev_topics).await {
      Ok(level) => {
        info!(target: "generate", %id, source = "generated", "Milestone assembled");
        level
      }
      Err(e) => {
        error!(target: "generate", %id, error = %e, "Generation failed; using fallback milestone");
        fallback_milestone_level(id, course_key, prev_topics)
      }
    }
  }

  /// Generate every level of a course plan, pacing between backend calls.
  /// Milestones review the trailing window of regular topics, then the
  /// window resets for the next section.
  #[instrument(level = "info", skip(self, plan, pacer), fields(course = %plan.key))]
  pub async fn generate_course(&self, plan: &CoursePlan, pacer: &mut Pacer) -> Course {
    let mut levels = Vec::new();
    let mut window: Vec<String> = Vec::new();

    for id in 1..=plan.total_levels {
      pacer.pause().await;

      match LevelKind::for_id(id, MILESTONE_CADENCE) {
        LevelKind::Milestone => {
          let level = self.assemble_milestone(plan.subject(), &plan.key, id, &window).await;
          levels.push(level);
          window.clear();
        }
        LevelKind::Regular => match plan.topic(id) {
          Some(topic) => {
            let level =
              self.assemble_regular(plan.subject(), id, &topic.title, &topic.difficulty).await;
            levels.push(level);
            window.push(topic.title.clone());
          }
          None => {
            warn!(target: "generate", course = %plan.key, %id, "No topic planned for level; skipping");
          }
        },
      }
    }

    Course { name: plan.name.clone(), icon: plan.icon.clone(), levels }
  }

  async fn generate_regular(
    &self,
    subject: &str,
    id: u32,
    topic: &str,
    difficulty: &str,
  ) -> GenResult<Level> {
    let gemini = self.backend()?;
    let prompt = fill_template(
      &self.prompts.regular_template,
      &[
        ("subject", subject),
        ("level", &id.to_string()),
        ("topic", topic),
        ("difficulty", difficulty),
      ],
    );

    let raw = gemini.generate(&prompt).await?;
    let draft: LevelDraft = extract(&raw)?;
    if draft.concepts.is_empty() {
      return Err(GenError::Schema("draft carries no concepts".into()));
    }

    let ctx = TopicContext::new(topic, Some(id));
    let quiz = normalize_quiz(draft.quiz.as_ref(), QUIZ_SIZE, &ctx);

    Ok(Level {
      id,
      title: topic.to_string(),
      description: draft.description.unwrap_or_else(|| format!("Learn {}", topic)),
      icon: draft.icon.unwrap_or_else(|| "📚".to_string()),
      xp: LevelKind::Regular.xp(),
      // Left empty on generation; a curated URL survives via the merge policy.
      video_url: String::new(),
      concepts: draft.concepts,
      quiz: Some(quiz),
      game: None,
      game_manual: None,
      coding: Some(draft.coding.unwrap_or_else(|| default_coding(topic))),
      source: LevelSource::Generated,
    })
  }

  async fn generate_milestone(
    &self,
    subject: &str,
    course_key: &str,
    id: u32,
    prev_topics: &[String],
  ) -> GenResult<Level> {
    let gemini = self.backend()?;
    let topics_covered = prev_topics.join(", ");
    let prompt = fill_template(
      &self.prompts.milestone_template,
      &[("subject", subject), ("level", &id.to_string()), ("topics_covered", &topics_covered)],
    );

    let raw = gemini.generate(&prompt).await?;
    let draft: LevelDraft = extract(&raw)?;

    // Milestone drafts answer with `reviewConcepts`; accept plain `concepts`
    // from models that ignore the key rename.
    let concepts = if !draft.review_concepts.is_empty() {
      draft.review_concepts
    } else {
      draft.concepts
    };
    if concepts.is_empty() {
      return Err(GenError::Schema("milestone draft carries no review concepts".into()));
    }

    Ok(Level {
      id,
      title: draft.title.unwrap_or_else(|| format!("Level {} Challenge", id)),
      description: draft
        .description
        .unwrap_or_else(|| "Review and master previous concepts".into()),
      icon: draft.icon.unwrap_or_else(|| "🎮".to_string()),
      xp: LevelKind::Milestone.xp(),
      video_url: String::new(),
      concepts,
      quiz: None,
      game: Some(format!("{}-level-{}-game", course_key, id)),
      game_manual: Some(
        draft.game_manual.unwrap_or_else(|| format!("🎮 Challenge game for level {}", id)),
      ),
      coding: Some(draft.coding.unwrap_or_else(|| Coding {
        title: format!("Level {} Challenge", id),
        description: "Advanced challenge".into(),
        starter_code: "// Your code here".into(),
      })),
      source: LevelSource::Generated,
    })
  }

  fn backend(&self) -> GenResult<&Gemini> {
    self.gemini.as_ref().ok_or_else(|| GenError::Backend("no API key configured".into()))
  }
}
