//! Domain models for the course catalog: levels, quizzes, concepts, courses.
//!
//! Serde renames mirror the persisted JSON schema (`videoUrl`, `gameManual`,
//! `starterCode`); optional fields are skipped on write so regular levels
//! (quiz) and milestone levels (game + gameManual) keep their distinct shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every observed course layout places a milestone on multiples of 5.
pub const MILESTONE_CADENCE: u32 = 5;
/// XP reward is fixed by level kind.
pub const REGULAR_XP: u32 = 100;
pub const MILESTONE_XP: u32 = 200;
/// Regular quizzes always normalize to this many questions.
pub const QUIZ_SIZE: usize = 5;

/// Structural shape of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelKind {
  /// Concepts + quiz + coding exercise.
  Regular,
  /// Periodic review: game + gameManual + coding, no quiz.
  Milestone,
}

impl LevelKind {
  /// A level id is a milestone iff it falls on the cadence.
  pub fn for_id(id: u32, cadence: u32) -> Self {
    if cadence > 0 && id % cadence == 0 {
      LevelKind::Milestone
    } else {
      LevelKind::Regular
    }
  }

  pub fn xp(self) -> u32 {
    match self {
      LevelKind::Regular => REGULAR_XP,
      LevelKind::Milestone => MILESTONE_XP,
    }
  }
}

/// Where did a level's content come from? Not persisted; used for logging
/// and the end-of-run summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelSource {
  Generated,
  Fallback,
}

impl Default for LevelSource {
  fn default() -> Self {
    LevelSource::Fallback
  }
}

/// One explanatory unit inside a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Concept {
  pub title: String,
  pub content: String,
  pub example: String,
}

impl Default for Concept {
  fn default() -> Self {
    Concept { title: String::new(), content: String::new(), example: String::new() }
  }
}

/// A fully normalized quiz question: exactly 4 options, `correct` in range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Question {
  pub question: String,
  pub options: Vec<String>,
  pub correct: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
  pub questions: Vec<Question>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coding {
  pub title: String,
  pub description: String,
  #[serde(rename = "starterCode")]
  pub starter_code: String,
}

impl Default for Coding {
  fn default() -> Self {
    Coding { title: String::new(), description: String::new(), starter_code: String::new() }
  }
}

/// One unit of course content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
  pub id: u32,
  pub title: String,
  pub description: String,
  pub icon: String,
  pub xp: u32,
  #[serde(rename = "videoUrl", default)]
  pub video_url: String,
  pub concepts: Vec<Concept>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub quiz: Option<Quiz>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub game: Option<String>,
  #[serde(rename = "gameManual", default, skip_serializing_if = "Option::is_none")]
  pub game_manual: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub coding: Option<Coding>,
  #[serde(skip)]
  pub source: LevelSource,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct Course {
  pub name: String,
  pub icon: String,
  pub levels: Vec<Level>,
}

/// The durable artifact: everything the pipeline reads and rewrites.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct Catalog {
  pub courses: BTreeMap<String, Course>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn minimal_level(id: u32) -> Level {
    Level {
      id,
      title: "Arrays".into(),
      description: "Learn Arrays".into(),
      icon: "📚".into(),
      xp: LevelKind::for_id(id, MILESTONE_CADENCE).xp(),
      video_url: String::new(),
      concepts: vec![],
      quiz: None,
      game: None,
      game_manual: None,
      coding: None,
      source: LevelSource::Fallback,
    }
  }

  #[test]
  fn milestone_cadence_rule() {
    assert_eq!(LevelKind::for_id(5, MILESTONE_CADENCE), LevelKind::Milestone);
    assert_eq!(LevelKind::for_id(10, MILESTONE_CADENCE), LevelKind::Milestone);
    assert_eq!(LevelKind::for_id(20, MILESTONE_CADENCE), LevelKind::Milestone);
    assert_eq!(LevelKind::for_id(1, MILESTONE_CADENCE), LevelKind::Regular);
    assert_eq!(LevelKind::for_id(4, MILESTONE_CADENCE), LevelKind::Regular);
    assert_eq!(LevelKind::for_id(6, MILESTONE_CADENCE), LevelKind::Regular);
  }

  #[test]
  fn xp_is_fixed_by_kind() {
    assert_eq!(LevelKind::Regular.xp(), 100);
    assert_eq!(LevelKind::Milestone.xp(), 200);
  }

  #[test]
  fn regular_level_serializes_without_milestone_fields() {
    let mut level = minimal_level(2);
    level.quiz = Some(Quiz {
      questions: vec![Question {
        question: "What is an array?".into(),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct: 0,
      }],
    });

    let v = serde_json::to_value(&level).unwrap();
    assert_eq!(v["videoUrl"], "");
    assert!(v.get("quiz").is_some());
    assert!(v.get("game").is_none());
    assert!(v.get("gameManual").is_none());
    assert!(v.get("source").is_none());
  }

  #[test]
  fn milestone_level_serializes_without_quiz() {
    let mut level = minimal_level(5);
    level.game = Some("dsa-level-5-game".into());
    level.game_manual = Some("🎮 Challenge game for level 5".into());

    let v = serde_json::to_value(&level).unwrap();
    assert!(v.get("quiz").is_none());
    assert_eq!(v["game"], "dsa-level-5-game");
    assert_eq!(v["gameManual"], "🎮 Challenge game for level 5");
  }

  #[test]
  fn level_round_trips_through_json() {
    let mut level = minimal_level(3);
    level.coding = Some(Coding {
      title: "Arrays Challenge".into(),
      description: "Implement the solution".into(),
      starter_code: "// Your code here".into(),
    });

    let text = serde_json::to_string(&level).unwrap();
    assert!(text.contains("starterCode"));
    let back: Level = serde_json::from_str(&text).unwrap();
    assert_eq!(back, level);
  }
}
