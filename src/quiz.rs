//! Quiz normalization: coerce loosely structured model output into a fixed,
//! valid question set.
//!
//! Whatever the model returned, the output guarantees:
//!   - exactly `desired` questions
//!   - question texts pairwise distinct (trimmed, case-insensitive)
//!   - every question has exactly 4 options
//!   - `correct` always indexes a valid option
//!
//! Fallback questions are derived from the topic context alone, so repeated
//! runs over identical input produce identical output.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Question, Quiz};

/// Context used to derive deterministic fallback questions.
#[derive(Clone, Debug)]
pub struct TopicContext {
  pub topic: String,
  pub level_id: Option<u32>,
}

impl TopicContext {
  pub fn new(topic: impl Into<String>, level_id: Option<u32>) -> Self {
    Self { topic: topic.into(), level_id }
  }
}

/// Loosely-typed quiz as the model returns it. Option values and the correct
/// index stay untyped; the normalizer owns all coercion.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QuizDraft {
  #[serde(default)]
  pub questions: Vec<QuestionDraft>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct QuestionDraft {
  #[serde(default)]
  pub question: String,
  #[serde(default)]
  pub options: Vec<Value>,
  #[serde(default)]
  pub correct: Value,
}

/// Normalize `quiz_like` into exactly `desired` well-formed questions.
///
/// Anything that is not a mapping with a `questions` sequence counts as
/// empty. Kept questions preserve their original relative order; fallbacks
/// are appended after them.
pub fn normalize_quiz(quiz_like: Option<&Value>, desired: usize, ctx: &TopicContext) -> Quiz {
  let draft: QuizDraft = quiz_like
    .map(|v| serde_json::from_value(v.clone()).unwrap_or_default())
    .unwrap_or_default();

  let mut seen = HashSet::new();
  let mut questions = Vec::new();

  for q in draft.questions {
    let text = q.question.trim().to_string();
    if text.is_empty() {
      continue;
    }
    // Stable dedup: first occurrence wins.
    if !seen.insert(text.to_lowercase()) {
      continue;
    }

    let mut options: Vec<String> = q.options.iter().map(option_text).collect();
    if options.len() < 4 {
      // Continue the alphabetic sequence from the existing count.
      for i in options.len()..4 {
        options.push(format!("Option {}", (b'A' + i as u8) as char));
      }
    } else {
      options.truncate(4);
    }

    let correct = coerce_correct(&q.correct, options.len());
    questions.push(Question { question: text, options, correct });
  }

  // Top up with fallback questions derived from the topic context.
  let mut fallback_idx = 1usize;
  while questions.len() < desired {
    let text = match ctx.level_id {
      Some(id) => format!("Level {} - {}: fallback question {}", id, ctx.topic, fallback_idx),
      None => format!("{}: fallback question {}", ctx.topic, fallback_idx),
    };
    if seen.insert(text.to_lowercase()) {
      questions.push(Question {
        question: text,
        options: fallback_options(&ctx.topic, fallback_idx),
        correct: 0,
      });
    }
    fallback_idx += 1;
  }

  questions.truncate(desired);
  Quiz { questions }
}

fn option_text(v: &Value) -> String {
  match v {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

/// Coerce `correct` to an integer index; anything unusable or out of range
/// clamps to 0.
fn coerce_correct(v: &Value, option_count: usize) -> usize {
  let idx = match v {
    Value::Number(n) => n.as_i64(),
    Value::String(s) => s.trim().parse::<i64>().ok(),
    _ => None,
  };
  match idx {
    Some(i) if i >= 0 && (i as usize) < option_count => i as usize,
    _ => 0,
  }
}

/// Four topic-referencing options; a numeric suffix disambiguates in the
/// (theoretical) case two of them collide as strings.
fn fallback_options(topic: &str, idx: usize) -> Vec<String> {
  let base = [
    format!("Understand {}", topic),
    format!("Apply {}", topic),
    format!("Example of {}", topic),
    "None of the above".to_string(),
  ];

  let mut seen = HashSet::new();
  let mut out = Vec::with_capacity(4);
  for o in base {
    let o = if seen.contains(&o) { format!("{} ({})", o, idx) } else { o };
    seen.insert(o.clone());
    out.push(o);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn ctx() -> TopicContext {
    TopicContext::new("Linked Lists", Some(3))
  }

  fn assert_well_formed(quiz: &Quiz, desired: usize) {
    assert_eq!(quiz.questions.len(), desired);
    let mut texts = HashSet::new();
    for q in &quiz.questions {
      assert_eq!(q.options.len(), 4, "question {:?} does not have 4 options", q.question);
      assert!(q.correct < 4, "correct index out of range for {:?}", q.question);
      assert!(
        texts.insert(q.question.trim().to_lowercase()),
        "duplicate question text {:?}",
        q.question
      );
    }
  }

  #[test]
  fn empty_input_yields_distinct_topic_fallbacks() {
    let quiz = normalize_quiz(None, 5, &ctx());
    assert_well_formed(&quiz, 5);
    for q in &quiz.questions {
      assert!(q.question.contains("Linked Lists"));
      assert!(q.options.iter().any(|o| o.contains("Linked Lists")));
      assert_eq!(q.correct, 0);
      let unique: HashSet<_> = q.options.iter().collect();
      assert_eq!(unique.len(), 4);
    }
  }

  #[test]
  fn non_mapping_input_counts_as_empty() {
    let arr = json!(["not", "a", "quiz"]);
    let quiz = normalize_quiz(Some(&arr), 5, &ctx());
    assert_well_formed(&quiz, 5);
    assert!(quiz.questions[0].question.starts_with("Level 3 - Linked Lists"));
  }

  #[test]
  fn dedup_is_stable_and_keeps_first_occurrence() {
    let raw = json!({
      "questions": [
        {"question": "Q1?", "options": ["a", "b", "c", "d"], "correct": 1},
        {"question": "Q2?", "options": ["a", "b", "c", "d"], "correct": 0},
        {"question": "Q1?", "options": ["x", "y", "z", "w"], "correct": 3},
        {"question": "Q3?", "options": ["a", "b", "c", "d"], "correct": 2},
        {"question": "Q4?", "options": ["a", "b", "c", "d"], "correct": 0},
        {"question": "Q2?", "options": ["p", "q", "r", "s"], "correct": 1},
        {"question": "Q5?", "options": ["a", "b", "c", "d"], "correct": 3},
      ]
    });
    let quiz = normalize_quiz(Some(&raw), 5, &ctx());
    assert_well_formed(&quiz, 5);
    // 5 unique survive in original order; no fallback injected.
    let texts: Vec<&str> = quiz.questions.iter().map(|q| q.question.as_str()).collect();
    assert_eq!(texts, vec!["Q1?", "Q2?", "Q3?", "Q4?", "Q5?"]);
    // First occurrence wins: Q1 keeps options from its first appearance.
    assert_eq!(quiz.questions[0].options[0], "a");
    assert_eq!(quiz.questions[0].correct, 1);
  }

  #[test]
  fn dedup_ignores_case_and_surrounding_whitespace() {
    let raw = json!({
      "questions": [
        {"question": "  What is a list? ", "options": ["a", "b", "c", "d"], "correct": 0},
        {"question": "what is a LIST?", "options": ["a", "b", "c", "d"], "correct": 0},
      ]
    });
    let quiz = normalize_quiz(Some(&raw), 2, &ctx());
    assert_well_formed(&quiz, 2);
    assert_eq!(quiz.questions[0].question, "What is a list?");
    // Second slot is a fallback, not the duplicate.
    assert!(quiz.questions[1].question.contains("fallback question"));
  }

  #[test]
  fn short_option_lists_pad_with_alphabetic_placeholders() {
    let raw = json!({
      "questions": [{"question": "Pick one", "options": ["A", "B"], "correct": 1}]
    });
    let quiz = normalize_quiz(Some(&raw), 1, &ctx());
    assert_eq!(quiz.questions[0].options, vec!["A", "B", "Option C", "Option D"]);
    assert_eq!(quiz.questions[0].correct, 1);
  }

  #[test]
  fn long_option_lists_truncate_to_first_four() {
    let raw = json!({
      "questions": [{"question": "Pick one", "options": ["a", "b", "c", "d", "e", "f"], "correct": 5}]
    });
    let quiz = normalize_quiz(Some(&raw), 1, &ctx());
    assert_eq!(quiz.questions[0].options, vec!["a", "b", "c", "d"]);
    // 5 indexed past the truncated list: clamp to 0.
    assert_eq!(quiz.questions[0].correct, 0);
  }

  #[test]
  fn out_of_range_correct_clamps_to_zero() {
    let raw = json!({
      "questions": [
        {"question": "Q1", "options": ["a", "b", "c", "d"], "correct": 7},
        {"question": "Q2", "options": ["a", "b", "c", "d"], "correct": -1},
        {"question": "Q3", "options": ["a", "b", "c", "d"], "correct": "2"},
        {"question": "Q4", "options": ["a", "b", "c", "d"], "correct": "nope"},
        {"question": "Q5", "options": ["a", "b", "c", "d"], "correct": null},
      ]
    });
    let quiz = normalize_quiz(Some(&raw), 5, &ctx());
    let corrects: Vec<usize> = quiz.questions.iter().map(|q| q.correct).collect();
    assert_eq!(corrects, vec![0, 0, 2, 0, 0]);
  }

  #[test]
  fn blank_questions_are_skipped() {
    let raw = json!({
      "questions": [
        {"question": "   ", "options": ["a", "b", "c", "d"], "correct": 0},
        {"question": "Real question", "options": ["a", "b", "c", "d"], "correct": 0},
      ]
    });
    let quiz = normalize_quiz(Some(&raw), 2, &ctx());
    assert_eq!(quiz.questions[0].question, "Real question");
    assert!(quiz.questions[1].question.contains("fallback question"));
  }

  #[test]
  fn non_string_options_are_stringified() {
    let raw = json!({
      "questions": [{"question": "Mixed", "options": [1, true, "three"], "correct": 0}]
    });
    let quiz = normalize_quiz(Some(&raw), 1, &ctx());
    assert_eq!(quiz.questions[0].options, vec!["1", "true", "three", "Option D"]);
  }

  #[test]
  fn surplus_unique_questions_truncate_in_order() {
    let questions: Vec<Value> = (1..=8)
      .map(|i| json!({"question": format!("Q{i}"), "options": ["a", "b", "c", "d"], "correct": 0}))
      .collect();
    let quiz = normalize_quiz(Some(&json!({ "questions": questions })), 5, &ctx());
    let texts: Vec<&str> = quiz.questions.iter().map(|q| q.question.as_str()).collect();
    assert_eq!(texts, vec!["Q1", "Q2", "Q3", "Q4", "Q5"]);
  }

  #[test]
  fn normalization_is_deterministic() {
    let raw = json!({
      "questions": [{"question": "Only one", "options": ["a"], "correct": "1"}]
    });
    let a = normalize_quiz(Some(&raw), 5, &ctx());
    let b = normalize_quiz(Some(&raw), 5, &ctx());
    assert_eq!(a, b);
  }

  #[test]
  fn normalization_is_idempotent() {
    let raw = json!({
      "questions": [
        {"question": "Q1", "options": ["a", "b"], "correct": 9},
        {"question": "Q1", "options": ["a", "b"], "correct": 9},
      ]
    });
    let once = normalize_quiz(Some(&raw), 5, &ctx());
    let again = normalize_quiz(Some(&serde_json::to_value(&once).unwrap()), 5, &ctx());
    assert_eq!(once, again);
  }

  #[test]
  fn fallback_text_embeds_level_and_topic() {
    let quiz = normalize_quiz(None, 1, &TopicContext::new("Heaps", Some(17)));
    assert_eq!(quiz.questions[0].question, "Level 17 - Heaps: fallback question 1");

    let quiz = normalize_quiz(None, 1, &TopicContext::new("Heaps", None));
    assert_eq!(quiz.questions[0].question, "Heaps: fallback question 1");
  }

  #[test]
  fn fallback_skips_texts_already_present() {
    let raw = json!({
      "questions": [
        {"question": "Level 3 - Linked Lists: fallback question 1", "options": ["a", "b", "c", "d"], "correct": 0},
      ]
    });
    let quiz = normalize_quiz(Some(&raw), 3, &ctx());
    assert_well_formed(&quiz, 3);
    assert_eq!(quiz.questions[1].question, "Level 3 - Linked Lists: fallback question 2");
    assert_eq!(quiz.questions[2].question, "Level 3 - Linked Lists: fallback question 3");
  }
}
