//! Configuration: environment-sourced backend settings plus an optional TOML
//! overlay (prompts, generation parameters, pacing, course plans).
//!
//! Everything has working defaults; the only secret (GEMINI_API_KEY) comes
//! from the environment and is never read from a file or hard-coded.

use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_ENDPOINT: &str =
  "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-exp:generateContent";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Backend client settings. `api_key == None` disables live generation and
/// the pipeline runs on fallback content alone.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
  pub api_key: Option<String>,
  pub endpoint: String,
  pub timeout_secs: u64,
  pub params: GenerationParams,
}

impl GeminiConfig {
  pub fn from_env() -> Self {
    Self {
      api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
      endpoint: std::env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
      timeout_secs: std::env::var("GEMINI_TIMEOUT_SECS")
        .ok()
        .and_then(|t| t.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS),
      params: GenerationParams::default(),
    }
  }
}

/// Sampling parameters sent with every request. Configuration, not logic.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
  pub temperature: f32,
  pub top_k: u32,
  pub top_p: f32,
  pub max_output_tokens: u32,
}

impl Default for GenerationParams {
  fn default() -> Self {
    Self { temperature: 0.7, top_k: 40, top_p: 0.95, max_output_tokens: 2048 }
  }
}

/// Prompt templates used by the level assembler. Placeholders: `{subject}`,
/// `{level}`, `{topic}`, `{difficulty}`, `{topics_covered}`. Override in TOML
/// to tune tone or structure; both must keep demanding strict JSON.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub regular_template: String,
  pub milestone_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      regular_template: r#"You are an expert educational content creator for "{subject}". Generate comprehensive learning content for:

**Level {level}: {topic}** (Difficulty: {difficulty})

Generate a JSON response with the following structure:

{
    "description": "Brief 1-sentence description of this topic",
    "icon": "Single emoji that represents this topic",
    "concepts": [
        {
            "title": "Main concept name",
            "content": "Detailed explanation (2-3 sentences) with technical accuracy",
            "example": "Code example or pseudocode demonstrating the concept"
        },
        {
            "title": "Second concept name",
            "content": "Detailed explanation (2-3 sentences)",
            "example": "Code example"
        }
    ],
    "quiz": {
        "questions": [
            {
                "question": "Technical question about the concept",
                "options": ["Option A", "Option B", "Option C", "Option D"],
                "correct": 0
            }
        ]
    },
    "coding": {
        "title": "Coding challenge title",
        "description": "What the student needs to implement",
        "starterCode": "// Starter code template with comments\nfunction solution() {\n  // Your code here\n}"
    }
}

Requirements:
1. **Concepts**: Provide 2 key concepts with clear explanations and code examples
2. **Quiz**: Generate 5 challenging multiple-choice questions with correct answer index (0-3)
3. **Coding**: Create a practical coding challenge with starter code template

Return ONLY valid JSON, no markdown formatting or extra text."#
        .into(),
      milestone_template: r#"You are an expert educational content creator for "{subject}". Generate a MILESTONE REVIEW level:

**Level {level}: Milestone Challenge**

This level reviews concepts from previous levels: {topics_covered}

Generate a JSON response with the following structure:

{
    "title": "Creative title for this milestone challenge (e.g., 'Stack & Queue Mastery Challenge')",
    "description": "Brief description emphasizing this is a review and challenge level",
    "icon": "🎮",
    "reviewConcepts": [
        {
            "title": "Key concept from previous levels",
            "content": "Brief review summary (1-2 sentences)",
            "example": "Quick code example"
        },
        {
            "title": "Another key concept",
            "content": "Brief review summary",
            "example": "Quick code example"
        }
    ],
    "gameManual": "🎮 Game: Detailed description of an interactive game/simulation that tests understanding of the previous concepts. Be creative and specific about game mechanics.",
    "coding": {
        "title": "Advanced coding challenge title",
        "description": "Complex problem that combines multiple concepts from previous levels",
        "starterCode": "// Starter code template\nfunction solution() {\n  // Your code here\n}"
    }
}

Requirements:
1. **Title**: Creative, engaging title for the milestone
2. **Review Concepts**: 2-3 key concepts from previous levels
3. **Game Manual**: Detailed, creative game description that tests previous concepts
4. **Coding**: Advanced challenge combining multiple concepts

Return ONLY valid JSON, no markdown formatting or extra text."#
        .into(),
    }
  }
}

/// One planned (regular) topic. Milestone slots carry no planned topic; their
/// titles come from generation or fallback.
#[derive(Clone, Debug, Deserialize)]
pub struct TopicPlan {
  pub id: u32,
  pub title: String,
  pub difficulty: String,
}

/// One course plan: catalog key, display metadata, and the regular topics by
/// level id. Ids on the milestone cadence are generated as review levels.
#[derive(Clone, Debug, Deserialize)]
pub struct CoursePlan {
  pub key: String,
  pub name: String,
  pub icon: String,
  /// Short subject tag used in prompts ("DSA"); display name when empty.
  #[serde(default)]
  pub subject: String,
  #[serde(default = "default_total_levels")]
  pub total_levels: u32,
  pub topics: Vec<TopicPlan>,
}

fn default_total_levels() -> u32 {
  20
}

impl CoursePlan {
  pub fn subject(&self) -> &str {
    if self.subject.is_empty() { &self.name } else { &self.subject }
  }

  pub fn topic(&self, id: u32) -> Option<&TopicPlan> {
    self.topics.iter().find(|t| t.id == id)
  }
}

/// TOML root. Any subset may be present; missing sections keep defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
  pub prompts: Prompts,
  pub generation: GenerationParams,
  pub pacing_secs: u64,
  pub catalog_path: String,
  pub courses: Vec<CoursePlan>,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self {
      prompts: Prompts::default(),
      generation: GenerationParams::default(),
      pacing_secs: 2,
      catalog_path: "data/courses-config.json".into(),
      courses: default_course_plans(),
    }
  }
}

/// Load `GeneratorConfig` from COURSEFORGE_CONFIG_PATH. On any parsing/IO
/// error, the built-in defaults are used. CATALOG_PATH overrides either way.
pub fn load_generator_config() -> GeneratorConfig {
  let mut cfg = match std::env::var("COURSEFORGE_CONFIG_PATH") {
    Ok(path) => match std::fs::read_to_string(&path) {
      Ok(s) => match toml::from_str::<GeneratorConfig>(&s) {
        Ok(cfg) => {
          info!(target: "courseforge", %path, "Loaded generator config (TOML)");
          cfg
        }
        Err(e) => {
          error!(target: "courseforge", %path, error = %e, "Failed to parse TOML config; using defaults");
          GeneratorConfig::default()
        }
      },
      Err(e) => {
        error!(target: "courseforge", %path, error = %e, "Failed to read TOML config file; using defaults");
        GeneratorConfig::default()
      }
    },
    Err(_) => GeneratorConfig::default(),
  };

  if let Ok(path) = std::env::var("CATALOG_PATH") {
    if !path.is_empty() {
      cfg.catalog_path = path;
    }
  }
  cfg
}

/// Built-in plans for the two shipped courses.
pub fn default_course_plans() -> Vec<CoursePlan> {
  let topic = |id: u32, title: &str, difficulty: &str| TopicPlan {
    id,
    title: title.into(),
    difficulty: difficulty.into(),
  };

  vec![
    CoursePlan {
      key: "dsa".into(),
      name: "Data Structures & Algorithms".into(),
      icon: "🧮".into(),
      subject: "DSA".into(),
      total_levels: 20,
      topics: vec![
        topic(1, "Introduction to DSA", "beginner"),
        topic(2, "Arrays", "beginner"),
        topic(3, "Linked Lists", "beginner"),
        topic(4, "Stacks & Queues", "beginner"),
        // 5 is a milestone
        topic(6, "Trees", "intermediate"),
        topic(7, "Tree Traversals", "intermediate"),
        topic(8, "Binary Search Trees", "intermediate"),
        topic(9, "AVL Trees", "advanced"),
        // 10 is a milestone
        topic(11, "Graphs", "intermediate"),
        topic(12, "BFS & DFS", "intermediate"),
        topic(13, "Dijkstra's Algorithm", "advanced"),
        topic(14, "Minimum Spanning Tree", "advanced"),
        // 15 is a milestone
        topic(16, "Hashing", "intermediate"),
        topic(17, "Heaps", "intermediate"),
        topic(18, "Dynamic Programming", "advanced"),
        topic(19, "Greedy Algorithms", "advanced"),
        // 20 is the final milestone
      ],
    },
    CoursePlan {
      key: "os".into(),
      name: "Operating Systems".into(),
      icon: "💻".into(),
      subject: "OS".into(),
      total_levels: 20,
      topics: vec![
        topic(1, "Introduction to OS", "beginner"),
        topic(2, "Process Management", "beginner"),
        topic(3, "CPU Scheduling", "intermediate"),
        topic(4, "Process Synchronization", "intermediate"),
        topic(6, "Memory Management", "intermediate"),
        topic(7, "Paging", "intermediate"),
        topic(8, "Segmentation", "intermediate"),
        topic(9, "Virtual Memory", "advanced"),
        topic(11, "Deadlock", "intermediate"),
        topic(12, "Deadlock Prevention", "intermediate"),
        topic(13, "File Systems", "intermediate"),
        topic(14, "Disk Scheduling", "intermediate"),
        topic(16, "I/O Systems", "intermediate"),
        topic(17, "Protection & Security", "advanced"),
        topic(18, "Distributed Systems", "advanced"),
        topic(19, "Real-Time Systems", "advanced"),
      ],
    },
  ]
}
