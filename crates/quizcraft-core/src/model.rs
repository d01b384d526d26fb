//! Core data model types for quizcraft.
//!
//! These are the fundamental types the entire system uses to represent
//! quizzes, questions, and submitted answers. Both the Quiz and the
//! evaluation documents round-trip losslessly through JSON, which is the
//! interchange contract with persistence and HTTP collaborators.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A complete quiz document. Created by the assembler; immutable once
/// returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique identifier for this quiz.
    pub quiz_id: String,
    /// Subject name (e.g. "Science").
    pub subject: String,
    /// Specific topic (e.g. "Photosynthesis").
    pub topic: String,
    /// Difficulty level (easy/medium/hard).
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    /// Number of questions in the quiz.
    #[serde(default)]
    pub total_questions: usize,
    /// Estimated completion time in minutes (2 per question).
    #[serde(default)]
    pub estimated_time: u32,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Scoring policy used by the scorer.
    #[serde(default)]
    pub scoring: ScoringPolicy,
    /// Generation metadata.
    #[serde(default)]
    pub metadata: QuizMetadata,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

impl Quiz {
    /// Save the quiz as pretty JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize quiz")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write quiz to {}", path.display()))?;
        Ok(())
    }

    /// Load a quiz from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read quiz from {}", path.display()))?;
        let quiz: Quiz = serde_json::from_str(&content).context("failed to parse quiz JSON")?;
        Ok(quiz)
    }
}

/// How a quiz is scored. Zero fields mean "unspecified" and fall back to the
/// scorer's defaults (10 points per question, 60% to pass).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Maximum attainable points.
    #[serde(default)]
    pub total_points: u32,
    /// Points needed to pass.
    #[serde(default)]
    pub passing_score: u32,
    /// Points per question.
    #[serde(default)]
    pub points_per_question: u32,
}

/// Metadata attached to a generated quiz.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizMetadata {
    /// RFC 3339 generation timestamp.
    #[serde(default)]
    pub generated_at: String,
    /// Length of the source lesson content in characters.
    #[serde(default)]
    pub content_length: usize,
    /// Number of key concepts extracted from the content.
    #[serde(default)]
    pub key_concepts_count: usize,
    /// Distinct question types present in the quiz.
    #[serde(default)]
    pub question_types_used: Vec<String>,
    /// True when the deterministic fallback generator produced this quiz.
    #[serde(default)]
    pub fallback_mode: bool,
}

/// A single quiz question. The `type` tag in JSON selects the body variant,
/// which in turn determines which answer fields are populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the quiz (e.g. "q_1").
    pub question_id: String,
    /// The question text shown to the user.
    #[serde(rename = "question")]
    pub prompt: String,
    /// Type-specific fields, tagged by `type`.
    #[serde(flatten)]
    pub body: QuestionBody,
    /// Explanation shown in feedback for wrong answers.
    #[serde(default)]
    pub explanation: String,
    /// Point value of this question.
    #[serde(default = "default_points")]
    pub points: u32,
}

fn default_points() -> u32 {
    10
}

/// Type-specific question payload.
///
/// Unrecognized `type` tags deserialize to [`QuestionBody::Unknown`] so that
/// a malformed document still parses; the grader rejects the question with an
/// error-flavored result instead of the model rejecting the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionBody {
    MultipleChoice {
        options: Vec<String>,
        /// Index into `options` of the correct choice.
        correct_answer: usize,
    },
    TrueFalse {
        correct_answer: bool,
    },
    FillInBlank {
        /// Canonical answer string.
        correct_answer: String,
    },
    ShortAnswer {
        /// Sample answer graded against by similarity and term overlap.
        sample_answer: String,
    },
    #[serde(other)]
    Unknown,
}

impl QuestionBody {
    /// The question kind, or `None` for unrecognized types.
    pub fn kind(&self) -> Option<QuestionKind> {
        match self {
            QuestionBody::MultipleChoice { .. } => Some(QuestionKind::MultipleChoice),
            QuestionBody::TrueFalse { .. } => Some(QuestionKind::TrueFalse),
            QuestionBody::FillInBlank { .. } => Some(QuestionKind::FillInBlank),
            QuestionBody::ShortAnswer { .. } => Some(QuestionKind::ShortAnswer),
            QuestionBody::Unknown => None,
        }
    }
}

/// The four supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    FillInBlank,
    ShortAnswer,
}

impl QuestionKind {
    /// All supported kinds, in canonical order.
    pub const ALL: [QuestionKind; 4] = [
        QuestionKind::MultipleChoice,
        QuestionKind::TrueFalse,
        QuestionKind::FillInBlank,
        QuestionKind::ShortAnswer,
    ];
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "multiple_choice"),
            QuestionKind::TrueFalse => write!(f, "true_false"),
            QuestionKind::FillInBlank => write!(f, "fill_in_blank"),
            QuestionKind::ShortAnswer => write!(f, "short_answer"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple_choice" | "mc" => Ok(QuestionKind::MultipleChoice),
            "true_false" | "tf" => Ok(QuestionKind::TrueFalse),
            "fill_in_blank" | "fib" => Ok(QuestionKind::FillInBlank),
            "short_answer" | "sa" => Ok(QuestionKind::ShortAnswer),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A raw user-submitted answer value. The JSON type varies by question type:
/// an option index for multiple choice, a boolean for true/false, and a
/// string for fill-in-blank and short answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Index(u64),
    Text(String),
}

impl AnswerValue {
    /// String rendition used by the text-graded question types.
    pub fn as_text(&self) -> String {
        match self {
            AnswerValue::Bool(b) => b.to_string(),
            AnswerValue::Index(i) => i.to_string(),
            AnswerValue::Text(s) => s.clone(),
        }
    }
}

/// Mapping from question identifier to the raw submitted value.
pub type SubmissionAnswers = HashMap<String, AnswerValue>;

/// Timestamp-formatted identifier (`{prefix}_{YYYYmmdd_HHMMSS}`).
///
/// Uniqueness beyond this formatting is owned by collaborators; within one
/// generated quiz, question identifiers are sequential and distinct.
pub(crate) fn timestamp_id(prefix: &str) -> String {
    format!("{prefix}_{}", Utc::now().format("%Y%m%d_%H%M%S"))
}
