//! Error types for the generation and evaluation pipelines.
//!
//! Neither error ever escapes the public entry points: generation failures
//! degrade to the deterministic fallback quiz, and evaluation failures
//! degrade to an error-flavored evaluation result. The types exist so the
//! degrade paths are explicit `Err` branches instead of catch-alls.

use thiserror::Error;

/// A failure of the whole quiz-generation pipeline.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The requested question-type pool was empty, so no slot can draw a
    /// type.
    #[error("no question types requested")]
    EmptyTypePool,
}

/// A failure of the whole submission-evaluation pipeline.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The quiz document did not parse as a quiz.
    #[error("malformed quiz document: {0}")]
    MalformedQuiz(#[source] serde_json::Error),

    /// The answers document did not parse as an answer map.
    #[error("malformed answers document: {0}")]
    MalformedAnswers(#[source] serde_json::Error),
}
