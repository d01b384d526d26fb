//! Per-question grading strategies.
//!
//! One grading function per question type, dispatched on the question body
//! variant. Grading never fails past this boundary: an unrecognized type
//! yields an error-flavored [`QuestionResult`] with zero points.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keyterms::KeyTermExtractor;
use crate::model::{AnswerValue, Question, QuestionBody, QuestionKind};
use crate::similarity;

/// Minimum similarity ratio for fill-in-blank partial credit.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;
/// Fraction of max points awarded for a near-miss fill-in-blank answer.
const PARTIAL_CREDIT: f64 = 0.8;
/// Weight of the similarity ratio in the short-answer combined score.
const SIMILARITY_WEIGHT: f64 = 0.6;
/// Weight of key-term overlap in the short-answer combined score.
const TERM_WEIGHT: f64 = 0.4;
/// Combined score at or above which a short answer counts as correct.
const COMBINED_THRESHOLD: f64 = 0.5;

/// Question type as recorded on a grading outcome. Mirrors
/// [`QuestionKind`] plus the dedicated error variant for questions that
/// could not be graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    MultipleChoice,
    TrueFalse,
    FillInBlank,
    ShortAnswer,
    Error,
}

impl From<QuestionKind> for ResultKind {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::MultipleChoice => ResultKind::MultipleChoice,
            QuestionKind::TrueFalse => ResultKind::TrueFalse,
            QuestionKind::FillInBlank => ResultKind::FillInBlank,
            QuestionKind::ShortAnswer => ResultKind::ShortAnswer,
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKind::MultipleChoice => write!(f, "multiple_choice"),
            ResultKind::TrueFalse => write!(f, "true_false"),
            ResultKind::FillInBlank => write!(f, "fill_in_blank"),
            ResultKind::ShortAnswer => write!(f, "short_answer"),
            ResultKind::Error => write!(f, "error"),
        }
    }
}

/// Grading outcome for one question. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub question_type: ResultKind,
    /// Echo of the question prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Echo of the submitted value; `None` when no answer was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<AnswerValue>,
    /// Echo of the correct answer (absent for short-answer questions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<AnswerValue>,
    /// Echo of the sample answer (short-answer questions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_answer: Option<String>,
    pub is_correct: bool,
    pub points_earned: u32,
    pub max_points: u32,
    /// Similarity ratio, recorded by the text-graded types (2 decimals).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    pub feedback: String,
    #[serde(default)]
    pub explanation: String,
    /// Populated when the question could not be graded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Grades a single question against a submitted answer.
#[derive(Debug, Clone, Default)]
pub struct QuestionGrader {
    extractor: KeyTermExtractor,
}

impl QuestionGrader {
    pub fn new() -> Self {
        Self {
            extractor: KeyTermExtractor::new(),
        }
    }

    /// Grade `question` against the submitted `answer`.
    ///
    /// A missing answer (`None`) is handled per type: binary types score
    /// zero, text types grade the empty string. Unknown question types
    /// produce an error-flavored result rather than a fault.
    pub fn grade(&self, question: &Question, answer: Option<&AnswerValue>) -> QuestionResult {
        match &question.body {
            QuestionBody::MultipleChoice { correct_answer, .. } => {
                self.grade_multiple_choice(question, answer, *correct_answer)
            }
            QuestionBody::TrueFalse { correct_answer } => {
                self.grade_true_false(question, answer, *correct_answer)
            }
            QuestionBody::FillInBlank { correct_answer } => {
                self.grade_fill_in_blank(question, answer, correct_answer)
            }
            QuestionBody::ShortAnswer { sample_answer } => {
                self.grade_short_answer(question, answer, sample_answer)
            }
            QuestionBody::Unknown => {
                tracing::error!(
                    question_id = %question.question_id,
                    "cannot grade question with unknown type"
                );
                error_result(&question.question_id, "unknown question type", question.points)
            }
        }
    }

    fn grade_multiple_choice(
        &self,
        question: &Question,
        answer: Option<&AnswerValue>,
        correct: usize,
    ) -> QuestionResult {
        let is_correct =
            matches!(answer, Some(AnswerValue::Index(i)) if *i as usize == correct);

        QuestionResult {
            question_id: question.question_id.clone(),
            question_type: ResultKind::MultipleChoice,
            question: Some(question.prompt.clone()),
            user_answer: answer.cloned(),
            correct_answer: Some(AnswerValue::Index(correct as u64)),
            sample_answer: None,
            is_correct,
            points_earned: if is_correct { question.points } else { 0 },
            max_points: question.points,
            similarity_score: None,
            feedback: feedback(&question.explanation, is_correct),
            explanation: question.explanation.clone(),
            error: None,
        }
    }

    fn grade_true_false(
        &self,
        question: &Question,
        answer: Option<&AnswerValue>,
        correct: bool,
    ) -> QuestionResult {
        let is_correct = matches!(answer, Some(AnswerValue::Bool(b)) if *b == correct);

        QuestionResult {
            question_id: question.question_id.clone(),
            question_type: ResultKind::TrueFalse,
            question: Some(question.prompt.clone()),
            user_answer: answer.cloned(),
            correct_answer: Some(AnswerValue::Bool(correct)),
            sample_answer: None,
            is_correct,
            points_earned: if is_correct { question.points } else { 0 },
            max_points: question.points,
            similarity_score: None,
            feedback: feedback(&question.explanation, is_correct),
            explanation: question.explanation.clone(),
            error: None,
        }
    }

    fn grade_fill_in_blank(
        &self,
        question: &Question,
        answer: Option<&AnswerValue>,
        correct: &str,
    ) -> QuestionResult {
        let correct_clean = correct.trim().to_lowercase();
        let user_clean = answer
            .map(|a| a.as_text())
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let is_exact = user_clean == correct_clean;
        let ratio = similarity::ratio(&user_clean, &correct_clean);
        let is_similar = ratio >= SIMILARITY_THRESHOLD;
        let is_correct = is_exact || is_similar;

        let points_earned = if is_exact {
            question.points
        } else if is_similar {
            (question.points as f64 * PARTIAL_CREDIT).floor() as u32
        } else {
            0
        };

        QuestionResult {
            question_id: question.question_id.clone(),
            question_type: ResultKind::FillInBlank,
            question: Some(question.prompt.clone()),
            user_answer: answer.cloned(),
            correct_answer: Some(AnswerValue::Text(correct.to_string())),
            sample_answer: None,
            is_correct,
            points_earned,
            max_points: question.points,
            similarity_score: Some(round2(ratio)),
            feedback: feedback(&question.explanation, is_correct),
            explanation: question.explanation.clone(),
            error: None,
        }
    }

    fn grade_short_answer(
        &self,
        question: &Question,
        answer: Option<&AnswerValue>,
        sample: &str,
    ) -> QuestionResult {
        let sample_clean = sample.trim().to_lowercase();
        let user_clean = answer
            .map(|a| a.as_text())
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let (is_correct, points_earned, ratio) = if user_clean.is_empty() {
            (false, 0, 0.0)
        } else {
            let ratio = similarity::ratio(&user_clean, &sample_clean);

            let key_terms = self.extractor.extract_key_terms(&sample_clean);
            // term_score stays 0 when the sample yields no key terms; the
            // combined weighting is not redistributed in that case
            let term_score = if key_terms.is_empty() {
                0.0
            } else {
                let matched = key_terms
                    .iter()
                    .filter(|term| user_clean.contains(term.as_str()))
                    .count();
                matched as f64 / key_terms.len() as f64
            };

            let combined = ratio * SIMILARITY_WEIGHT + term_score * TERM_WEIGHT;
            let is_correct = combined >= COMBINED_THRESHOLD;
            let points = (question.points as f64 * combined).floor() as u32;
            (is_correct, points, ratio)
        };

        QuestionResult {
            question_id: question.question_id.clone(),
            question_type: ResultKind::ShortAnswer,
            question: Some(question.prompt.clone()),
            user_answer: answer.cloned(),
            correct_answer: None,
            sample_answer: Some(sample.to_string()),
            is_correct,
            points_earned,
            max_points: question.points,
            similarity_score: Some(round2(ratio)),
            feedback: feedback(&question.explanation, is_correct),
            explanation: question.explanation.clone(),
            error: None,
        }
    }
}

/// Error-flavored result for a question that could not be graded.
pub(crate) fn error_result(question_id: &str, message: &str, max_points: u32) -> QuestionResult {
    QuestionResult {
        question_id: question_id.to_string(),
        question_type: ResultKind::Error,
        question: None,
        user_answer: None,
        correct_answer: None,
        sample_answer: None,
        is_correct: false,
        points_earned: 0,
        max_points,
        similarity_score: None,
        feedback: "There was an error evaluating this question.".to_string(),
        explanation: String::new(),
        error: Some(message.to_string()),
    }
}

fn feedback(explanation: &str, is_correct: bool) -> String {
    if is_correct {
        "Excellent! Your answer is correct.".to_string()
    } else if explanation.is_empty() {
        "Not quite right. Please review the material and try again.".to_string()
    } else {
        format!("Not quite right. {explanation}")
    }
}

/// Round to two decimal places for document fields.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
