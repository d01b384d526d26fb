//! Advisory quiz document validation.
//!
//! Warnings only: the grader and scorer still accept flawed documents and
//! degrade per question, so validation exists for authoring and debugging,
//! not as a gate.

use std::collections::HashSet;

use crate::model::{QuestionBody, Quiz};

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID, when the warning concerns a single question.
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a quiz document for common issues.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for question in &quiz.questions {
        if !seen_ids.insert(&question.question_id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.question_id.clone()),
                message: format!("duplicate question ID: {}", question.question_id),
            });
        }
    }

    for question in &quiz.questions {
        if question.prompt.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.question_id.clone()),
                message: "question text is empty".into(),
            });
        }
    }

    for question in &quiz.questions {
        match &question.body {
            QuestionBody::MultipleChoice {
                options,
                correct_answer,
            } => {
                if options.is_empty() {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.question_id.clone()),
                        message: "multiple choice question has no options".into(),
                    });
                } else if *correct_answer >= options.len() {
                    warnings.push(ValidationWarning {
                        question_id: Some(question.question_id.clone()),
                        message: format!(
                            "correct_answer index {} is out of range for {} options",
                            correct_answer,
                            options.len()
                        ),
                    });
                }
            }
            QuestionBody::Unknown => {
                warnings.push(ValidationWarning {
                    question_id: Some(question.question_id.clone()),
                    message: "unrecognized question type will grade as an error".into(),
                });
            }
            _ => {}
        }
    }

    let points_sum: u32 = quiz.questions.iter().map(|q| q.points).sum();
    if quiz.scoring.total_points > 0 && quiz.scoring.total_points != points_sum {
        warnings.push(ValidationWarning {
            question_id: None,
            message: format!(
                "scoring.total_points is {} but question points sum to {points_sum}",
                quiz.scoring.total_points
            ),
        });
    }

    warnings
}
