//! quizcraft-core — quiz grading and content-derived quiz synthesis.
//!
//! Two independent pipelines share the leaf text utilities:
//!
//! - build phase: [`assembler::QuizAssembler`] → [`synthesizer`] →
//!   [`keyterms::KeyTermExtractor`]
//! - grading phase: [`scorer::QuizScorer`] → [`grader::QuestionGrader`] →
//!   [`similarity`] / [`keyterms`]
//!
//! The quiz document produced by the assembler is the sole contract the
//! scorer depends on. Everything is synchronous and stateless per call; the
//! document-level entry points below never raise, they degrade to fallback
//! or error-flavored result documents.

pub mod assembler;
pub mod error;
pub mod grader;
pub mod keyterms;
pub mod model;
pub mod scorer;
pub mod similarity;
pub mod synthesizer;
pub mod validate;

pub use assembler::{QuizAssembler, QuizRequest};
pub use model::{AnswerValue, Question, QuestionBody, QuestionKind, Quiz, SubmissionAnswers};
pub use scorer::{EvaluationResult, QuizScorer};

use error::EvaluationError;

/// Generate a quiz document from lesson content.
///
/// Entropy-seeded; use [`QuizAssembler::with_seed`] directly for
/// reproducible output. Never fails: pipeline failures degrade to the
/// deterministic fallback quiz.
pub fn generate_quiz(request: &QuizRequest) -> Quiz {
    QuizAssembler::new().generate(request)
}

/// Evaluate a submission given plain JSON documents.
///
/// Malformed input is converted into an error-flavored [`EvaluationResult`]
/// (zeroed score summary, grade F, error message recorded) rather than
/// raised, so callers always receive a result document.
pub fn evaluate_submission(
    quiz: &serde_json::Value,
    answers: &serde_json::Value,
    user_id: &str,
) -> EvaluationResult {
    let quiz: Quiz = match serde_json::from_value(quiz.clone()) {
        Ok(quiz) => quiz,
        Err(e) => {
            let err = EvaluationError::MalformedQuiz(e);
            tracing::error!(%user_id, error = %err, "failed to evaluate submission");
            return scorer::error_evaluation(user_id, &err.to_string());
        }
    };

    let answers: SubmissionAnswers = match serde_json::from_value(answers.clone()) {
        Ok(answers) => answers,
        Err(e) => {
            let err = EvaluationError::MalformedAnswers(e);
            tracing::error!(%user_id, error = %err, "failed to evaluate submission");
            return scorer::error_evaluation(user_id, &err.to_string());
        }
    };

    QuizScorer::new().evaluate(&quiz, &answers, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn evaluate_submission_happy_path_from_documents() {
        let quiz = json!({
            "quiz_id": "quiz_doc",
            "subject": "Geography",
            "topic": "Capitals",
            "questions": [
                {
                    "question_id": "q_1",
                    "type": "fill_in_blank",
                    "question": "_____ is the capital of France.",
                    "correct_answer": "paris",
                    "explanation": "Paris is the capital of France."
                }
            ]
        });
        let answers = json!({ "q_1": " Paris " });

        let result = evaluate_submission(&quiz, &answers, "student-1");
        assert!(result.error.is_none());
        assert_eq!(result.user_id, "student-1");
        assert_eq!(result.quiz_id, "quiz_doc");
        assert_eq!(result.score_summary.correct_answers, 1);
        assert_eq!(result.score_summary.total_points, 10);
    }

    #[test]
    fn malformed_quiz_document_yields_error_result() {
        let quiz = json!({ "questions": "not a list" });
        let answers = json!({});

        let result = evaluate_submission(&quiz, &answers, "anonymous");
        assert!(result.error.is_some());
        assert!(result.evaluation_id.starts_with("error_"));
        assert_eq!(result.score_summary.grade, "F");
        assert!(!result.score_summary.passed);
        assert!(result.detailed_results.is_empty());
    }

    #[test]
    fn malformed_answers_document_yields_error_result() {
        let quiz = json!({
            "quiz_id": "quiz_doc",
            "subject": "Geography",
            "topic": "Capitals",
            "questions": []
        });
        let answers = json!(["not", "a", "map"]);

        let result = evaluate_submission(&quiz, &answers, "anonymous");
        assert!(result.error.is_some());
        assert!(result
            .error
            .as_deref()
            .unwrap()
            .contains("malformed answers document"));
    }

    #[test]
    fn generate_quiz_entry_point_produces_a_document() {
        let mut request = QuizRequest::new("Math", "Algebra");
        request.num_questions = 2;
        request.question_types = Some(vec![QuestionKind::ShortAnswer]);

        let quiz = generate_quiz(&request);
        assert_eq!(quiz.questions.len(), 2);
        assert!(quiz.quiz_id.starts_with("quiz_"));
    }
}
