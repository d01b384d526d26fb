//! Quiz-level scoring and performance analysis.
//!
//! Aggregates per-question grades into an [`EvaluationResult`] with a score
//! summary, per-type performance breakdown, and templated recommendations.
//! The scorer never raises past its boundary; the document entry point in
//! `lib.rs` converts malformed input into [`error_evaluation`] results.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grader::{round2, QuestionGrader, QuestionResult};
use crate::model::{timestamp_id, Quiz, SubmissionAnswers};

/// Default points per question when the quiz's scoring policy is silent.
const DEFAULT_POINTS_PER_QUESTION: u32 = 10;
/// Default passing fraction of max points.
const DEFAULT_PASSING_FRACTION: f64 = 0.6;
/// Per-type accuracy at or above which a type counts as a strength.
const STRENGTH_ACCURACY: f64 = 0.8;
/// Per-type accuracy below which a type counts as a weakness.
const WEAKNESS_ACCURACY: f64 = 0.6;

/// Aggregate outcome of one quiz submission. Created fresh per submission,
/// immutable, returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Unique identifier for this evaluation.
    pub evaluation_id: String,
    pub user_id: String,
    pub quiz_id: String,
    pub subject: String,
    pub topic: String,
    /// When the submission was evaluated.
    pub submitted_at: DateTime<Utc>,
    /// Scoring summary.
    pub score_summary: ScoreSummary,
    /// Question-by-question results, in quiz order.
    pub detailed_results: Vec<QuestionResult>,
    /// Per-type breakdown and recommendations.
    pub performance_analysis: PerformanceAnalysis,
    /// Completion data echoed from the quiz.
    pub completion_data: CompletionData,
    /// Populated when the whole evaluation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvaluationResult {
    /// Save the evaluation as pretty JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize evaluation")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write evaluation to {}", path.display()))?;
        Ok(())
    }

    /// Load an evaluation from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read evaluation from {}", path.display()))?;
        let result: EvaluationResult =
            serde_json::from_str(&content).context("failed to parse evaluation JSON")?;
        Ok(result)
    }
}

/// Score totals for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total_questions: usize,
    pub correct_answers: usize,
    pub incorrect_answers: usize,
    pub total_points: u32,
    pub max_points: u32,
    /// `100 * total_points / max_points`, rounded to 2 decimals; 0 when
    /// `max_points` is 0.
    pub percentage_score: f64,
    pub passed: bool,
    /// Letter grade: A >= 90, B >= 80, C >= 70, D >= 60, else F.
    pub grade: String,
}

impl ScoreSummary {
    fn zeroed() -> Self {
        Self {
            total_questions: 0,
            correct_answers: 0,
            incorrect_answers: 0,
            total_points: 0,
            max_points: 0,
            percentage_score: 0.0,
            passed: false,
            grade: "F".to_string(),
        }
    }
}

/// Correct/total tally for one question type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypePerformance {
    pub correct: usize,
    pub total: usize,
}

/// Per-type breakdown, strengths/weaknesses, and study recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    /// "Excellent" >= 80, "Good" >= 60, else "Needs Improvement".
    pub overall_performance: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendations: Vec<String>,
    pub type_performance: BTreeMap<String, TypePerformance>,
}

/// Time and difficulty data echoed from the quiz document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionData {
    pub estimated_time: u32,
    pub difficulty: String,
}

/// Scores complete quiz submissions.
#[derive(Debug, Clone, Default)]
pub struct QuizScorer {
    grader: QuestionGrader,
}

impl QuizScorer {
    pub fn new() -> Self {
        Self {
            grader: QuestionGrader::new(),
        }
    }

    /// Evaluate a submission against a quiz.
    ///
    /// Questions are graded in quiz order; answers are looked up by question
    /// identifier, and a missing answer is passed to the grader as absent.
    /// Two calls with identical inputs produce identical score summaries and
    /// detailed results (only the identifier and timestamp differ).
    pub fn evaluate(
        &self,
        quiz: &Quiz,
        answers: &SubmissionAnswers,
        user_id: &str,
    ) -> EvaluationResult {
        tracing::info!(
            quiz_id = %quiz.quiz_id,
            %user_id,
            questions = quiz.questions.len(),
            "evaluating quiz submission"
        );

        let total_questions = quiz.questions.len();
        let mut detailed_results = Vec::with_capacity(total_questions);
        let mut correct_answers = 0usize;
        let mut total_points = 0u32;

        for question in &quiz.questions {
            let answer = answers.get(&question.question_id);
            let result = self.grader.grade(question, answer);
            if result.is_correct {
                correct_answers += 1;
            }
            total_points += result.points_earned;
            detailed_results.push(result);
        }

        let max_points = if quiz.scoring.total_points > 0 {
            quiz.scoring.total_points
        } else {
            total_questions as u32 * DEFAULT_POINTS_PER_QUESTION
        };
        let passing_score = if quiz.scoring.passing_score > 0 {
            quiz.scoring.passing_score as f64
        } else {
            max_points as f64 * DEFAULT_PASSING_FRACTION
        };

        let percentage_score = if max_points > 0 {
            round2(total_points as f64 / max_points as f64 * 100.0)
        } else {
            0.0
        };
        let passed = total_points as f64 >= passing_score;

        let performance_analysis = analyze_performance(
            &detailed_results,
            percentage_score,
            &quiz.subject,
            &quiz.topic,
        );

        tracing::info!(
            quiz_id = %quiz.quiz_id,
            correct = correct_answers,
            total = total_questions,
            percentage = percentage_score,
            "quiz evaluation completed"
        );

        EvaluationResult {
            evaluation_id: timestamp_id("eval"),
            user_id: user_id.to_string(),
            quiz_id: quiz.quiz_id.clone(),
            subject: quiz.subject.clone(),
            topic: quiz.topic.clone(),
            submitted_at: Utc::now(),
            score_summary: ScoreSummary {
                total_questions,
                correct_answers,
                incorrect_answers: total_questions - correct_answers,
                total_points,
                max_points,
                percentage_score,
                passed,
                grade: letter_grade(percentage_score).to_string(),
            },
            detailed_results,
            performance_analysis,
            completion_data: CompletionData {
                estimated_time: quiz.estimated_time,
                difficulty: quiz.difficulty.clone(),
            },
            error: None,
        }
    }
}

/// Letter grade for a percentage score. Inclusive lower bounds, evaluated
/// top-down.
pub fn letter_grade(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "A"
    } else if percentage >= 80.0 {
        "B"
    } else if percentage >= 70.0 {
        "C"
    } else if percentage >= 60.0 {
        "D"
    } else {
        "F"
    }
}

/// Group results by question type and derive strengths, weaknesses, and
/// recommendations.
fn analyze_performance(
    results: &[QuestionResult],
    percentage: f64,
    subject: &str,
    topic: &str,
) -> PerformanceAnalysis {
    let mut type_performance: BTreeMap<String, TypePerformance> = BTreeMap::new();
    for result in results {
        let entry = type_performance
            .entry(result.question_type.to_string())
            .or_insert(TypePerformance {
                correct: 0,
                total: 0,
            });
        entry.total += 1;
        if result.is_correct {
            entry.correct += 1;
        }
    }

    let strengths: Vec<String> = type_performance
        .iter()
        .filter(|(_, p)| p.correct as f64 / p.total as f64 >= STRENGTH_ACCURACY)
        .map(|(kind, _)| format!("Strong performance in {kind}"))
        .collect();

    let areas_for_improvement: Vec<String> = type_performance
        .iter()
        .filter(|(_, p)| (p.correct as f64 / p.total as f64) < WEAKNESS_ACCURACY)
        .map(|(kind, _)| format!("Review {kind} questions"))
        .collect();

    let recommendations = if percentage < 60.0 {
        vec![
            format!("Consider reviewing the fundamental concepts of {topic} in {subject}"),
            "Practice more questions to strengthen your understanding".to_string(),
        ]
    } else if percentage < 80.0 {
        vec![
            "Good progress! Focus on the areas where you missed questions".to_string(),
            "Try more advanced practice questions".to_string(),
        ]
    } else {
        vec![
            "Excellent performance! You have a strong understanding of the topic".to_string(),
            "Consider exploring more advanced topics in this subject".to_string(),
        ]
    };

    let overall_performance = if percentage >= 80.0 {
        "Excellent"
    } else if percentage >= 60.0 {
        "Good"
    } else {
        "Needs Improvement"
    };

    PerformanceAnalysis {
        overall_performance: overall_performance.to_string(),
        strengths,
        areas_for_improvement,
        recommendations,
        type_performance,
    }
}

/// Error-flavored evaluation for a submission that could not be processed.
/// Zeroed score summary, grade F, not passed; the error message is recorded
/// rather than raised.
pub(crate) fn error_evaluation(user_id: &str, message: &str) -> EvaluationResult {
    EvaluationResult {
        evaluation_id: timestamp_id("error"),
        user_id: user_id.to_string(),
        quiz_id: "unknown".to_string(),
        subject: String::new(),
        topic: String::new(),
        submitted_at: Utc::now(),
        score_summary: ScoreSummary::zeroed(),
        detailed_results: Vec::new(),
        performance_analysis: PerformanceAnalysis::default(),
        completion_data: CompletionData::default(),
        error: Some(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerValue, Question, QuestionBody, QuizMetadata, ScoringPolicy};

    fn true_false(id: &str, correct: bool) -> Question {
        Question {
            question_id: id.into(),
            prompt: format!("Statement {id}"),
            body: QuestionBody::TrueFalse {
                correct_answer: correct,
            },
            explanation: "explanation".into(),
            points: 10,
        }
    }

    fn quiz_of(questions: Vec<Question>) -> Quiz {
        let n = questions.len();
        Quiz {
            quiz_id: "quiz_test".into(),
            subject: "Science".into(),
            topic: "Photosynthesis".into(),
            difficulty: "medium".into(),
            total_questions: n,
            estimated_time: n as u32 * 2,
            questions,
            scoring: ScoringPolicy {
                total_points: n as u32 * 10,
                passing_score: n as u32 * 6,
                points_per_question: 10,
            },
            metadata: QuizMetadata::default(),
        }
    }

    #[test]
    fn three_of_five_correct_is_a_passing_d() {
        let quiz = quiz_of((1..=5).map(|i| true_false(&format!("q_{i}"), true)).collect());
        let answers: SubmissionAnswers = [
            ("q_1", true),
            ("q_2", true),
            ("q_3", true),
            ("q_4", false),
            ("q_5", false),
        ]
        .into_iter()
        .map(|(id, b)| (id.to_string(), AnswerValue::Bool(b)))
        .collect();

        let result = QuizScorer::new().evaluate(&quiz, &answers, "student-1");
        let summary = &result.score_summary;
        assert_eq!(summary.total_questions, 5);
        assert_eq!(summary.correct_answers, 3);
        assert_eq!(summary.incorrect_answers, 2);
        assert_eq!(summary.total_points, 30);
        assert_eq!(summary.max_points, 50);
        assert_eq!(summary.percentage_score, 60.0);
        assert!(summary.passed, "30 points meets the default passing 30");
        assert_eq!(summary.grade, "D");
    }

    #[test]
    fn missing_answers_count_as_incorrect() {
        let quiz = quiz_of(vec![true_false("q_1", true), true_false("q_2", true)]);
        let answers = SubmissionAnswers::new();

        let result = QuizScorer::new().evaluate(&quiz, &answers, "anonymous");
        assert_eq!(result.score_summary.correct_answers, 0);
        assert_eq!(result.score_summary.total_points, 0);
        assert_eq!(result.score_summary.grade, "F");
        assert!(!result.score_summary.passed);
        assert_eq!(result.detailed_results.len(), 2);
    }

    #[test]
    fn defaults_apply_when_scoring_policy_is_unspecified() {
        let mut quiz = quiz_of(vec![true_false("q_1", true), true_false("q_2", false)]);
        quiz.scoring = ScoringPolicy::default();

        let answers: SubmissionAnswers = [
            ("q_1".to_string(), AnswerValue::Bool(true)),
            ("q_2".to_string(), AnswerValue::Bool(false)),
        ]
        .into_iter()
        .collect();

        let result = QuizScorer::new().evaluate(&quiz, &answers, "anonymous");
        assert_eq!(result.score_summary.max_points, 20, "2 questions * 10");
        assert_eq!(result.score_summary.percentage_score, 100.0);
        assert!(result.score_summary.passed);
        assert_eq!(result.score_summary.grade, "A");
    }

    #[test]
    fn empty_quiz_avoids_division_by_zero() {
        let quiz = quiz_of(vec![]);
        let result = QuizScorer::new().evaluate(&quiz, &SubmissionAnswers::new(), "anonymous");
        assert_eq!(result.score_summary.percentage_score, 0.0);
        assert_eq!(result.score_summary.max_points, 0);
        assert_eq!(result.score_summary.grade, "F");
    }

    #[test]
    fn letter_grade_bands() {
        assert_eq!(letter_grade(95.0), "A");
        assert_eq!(letter_grade(90.0), "A");
        assert_eq!(letter_grade(89.99), "B");
        assert_eq!(letter_grade(80.0), "B");
        assert_eq!(letter_grade(70.0), "C");
        assert_eq!(letter_grade(60.0), "D");
        assert_eq!(letter_grade(59.99), "F");
        assert_eq!(letter_grade(0.0), "F");
    }

    #[test]
    fn performance_analysis_groups_by_type() {
        let mut questions = vec![
            true_false("q_1", true),
            true_false("q_2", true),
            Question {
                question_id: "q_3".into(),
                prompt: "Pick one".into(),
                body: QuestionBody::MultipleChoice {
                    options: vec!["a".into(), "b".into()],
                    correct_answer: 0,
                },
                explanation: String::new(),
                points: 10,
            },
        ];
        questions[0].explanation.clear();

        let quiz = quiz_of(questions);
        let answers: SubmissionAnswers = [
            ("q_1".to_string(), AnswerValue::Bool(true)),
            ("q_2".to_string(), AnswerValue::Bool(true)),
            ("q_3".to_string(), AnswerValue::Index(1)),
        ]
        .into_iter()
        .collect();

        let result = QuizScorer::new().evaluate(&quiz, &answers, "anonymous");
        let analysis = &result.performance_analysis;

        let tf = &analysis.type_performance["true_false"];
        assert_eq!((tf.correct, tf.total), (2, 2));
        let mc = &analysis.type_performance["multiple_choice"];
        assert_eq!((mc.correct, mc.total), (0, 1));

        assert!(analysis
            .strengths
            .iter()
            .any(|s| s.contains("true_false")));
        assert!(analysis
            .areas_for_improvement
            .iter()
            .any(|s| s.contains("multiple_choice")));
    }

    #[test]
    fn recommendation_tiers() {
        let quiz = quiz_of(vec![true_false("q_1", true), true_false("q_2", true)]);

        // 0%: review fundamentals
        let low = QuizScorer::new().evaluate(&quiz, &SubmissionAnswers::new(), "anonymous");
        assert!(low.performance_analysis.recommendations[0].contains("fundamental concepts"));
        assert_eq!(low.performance_analysis.overall_performance, "Needs Improvement");

        // 100%: praise + advanced material
        let answers: SubmissionAnswers = [
            ("q_1".to_string(), AnswerValue::Bool(true)),
            ("q_2".to_string(), AnswerValue::Bool(true)),
        ]
        .into_iter()
        .collect();
        let high = QuizScorer::new().evaluate(&quiz, &answers, "anonymous");
        assert!(high.performance_analysis.recommendations[0].contains("Excellent performance"));
        assert_eq!(high.performance_analysis.overall_performance, "Excellent");
    }

    #[test]
    fn evaluation_is_idempotent_modulo_identifiers() {
        let quiz = quiz_of(vec![true_false("q_1", true), true_false("q_2", false)]);
        let answers: SubmissionAnswers = [
            ("q_1".to_string(), AnswerValue::Bool(true)),
            ("q_2".to_string(), AnswerValue::Bool(true)),
        ]
        .into_iter()
        .collect();

        let scorer = QuizScorer::new();
        let first = scorer.evaluate(&quiz, &answers, "anonymous");
        let second = scorer.evaluate(&quiz, &answers, "anonymous");
        assert_eq!(first.score_summary, second.score_summary);
        assert_eq!(first.detailed_results, second.detailed_results);
        assert_eq!(first.performance_analysis, second.performance_analysis);
    }

    #[test]
    fn error_evaluation_is_zeroed() {
        let result = error_evaluation("anonymous", "malformed quiz document");
        assert!(result.evaluation_id.starts_with("error_"));
        assert_eq!(result.score_summary.grade, "F");
        assert!(!result.score_summary.passed);
        assert_eq!(result.score_summary.total_points, 0);
        assert!(result.detailed_results.is_empty());
        assert_eq!(result.error.as_deref(), Some("malformed quiz document"));
    }
}
