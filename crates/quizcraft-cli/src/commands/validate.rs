//! The `quizcraft validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizcraft_core::model::Quiz;
use quizcraft_core::validate::validate_quiz;

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let quiz = Quiz::load_json(&quiz_path)?;
    let warnings = validate_quiz(&quiz);

    println!(
        "{}: {} question(s)",
        quiz.quiz_id,
        quiz.questions.len()
    );

    if warnings.is_empty() {
        println!("Quiz is valid");
    } else {
        for warning in &warnings {
            match &warning.question_id {
                Some(id) => println!("  warning [{id}]: {}", warning.message),
                None => println!("  warning: {}", warning.message),
            }
        }
        println!("{} warning(s)", warnings.len());
    }

    Ok(())
}
