//! The `quizcraft evaluate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizcraft_core::evaluate_submission;

pub fn execute(
    quiz_path: PathBuf,
    answers_path: PathBuf,
    user_id: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let quiz: serde_json::Value = read_json(&quiz_path)?;
    let answers: serde_json::Value = read_json(&answers_path)?;

    let result = evaluate_submission(&quiz, &answers, &user_id);

    if let Some(error) = &result.error {
        eprintln!("Evaluation failed: {error}");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Question", "Type", "Correct", "Points", "Feedback"]);
        for detail in &result.detailed_results {
            table.add_row(vec![
                Cell::new(&detail.question_id),
                Cell::new(detail.question_type),
                Cell::new(if detail.is_correct { "yes" } else { "no" }),
                Cell::new(format!("{}/{}", detail.points_earned, detail.max_points)),
                Cell::new(&detail.feedback),
            ]);
        }
        eprintln!("\n{table}");

        let summary = &result.score_summary;
        println!(
            "Score: {}/{} points ({:.1}%) grade {} - {}",
            summary.total_points,
            summary.max_points,
            summary.percentage_score,
            summary.grade,
            if summary.passed { "passed" } else { "failed" }
        );
        for recommendation in &result.performance_analysis.recommendations {
            println!("  - {recommendation}");
        }
    }

    if let Some(path) = output {
        result.save_json(&path)?;
        println!("Evaluation written to {}", path.display());
    }

    Ok(())
}

fn read_json(path: &PathBuf) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}
