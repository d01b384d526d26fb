//! The `quizcraft generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizcraft_core::{QuestionKind, QuizAssembler, QuizRequest};

#[allow(clippy::too_many_arguments)]
pub fn execute(
    content: Option<PathBuf>,
    subject: String,
    topic: String,
    num_questions: usize,
    difficulty: String,
    types: Option<String>,
    output: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<()> {
    let content = match content {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read content from {}", path.display()))?,
        None => String::new(),
    };

    // Unknown type names are dropped with a warning; an empty surviving pool
    // routes generation to the fallback quiz rather than aborting
    let question_types = types.map(|spec| {
        spec.split(',')
            .filter(|s| !s.trim().is_empty())
            .filter_map(|s| match s.parse::<QuestionKind>() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    tracing::warn!("{e}, skipping");
                    None
                }
            })
            .collect::<Vec<_>>()
    });

    let mut request = QuizRequest::new(subject, topic);
    request.content = content;
    request.num_questions = num_questions;
    request.difficulty = difficulty;
    request.question_types = question_types;

    let mut assembler = match seed {
        Some(seed) => QuizAssembler::with_seed(seed),
        None => QuizAssembler::new(),
    };
    let quiz = assembler.generate(&request);

    match output {
        Some(path) => {
            quiz.save_json(&path)?;
            println!(
                "Generated {} question(s) ({}) -> {}",
                quiz.questions.len(),
                quiz.quiz_id,
                path.display()
            );
            if quiz.metadata.fallback_mode {
                println!("Note: fallback quiz (content-based generation failed)");
            }
        }
        None => {
            let json = serde_json::to_string_pretty(&quiz)?;
            println!("{json}");
        }
    }

    Ok(())
}
