//! quizcraft CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizcraft", version, about = "Quiz generation and grading engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz from lesson content
    Generate {
        /// Path to the lesson content text file
        #[arg(long)]
        content: Option<PathBuf>,

        /// Subject name (e.g. "Science")
        #[arg(long)]
        subject: String,

        /// Specific topic (e.g. "Photosynthesis")
        #[arg(long)]
        topic: String,

        /// Number of questions to generate
        #[arg(long, default_value = "5")]
        num_questions: usize,

        /// Difficulty level: easy, medium, hard
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// Question types (comma-separated: multiple_choice,true_false,fill_in_blank,short_answer)
        #[arg(long)]
        types: Option<String>,

        /// Write the quiz JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Seed for reproducible generation
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Evaluate a submission against a quiz
    Evaluate {
        /// Quiz document JSON
        #[arg(long)]
        quiz: PathBuf,

        /// Answers JSON (question_id -> value)
        #[arg(long)]
        answers: PathBuf,

        /// User identifier for tracking
        #[arg(long, default_value = "anonymous")]
        user_id: String,

        /// Write the evaluation JSON here
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a quiz document
    Validate {
        /// Quiz document JSON
        #[arg(long)]
        quiz: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizcraft=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            content,
            subject,
            topic,
            num_questions,
            difficulty,
            types,
            output,
            seed,
        } => commands::generate::execute(
            content,
            subject,
            topic,
            num_questions,
            difficulty,
            types,
            output,
            seed,
        ),
        Commands::Evaluate {
            quiz,
            answers,
            user_id,
            output,
        } => commands::evaluate::execute(quiz, answers, user_id, output),
        Commands::Validate { quiz } => commands::validate::execute(quiz),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
