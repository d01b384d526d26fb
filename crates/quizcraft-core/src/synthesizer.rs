//! Per-type question synthesis strategies.
//!
//! Each strategy takes the lesson paragraphs, the extracted key concepts,
//! subject, and topic, plus a random source, and returns a draft question or
//! `None` when the content cannot support that question type. A `None` is
//! skipped by the assembler; one thin slot never fails the whole batch.
//!
//! Option order for multiple-choice questions is significant: the correct
//! option is always generated first (index 0) and the list is never
//! shuffled, since `correct_answer` is positional.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{QuestionBody, QuestionKind};

/// Inputs shared by all synthesis strategies.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisInput<'a> {
    /// Lesson content split on blank lines, trimmed, non-empty.
    pub paragraphs: &'a [String],
    /// Key concepts extracted once from the full content.
    pub concepts: &'a [String],
    pub subject: &'a str,
    pub topic: &'a str,
    pub difficulty: &'a str,
}

/// A synthesized question before the assembler assigns an identifier and
/// point value.
#[derive(Debug, Clone)]
pub struct DraftQuestion {
    pub prompt: String,
    pub body: QuestionBody,
    pub explanation: String,
}

/// Split lesson content into candidate paragraphs.
pub(crate) fn split_paragraphs(content: &str) -> Vec<String> {
    content
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Synthesize one question of the given kind, or `None` on failure.
pub fn synthesize<R: Rng + ?Sized>(
    kind: QuestionKind,
    input: &SynthesisInput<'_>,
    rng: &mut R,
) -> Option<DraftQuestion> {
    let draft = match kind {
        QuestionKind::MultipleChoice => multiple_choice(input, rng),
        QuestionKind::TrueFalse => Some(true_false(input, rng)),
        QuestionKind::FillInBlank => Some(fill_in_blank(input, rng)),
        QuestionKind::ShortAnswer => Some(short_answer(input)),
    };
    if draft.is_none() {
        tracing::debug!(%kind, "content too thin for question type, skipping slot");
    }
    draft
}

/// Multiple choice needs a substantial paragraph (> 100 chars) containing a
/// substantial sentence (> 20 chars); otherwise the slot is skipped.
fn multiple_choice<R: Rng + ?Sized>(
    input: &SynthesisInput<'_>,
    rng: &mut R,
) -> Option<DraftQuestion> {
    let substantial: Vec<&String> = input
        .paragraphs
        .iter()
        .filter(|p| p.chars().count() > 100)
        .collect();
    let paragraph = substantial.choose(rng)?;

    let sentences: Vec<&str> = paragraph
        .split(['.', '!', '?'])
        .filter(|s| s.trim().chars().count() > 20)
        .collect();
    // The fact sentence anchors the question on real content; the draw also
    // keeps one random choice point per generated question.
    let _fact = sentences.choose(rng)?;

    let topic = input.topic;
    let subject = input.subject;

    let (prompt, options) = if let Some(concept) = input.concepts.choose(rng) {
        (
            format!("What is the significance of {concept} in {topic}?"),
            vec![
                format!("{concept} is fundamental to understanding {topic}"),
                format!("{concept} is rarely used in {topic}"),
                format!("{concept} contradicts the principles of {topic}"),
                format!("{concept} is only theoretical in {topic}"),
            ],
        )
    } else {
        (
            format!("Which statement best describes {topic}?"),
            vec![
                format!("{topic} is an important concept in {subject}"),
                format!("{topic} is outdated in modern {subject}"),
                format!("{topic} is only for advanced students"),
                format!("{topic} has no practical applications"),
            ],
        )
    };

    Some(DraftQuestion {
        prompt,
        body: QuestionBody::MultipleChoice {
            options,
            correct_answer: 0,
        },
        explanation: format!("This concept is central to understanding {topic} in {subject}."),
    })
}

fn true_false<R: Rng + ?Sized>(input: &SynthesisInput<'_>, rng: &mut R) -> DraftQuestion {
    let topic = input.topic;
    let subject = input.subject;

    let (statement, correct_answer, explanation) =
        if let Some(concept) = input.concepts.choose(rng) {
            if rng.gen_bool(0.5) {
                (
                    format!("{concept} is an important element in {topic}"),
                    true,
                    format!("Yes, {concept} plays a significant role in understanding {topic}."),
                )
            } else {
                (
                    format!("{concept} is completely unrelated to {topic}"),
                    false,
                    format!("No, {concept} is actually relevant to {topic} in {subject}."),
                )
            }
        } else {
            (
                format!("Understanding {topic} is beneficial for students of {subject}"),
                true,
                format!("True, {topic} provides foundational knowledge in {subject}."),
            )
        };

    DraftQuestion {
        prompt: statement,
        body: QuestionBody::TrueFalse { correct_answer },
        explanation,
    }
}

fn fill_in_blank<R: Rng + ?Sized>(input: &SynthesisInput<'_>, rng: &mut R) -> DraftQuestion {
    let topic = input.topic;
    let subject = input.subject;

    if let Some(concept) = input.concepts.choose(rng) {
        DraftQuestion {
            prompt: format!(
                "The concept of _____ is fundamental to understanding {topic} in {subject}."
            ),
            body: QuestionBody::FillInBlank {
                correct_answer: concept.clone(),
            },
            explanation: format!("The answer is '{concept}' as it is a key concept in this topic."),
        }
    } else {
        DraftQuestion {
            prompt: format!("_____ is the main subject area that encompasses {topic}."),
            body: QuestionBody::FillInBlank {
                correct_answer: subject.to_string(),
            },
            explanation: format!("The answer is '{subject}' as {topic} is part of this subject."),
        }
    }
}

/// Short answer is a pure template on subject and topic; it never depends on
/// concepts or paragraphs and never fails.
fn short_answer(input: &SynthesisInput<'_>) -> DraftQuestion {
    let topic = input.topic;
    let subject = input.subject;

    DraftQuestion {
        prompt: format!("Explain the importance of {topic} in {subject}."),
        body: QuestionBody::ShortAnswer {
            sample_answer: format!(
                "{topic} is important in {subject} because it provides foundational \
                 understanding and practical applications."
            ),
        },
        explanation: "This question tests understanding of the topic's significance and \
                      applications."
            .to_string(),
    }
}
