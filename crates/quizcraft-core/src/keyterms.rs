//! Key term and key concept extraction from lesson text.
//!
//! Two deliberately low-tech lexical extractors. `extract_key_terms` produces
//! the stop-word-filtered token set used for overlap grading of short
//! answers. `extract_key_concepts` seeds question generation by scanning for
//! capitalized words, quoted phrases, and copula definitions ("X is ...").
//! The heuristics are intentionally imprecise; generated question templates
//! embed the literal extracted strings, so the patterns must stay as-is.

use std::collections::HashSet;

use regex::Regex;

/// Words carrying no grading signal, dropped from key-term sets.
const STOP_WORDS: [&str; 30] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should",
];

/// Maximum number of key concepts returned per document.
const MAX_CONCEPTS: usize = 20;

/// Lexical extractor with pre-compiled patterns.
#[derive(Debug, Clone)]
pub struct KeyTermExtractor {
    word: Regex,
    capitalized: Regex,
    quoted: Regex,
    definition: Regex,
    sentence_end: Regex,
}

impl Default for KeyTermExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyTermExtractor {
    pub fn new() -> Self {
        // Patterns are literals; compilation cannot fail.
        Self {
            word: Regex::new(r"\b\w+\b").expect("word pattern"),
            capitalized: Regex::new(r"\b[A-Z][a-z]+\b").expect("capitalized pattern"),
            quoted: Regex::new(r#""([^"]*)""#).expect("quoted pattern"),
            definition: Regex::new(r"\b\w+(?:\s+\w+){0,2}(?:\s+is\s+|\s+are\s+|\s+means\s+)")
                .expect("definition pattern"),
            sentence_end: Regex::new(r"[.!?]+").expect("sentence pattern"),
        }
    }

    /// Extract the deduplicated key-term set from `text`.
    ///
    /// Tokens are lowercased; stop words and tokens of length <= 2 are
    /// dropped. The result is consumed as a membership set, so ordering is
    /// irrelevant.
    pub fn extract_key_terms(&self, text: &str) -> HashSet<String> {
        let lowered = text.to_lowercase();
        self.word
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .filter(|w| w.chars().count() > 2 && !STOP_WORDS.contains(&w.as_str()))
            .collect()
    }

    /// Extract up to [`MAX_CONCEPTS`] salient concepts from `text`, in
    /// first-seen order.
    ///
    /// Per sentence: capitalized single words, quoted substrings, and the
    /// first word of `<word> (is|are|means) ...` phrases. Entries are
    /// trimmed, kept only when longer than 2 characters, and deduplicated
    /// case-sensitively as extracted.
    pub fn extract_key_concepts(&self, text: &str) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut concepts: Vec<String> = Vec::new();

        let mut push = |candidate: &str, seen: &mut HashSet<String>, out: &mut Vec<String>| {
            let trimmed = candidate.trim();
            if trimmed.chars().count() > 2 && seen.insert(trimmed.to_string()) {
                out.push(trimmed.to_string());
            }
        };

        for sentence in self.sentence_end.split(text) {
            for m in self.capitalized.find_iter(sentence) {
                push(m.as_str(), &mut seen, &mut concepts);
            }
            for cap in self.quoted.captures_iter(sentence) {
                push(&cap[1], &mut seen, &mut concepts);
            }
            for m in self.definition.find_iter(sentence) {
                if let Some(first) = m.as_str().split_whitespace().next() {
                    push(first, &mut seen, &mut concepts);
                }
            }
        }

        concepts.truncate(MAX_CONCEPTS);
        concepts
    }
}
