// Flesch reading ease
// 206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words)
// Higher is easier. Plain conversational English lands around 60-80.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{FLESCH_BASE, FLESCH_SENTENCE_WEIGHT, FLESCH_SYLLABLE_WEIGHT};
use crate::error::Result;
use crate::scoring::round2;
use super::ReadabilityMeter;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// In-process Flesch meter. Stateless, safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FleschMeter;

impl ReadabilityMeter for FleschMeter {
    fn reading_ease(&self, text: &str) -> Result<f64> {
        flesch_reading_ease(text)
    }
}

/// Compute Flesch reading ease, rounded to 2 decimals.
/// Text without any words has zero sentence length and zero syllables per
/// word, so it scores the bare base (206.84).
pub fn flesch_reading_ease(text: &str) -> Result<f64> {
    let words: Vec<&str> = text
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .collect();

    if words.is_empty() {
        return Ok(round2(FLESCH_BASE));
    }

    let sentences = count_sentences(text).max(1);
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let word_count = words.len() as f64;
    let words_per_sentence = word_count / sentences as f64;
    let syllables_per_word = syllables as f64 / word_count;

    let ease = FLESCH_BASE
        - FLESCH_SENTENCE_WEIGHT * words_per_sentence
        - FLESCH_SYLLABLE_WEIGHT * syllables_per_word;

    Ok(round2(ease))
}

/// Sentences are runs of text between terminal punctuation that contain a word
fn count_sentences(text: &str) -> usize {
    SENTENCE_BREAK
        .split(text)
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
}

/// Heuristic English syllable count: vowel groups, minus a silent final `e`.
/// Every word has at least one syllable.
fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut count = 0;
    let mut previous_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            count += 1;
        }
        previous_vowel = vowel;
    }

    // "make" -> 1, but "table" keeps its "-ble" syllable
    let n = letters.len();
    if count > 1 && n >= 2 && letters[n - 1] == 'e' && letters[n - 2] != 'l' {
        count -= 1;
    }

    count.max(1)
}
