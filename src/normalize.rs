//! Text normalization: emoji removal, lowercasing, accent folding,
//! punctuation stripping and word filtering, line by line.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::config::NormalizerConfig;
use crate::constants::normalizer::{
    ACCENT_REPLACEMENTS, EMOJI_PATTERN, INVALID_CHARACTERS, MARKDOWN_LINK_SEPARATOR,
    VALID_CHARACTERS,
};
use crate::types::Term;

static EMOJI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMOJI_PATTERN).expect("emoji pattern is a valid regex"));

/// Replace each run of emoji/pictograph characters with a single space.
pub fn strip_emojis(text: &str) -> String {
    EMOJI.replace_all(text, " ").into_owned()
}

/// Fold the fixed accented-letter table to base letters.
pub fn fold_accents(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(ch: char) -> char {
    ACCENT_REPLACEMENTS
        .iter()
        .find(|(accented, _)| *accented == ch)
        .map(|(_, base)| *base)
        .unwrap_or(ch)
}

fn is_stripped(ch: char) -> bool {
    (ch.is_ascii_punctuation() || INVALID_CHARACTERS.contains(ch)) && !VALID_CHARACTERS.contains(ch)
}

/// Fold accents and drop punctuation/invalid symbols, keeping `@` and `#`.
pub fn clean_word(word: &str) -> String {
    word.chars()
        .map(fold_char)
        .filter(|ch| !is_stripped(*ch))
        .collect()
}

fn trim_valid(word: &str) -> &str {
    word.trim_matches(|ch: char| VALID_CHARACTERS.contains(ch))
}

fn is_number(word: &str) -> bool {
    word.parse::<i64>().is_ok() || word.parse::<f64>().is_ok()
}

/// Line-structure-preserving text cleaner.
///
/// A line with no surviving words becomes an empty line, so the number of
/// lines of every record is unchanged.
#[derive(Clone, Debug)]
pub struct Normalizer {
    min_word_len: usize,
    ignore_prefixes: Vec<String>,
    stopwords: HashSet<Term>,
}

impl Normalizer {
    /// Build a normalizer; stopwords are folded the way words are.
    pub fn new(config: &NormalizerConfig) -> Self {
        let stopwords = config
            .stopwords
            .iter()
            .map(|word| clean_word(&word.to_lowercase()))
            .map(|word| trim_valid(&word).to_string())
            .filter(|word| !word.is_empty())
            .collect();
        Self {
            min_word_len: config.min_word_len,
            ignore_prefixes: config
                .ignore_prefixes
                .iter()
                .filter(|prefix| !prefix.is_empty())
                .map(|prefix| prefix.to_lowercase())
                .collect(),
            stopwords,
        }
    }

    /// Normalize every record, preserving order and count.
    pub fn normalize<S: AsRef<str>>(&self, records: &[S]) -> Vec<String> {
        let normalized: Vec<String> = records
            .iter()
            .map(|record| self.normalize_record(record.as_ref()))
            .collect();
        debug!(
            records = normalized.len(),
            empty = normalized.iter().filter(|r| r.trim().is_empty()).count(),
            "normalized records"
        );
        normalized
    }

    /// Normalize one record; its lines are processed independently.
    pub fn normalize_record(&self, record: &str) -> String {
        record
            .split('\n')
            .map(|line| self.normalize_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Normalize a single line into space-joined tokens.
    pub fn normalize_line(&self, line: &str) -> String {
        let lowered = strip_emojis(line).to_lowercase();
        let mut kept: Vec<String> = Vec::new();
        for raw in lowered.split_whitespace() {
            for piece in raw.split(MARKDOWN_LINK_SEPARATOR) {
                if piece.is_empty() || self.has_ignored_prefix(piece) {
                    continue;
                }
                let word = clean_word(piece);
                if self.keeps(&word) {
                    kept.push(word);
                }
            }
        }
        kept.join(" ")
    }

    /// Tokens of a record across all of its lines.
    pub fn tokens(&self, record: &str) -> Vec<String> {
        self.normalize_record(record)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    fn has_ignored_prefix(&self, word: &str) -> bool {
        self.ignore_prefixes
            .iter()
            .any(|prefix| word.starts_with(prefix.as_str()))
    }

    fn keeps(&self, word: &str) -> bool {
        !word.is_empty()
            && word.chars().count() >= self.min_word_len
            && !is_number(word)
            && !self.stopwords.contains(trim_valid(word))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}
