//! Linguistic reduction (stemming) of normalized records.
//!
//! A [`Reducer`] maps a newline-separated record to a reduced record with
//! the same line structure. [`SnowballReducer`] resolves a language through a
//! [`LanguageTable`] (from an explicit hint, or from a [`LanguageDetector`])
//! and stems every kept word. Reducers never fail: an unknown language leaves
//! the input unchanged.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

use rust_stemmers::{Algorithm, Stemmer};
use tracing::debug;

use crate::constants::reducer::IGNORE_CHARS;
use crate::normalize::{clean_word, fold_accents};
use crate::stopwords::StopwordList;
use crate::types::LangCode;

/// Maps a record (one sentence per line) to its reduced form.
pub trait Reducer: Send + Sync {
    /// Reduce `sentence`; `lang` is an optional language hint.
    fn reduce(&self, sentence: &str, lang: Option<&str>) -> String;
}

/// Guesses the language of a text.
pub trait LanguageDetector: Send + Sync {
    /// Language code or name understood by a [`LanguageTable`], if detected.
    fn detect(&self, text: &str) -> Option<LangCode>;
}

/// Snowball languages: ISO 639-1 code, English name, algorithm.
const SNOWBALL_LANGUAGES: [(&str, &str, Algorithm); 18] = [
    ("ar", "arabic", Algorithm::Arabic),
    ("da", "danish", Algorithm::Danish),
    ("nl", "dutch", Algorithm::Dutch),
    ("en", "english", Algorithm::English),
    ("fi", "finnish", Algorithm::Finnish),
    ("fr", "french", Algorithm::French),
    ("de", "german", Algorithm::German),
    ("el", "greek", Algorithm::Greek),
    ("hu", "hungarian", Algorithm::Hungarian),
    ("it", "italian", Algorithm::Italian),
    ("no", "norwegian", Algorithm::Norwegian),
    ("pt", "portuguese", Algorithm::Portuguese),
    ("ro", "romanian", Algorithm::Romanian),
    ("ru", "russian", Algorithm::Russian),
    ("es", "spanish", Algorithm::Spanish),
    ("sv", "swedish", Algorithm::Swedish),
    ("ta", "tamil", Algorithm::Tamil),
    ("tr", "turkish", Algorithm::Turkish),
];

static SNOWBALL_TABLE: LazyLock<Arc<LanguageTable>> = LazyLock::new(|| {
    Arc::new(LanguageTable::from_entries(SNOWBALL_LANGUAGES.iter().copied()))
});

/// A language resolved by a [`LanguageTable`].
#[derive(Clone, Copy, Debug)]
pub struct StemmerLanguage {
    /// Canonical English name (`english`, `portuguese`, ...).
    pub name: &'static str,
    /// Snowball algorithm for the language.
    pub algorithm: Algorithm,
}

impl StemmerLanguage {
    /// Built-in stopword list for this language, when one exists.
    pub fn stopwords(&self) -> Option<StopwordList> {
        self.name.parse::<StopwordList>().ok()
    }
}

/// Stopwords in the folded form the normalizer emits (`não` -> `nao`).
fn folded_stopwords(list: StopwordList) -> HashSet<String> {
    list.words()
        .into_iter()
        .map(clean_word)
        .filter(|word| !word.is_empty())
        .collect()
}

/// Immutable lookup from language code or name to a Snowball algorithm.
#[derive(Clone, Debug, Default)]
pub struct LanguageTable {
    entries: HashMap<String, StemmerLanguage>,
}

impl LanguageTable {
    /// Process-wide table of every Snowball language, built on first use.
    pub fn snowball() -> Arc<LanguageTable> {
        Arc::clone(&SNOWBALL_TABLE)
    }

    /// Build a table from `(code, name, algorithm)` triples; both the code and
    /// the name resolve.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, &'static str, Algorithm)>,
    {
        let mut table = HashMap::new();
        for (code, name, algorithm) in entries {
            let language = StemmerLanguage { name, algorithm };
            table.insert(code.to_lowercase(), language);
            table.insert(name.to_lowercase(), language);
        }
        Self { entries: table }
    }

    /// Resolve a code or name, ignoring case and surrounding whitespace.
    pub fn resolve(&self, lang: &str) -> Option<StemmerLanguage> {
        self.entries.get(&lang.trim().to_lowercase()).copied()
    }

    /// Number of distinct keys (codes plus names).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no languages.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Detects the language whose built-in stopword list has the most hits.
///
/// Ties go to the earlier list; a text with no hits is undetected.
pub struct StopwordDetector {
    lists: Vec<(StopwordList, HashSet<String>)>,
}

impl StopwordDetector {
    /// Detector over every built-in language list.
    pub fn new() -> Self {
        Self {
            lists: StopwordList::LANGUAGES
                .into_iter()
                .map(|list| (list, folded_stopwords(list)))
                .collect(),
        }
    }
}

impl Default for StopwordDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StopwordDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let languages: Vec<_> = self.lists.iter().map(|(list, _)| list.name()).collect();
        f.debug_struct("StopwordDetector")
            .field("languages", &languages)
            .finish()
    }
}

impl LanguageDetector for StopwordDetector {
    fn detect(&self, text: &str) -> Option<LangCode> {
        let folded = fold_accents(&text.to_lowercase());
        let words: Vec<&str> = folded
            .split_whitespace()
            .map(|word| word.trim_matches(|ch: char| !ch.is_alphanumeric()))
            .filter(|word| !word.is_empty())
            .collect();

        let mut best: Option<(StopwordList, usize)> = None;
        for (list, stopwords) in &self.lists {
            let hits = words.iter().filter(|word| stopwords.contains(**word)).count();
            if hits > 0 && best.is_none_or(|(_, top)| hits > top) {
                best = Some((*list, hits));
            }
        }
        best.map(|(list, _)| list.name().to_string())
    }
}

/// Snowball stemmer over a [`LanguageTable`].
pub struct SnowballReducer {
    table: Arc<LanguageTable>,
    detector: Box<dyn LanguageDetector>,
    ignore_chars: String,
    ignore_stopwords: bool,
}

impl SnowballReducer {
    /// Stemmer resolving languages through `table`, detecting with `detector` when no hint is given.
    pub fn new(table: Arc<LanguageTable>, detector: impl LanguageDetector + 'static) -> Self {
        Self {
            table,
            detector: Box::new(detector),
            ignore_chars: IGNORE_CHARS.to_string(),
            ignore_stopwords: true,
        }
    }

    /// Words whose first character is one of `chars` are removed.
    pub fn with_ignore_chars(mut self, chars: impl Into<String>) -> Self {
        self.ignore_chars = chars.into();
        self
    }

    /// Leave the language's stopwords unstemmed.
    pub fn with_ignore_stopwords(mut self, ignore_stopwords: bool) -> Self {
        self.ignore_stopwords = ignore_stopwords;
        self
    }

    fn language(&self, sentence: &str, lang: Option<&str>) -> Option<StemmerLanguage> {
        match lang {
            Some(lang) => self.table.resolve(lang),
            None => self
                .detector
                .detect(sentence)
                .and_then(|detected| self.table.resolve(&detected)),
        }
    }

    fn is_ignored(&self, word: &str) -> bool {
        word.chars()
            .next()
            .is_some_and(|first| self.ignore_chars.contains(first))
    }
}

impl Default for SnowballReducer {
    fn default() -> Self {
        Self::new(LanguageTable::snowball(), StopwordDetector::new())
    }
}

impl fmt::Debug for SnowballReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowballReducer")
            .field("languages", &self.table.len())
            .field("ignore_chars", &self.ignore_chars)
            .field("ignore_stopwords", &self.ignore_stopwords)
            .finish()
    }
}

impl Reducer for SnowballReducer {
    fn reduce(&self, sentence: &str, lang: Option<&str>) -> String {
        let Some(language) = self.language(sentence, lang) else {
            debug!(lang = ?lang, "no stemmer for language; leaving record unchanged");
            return sentence.to_string();
        };

        let stemmer = Stemmer::create(language.algorithm);
        let stopwords = match language.stopwords() {
            Some(list) if self.ignore_stopwords => folded_stopwords(list),
            _ => HashSet::new(),
        };

        sentence
            .split('\n')
            .map(|line| {
                line.split_whitespace()
                    .filter(|word| !self.is_ignored(word))
                    .map(|word| {
                        if stopwords.contains(word) {
                            word.to_string()
                        } else {
                            stemmer.stem(word).into_owned()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> SnowballReducer {
        SnowballReducer::default()
    }

    #[test]
    fn table_resolves_codes_and_names() {
        let table = LanguageTable::snowball();
        assert_eq!(table.resolve("pt").map(|l| l.name), Some("portuguese"));
        assert_eq!(table.resolve(" English ").map(|l| l.name), Some("english"));
        assert!(table.resolve("klingon").is_none());
        assert_eq!(table.len(), 36);
    }

    #[test]
    fn stems_with_explicit_language_and_keeps_lines() {
        let reduced = english().reduce("running cats\njumped", Some("en"));
        assert_eq!(reduced, "run cat\njump");
    }

    #[test]
    fn drops_words_with_ignored_first_char() {
        let reduced = english().reduce("@user running #topic", Some("english"));
        assert_eq!(reduced, "run");

        let kept = english()
            .with_ignore_chars("")
            .reduce("@user", Some("english"));
        assert!(kept.starts_with('@'));
    }

    #[test]
    fn stopwords_stay_unstemmed_only_when_requested() {
        // "having" is an English stopword; the Snowball stemmer maps it to "have".
        let kept = english().reduce("having", Some("en"));
        assert_eq!(kept, "having");
        let stemmed = english()
            .with_ignore_stopwords(false)
            .reduce("having", Some("en"));
        assert_eq!(stemmed, "have");
    }

    #[test]
    fn folded_stopwords_stay_unstemmed() {
        // Snowball maps "voce" to "voc"; the normalizer folds "você" to "voce".
        let kept = english().reduce("voce gatinhos", Some("pt"));
        assert!(kept.starts_with("voce "));
        let stemmed = english()
            .with_ignore_stopwords(false)
            .reduce("voce", Some("pt"));
        assert_eq!(stemmed, "voc");
    }

    #[test]
    fn detector_matches_folded_and_accented_text() {
        let detector = StopwordDetector::new();
        assert_eq!(
            detector.detect("voce nao esta aqui").as_deref(),
            Some("portuguese")
        );
        assert_eq!(
            detector.detect("você não está aqui").as_deref(),
            Some("portuguese")
        );
    }

    #[test]
    fn unknown_language_returns_input_unchanged() {
        let input = "@keep running";
        assert_eq!(english().reduce(input, Some("xx")), input);
    }

    #[test]
    fn undetected_language_returns_input_unchanged() {
        assert_eq!(english().reduce("zzz qqq", None), "zzz qqq");
    }

    #[test]
    fn detector_picks_language_with_most_hits() {
        let detector = StopwordDetector::new();
        assert_eq!(
            detector.detect("the cat and the dog were running").as_deref(),
            Some("english")
        );
        assert_eq!(
            detector.detect("o gato e o cachorro não estão aqui").as_deref(),
            Some("portuguese")
        );
        assert_eq!(detector.detect("zzz"), None);
    }

    #[test]
    fn detected_language_drives_stemming() {
        assert_eq!(english().reduce("the dogs were running", None), "the dog were run");
    }

    #[test]
    fn injected_table_limits_languages() {
        let table = Arc::new(LanguageTable::from_entries([(
            "pt",
            "portuguese",
            Algorithm::Portuguese,
        )]));
        let reducer = SnowballReducer::new(table, StopwordDetector::new());
        assert_eq!(reducer.reduce("running", Some("en")), "running");
        assert_ne!(reducer.reduce("gatinhos", Some("pt")), "gatinhos");
    }
}
