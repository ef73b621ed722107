//! Built-in stopword lists.
//!
//! Lists are stored in their natural spelling (with accents); the normalizer
//! folds them into the same form as the tokens they are compared with.

use std::fmt;
use std::str::FromStr;

use crate::errors::PipelineError;

const ENGLISH: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves", "rt", "via",
];

const PORTUGUESE: &[&str] = &[
    "a", "à", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "às",
    "até", "com", "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois", "do",
    "dos", "e", "é", "ela", "elas", "ele", "eles", "em", "entre", "era", "essa", "essas",
    "esse", "esses", "esta", "está", "estas", "este", "estes", "eu", "foi", "há", "isso",
    "isto", "já", "lhe", "mais", "mas", "me", "mesmo", "meu", "minha", "muito", "na", "não",
    "nas", "nem", "no", "nos", "nós", "num", "numa", "o", "os", "ou", "para", "pela", "pelas",
    "pelo", "pelos", "por", "pra", "quando", "que", "quem", "se", "sem", "ser", "seu", "sua",
    "são", "só", "também", "te", "tem", "tu", "um", "uma", "você", "vocês", "vai",
];

const SPANISH: &[&str] = &[
    "a", "al", "algo", "ante", "antes", "como", "con", "contra", "cual", "cuando", "de", "del",
    "desde", "donde", "durante", "e", "el", "él", "ella", "ellas", "ellos", "en", "entre",
    "era", "es", "esa", "esas", "ese", "eso", "esos", "esta", "está", "estas", "este", "esto",
    "estos", "fue", "ha", "hay", "la", "las", "le", "les", "lo", "los", "más", "me", "mi",
    "mis", "muy", "nada", "ni", "no", "nos", "o", "os", "para", "pero", "poco", "por",
    "porque", "que", "qué", "quien", "se", "sea", "ser", "si", "sí", "sin", "sobre", "son",
    "su", "sus", "también", "te", "tu", "tus", "un", "una", "uno", "unos", "y", "ya", "yo",
];

const FRENCH: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "cette", "dans", "de", "des", "du", "elle", "elles",
    "en", "est", "et", "été", "être", "eu", "il", "ils", "je", "la", "le", "les", "leur",
    "leurs", "lui", "ma", "mais", "me", "même", "mes", "moi", "mon", "ne", "nos", "notre",
    "nous", "on", "ou", "où", "par", "pas", "pour", "qu", "que", "qui", "sa", "se", "ses",
    "son", "sont", "sur", "ta", "te", "tes", "toi", "ton", "tu", "un", "une", "vos", "votre",
    "vous", "y", "à", "ça",
];

const GERMAN: &[&str] = &[
    "aber", "als", "am", "an", "auch", "auf", "aus", "bei", "bin", "bis", "da", "das", "dass",
    "dem", "den", "der", "des", "die", "dies", "diese", "dieser", "doch", "du", "durch", "ein",
    "eine", "einem", "einen", "einer", "es", "für", "hat", "hatte", "ich", "ihr", "im", "in",
    "ist", "ja", "kann", "kein", "man", "mit", "nach", "nicht", "noch", "nur", "oder", "sich",
    "sie", "sind", "so", "über", "um", "und", "uns", "unter", "vom", "von", "vor", "war",
    "was", "wenn", "wie", "wir", "wird", "zu", "zum", "zur",
];

const ITALIAN: &[&str] = &[
    "a", "ad", "al", "alla", "anche", "che", "chi", "con", "come", "da", "dal", "dalla", "dei",
    "del", "della", "delle", "di", "e", "è", "era", "gli", "ha", "hanno", "i", "il", "in",
    "io", "la", "le", "lei", "lo", "loro", "lui", "ma", "mi", "mio", "ne", "negli", "nel",
    "nella", "noi", "non", "per", "più", "quella", "quello", "questa", "questo", "se", "si",
    "sono", "su", "sua", "suo", "ti", "tra", "tu", "un", "una", "uno", "voi",
];

/// Built-in stopword list selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopwordList {
    /// English stopwords.
    English,
    /// Portuguese stopwords.
    Portuguese,
    /// Spanish stopwords.
    Spanish,
    /// French stopwords.
    French,
    /// German stopwords.
    German,
    /// Italian stopwords.
    Italian,
    /// Union of every built-in list.
    All,
    /// No stopwords.
    None,
}

impl StopwordList {
    /// Every single-language list, in a fixed order.
    pub const LANGUAGES: [StopwordList; 6] = [
        StopwordList::English,
        StopwordList::Portuguese,
        StopwordList::Spanish,
        StopwordList::French,
        StopwordList::German,
        StopwordList::Italian,
    ];

    /// Raw words of this list. `All` concatenates every language.
    pub fn words(self) -> Vec<&'static str> {
        match self {
            Self::All => Self::LANGUAGES
                .iter()
                .flat_map(|list| list.raw().iter().copied())
                .collect(),
            other => other.raw().to_vec(),
        }
    }

    /// English language name, as used by the stemmer tables.
    pub fn name(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Portuguese => "portuguese",
            Self::Spanish => "spanish",
            Self::French => "french",
            Self::German => "german",
            Self::Italian => "italian",
            Self::All => "all",
            Self::None => "none",
        }
    }

    fn raw(self) -> &'static [&'static str] {
        match self {
            Self::English => ENGLISH,
            Self::Portuguese => PORTUGUESE,
            Self::Spanish => SPANISH,
            Self::French => FRENCH,
            Self::German => GERMAN,
            Self::Italian => ITALIAN,
            Self::All | Self::None => &[],
        }
    }
}

impl fmt::Display for StopwordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StopwordList {
    type Err = PipelineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_lowercase();
        if let Some(list) = [Self::All, Self::None]
            .into_iter()
            .find(|list| list.name() == wanted)
        {
            return Ok(list);
        }
        Self::LANGUAGES
            .into_iter()
            .find(|list| list.name() == wanted)
            .ok_or_else(|| {
                PipelineError::Configuration(format!(
                    "unknown stopword list '{raw}' (available: all, none, {})",
                    Self::LANGUAGES.map(|list| list.name()).join(", ")
                ))
            })
    }
}
