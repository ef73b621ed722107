/// Constants used by source classification and parsing.
pub mod loader {
    /// Delimiter candidates checked against the header line, in priority order.
    pub const DELIMITER_CANDIDATES: [char; 4] = ['|', '\t', ';', ','];
    /// File extension routed to the JSON readers (case-insensitive).
    pub const JSON_EXTENSION: &str = "json";
    /// Column name given to scalar values when a JSON source has no object keys.
    pub const SCALAR_COLUMN: &str = "0";
    /// Prefix used for source ids of in-memory inputs (`memory[<position>]`).
    pub const MEMORY_SOURCE_PREFIX: &str = "memory";
}

/// Constants used by the text normalizer.
pub mod normalizer {
    /// Symbols kept inside words and trimmed only for stopword matching.
    pub const VALID_CHARACTERS: &str = "@#";
    /// Non-ASCII symbols stripped in addition to ASCII punctuation.
    pub const INVALID_CHARACTERS: &str = "\\\"'’…|–—“”‘„•¿¡";
    /// Markdown link artifact split into two words.
    pub const MARKDOWN_LINK_SEPARATOR: &str = "](";
    /// Accented lowercase letters folded to their base letter.
    pub const ACCENT_REPLACEMENTS: [(char, char); 18] = [
        ('á', 'a'),
        ('ã', 'a'),
        ('â', 'a'),
        ('à', 'a'),
        ('è', 'e'),
        ('ê', 'e'),
        ('é', 'e'),
        ('í', 'i'),
        ('ì', 'i'),
        ('ñ', 'n'),
        ('ò', 'o'),
        ('ó', 'o'),
        ('ô', 'o'),
        ('õ', 'o'),
        ('ù', 'u'),
        ('ú', 'u'),
        ('ü', 'u'),
        ('ç', 'c'),
    ];
    /// Emoji and pictograph ranges replaced by a single space per run.
    pub const EMOJI_PATTERN: &str = concat!(
        "[",
        "\u{1F600}-\u{1F64F}",
        "\u{1F300}-\u{1F5FF}",
        "\u{1F680}-\u{1F6FF}",
        "\u{1F1E0}-\u{1F1FF}",
        "\u{2702}-\u{27B0}",
        "\u{24C2}-\u{1F251}",
        "\u{200B}-\u{200D}",
        "]+"
    );
    /// Default minimum token length.
    pub const MIN_WORD_LEN: usize = 2;
    /// Default prefixes that discard a word (links and laughter).
    pub const IGNORE_PREFIXES: [&str; 3] = ["http", "www", "kk"];
}

/// Constants used by the linguistic reducer.
pub mod reducer {
    /// Default leading characters that remove a word before stemming.
    pub const IGNORE_CHARS: &str = "@#";
}

/// Constants used by aggregation and size weighting.
pub mod aggregate {
    /// Default number of terms kept in the frequency table.
    pub const MAX_TERMS: usize = 100;
    /// Default n-gram width.
    pub const N_GRAMS: usize = 1;
    /// Size span distributed over the count range.
    pub const SIZE_SCALE: f64 = 100.0;
    /// Size added to every entry.
    pub const SIZE_OFFSET: u64 = 10;
}

/// Constants used by the cloud renderer and the command-line runner.
pub mod render {
    /// Upstream location of the d3 cloud layout script.
    pub const D3_CLOUD_URL: &str =
        "https://raw.githubusercontent.com/jasondavies/d3-cloud/master/build/d3.layout.cloud.js";
    /// File name of the cached d3 cloud layout script.
    pub const D3_CLOUD_FILENAME: &str = "d3.layout.cloud.js";
    /// Default directory for cached render assets.
    pub const DEFAULT_ASSET_DIR: &str = ".wordcloud_assets";
    /// Template placeholder replaced by the layout script.
    pub const SCRIPT_PLACEHOLDER: &str = "{{D3_CLOUD_JS}}";
    /// Template placeholder replaced by the JSON word list.
    pub const WORDS_PLACEHOLDER: &str = "{{WORDS}}";
    /// Suffix appended to the first input's base name for output files.
    pub const OUTPUT_SUFFIX: &str = "_wordcloud";
}
