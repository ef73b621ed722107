/// Identifier for the source that produced a record.
/// Examples: `data/tweets.csv`, `memory[0]`
pub type SourceId = String;
/// Table column name (or 0-based position rendered as text).
/// Examples: `text`, `full_text`, `2`
pub type ColumnName = String;
/// Raw record text as read from a source.
/// Example: `RT @user: Café com leite ☕ https://t.co/x`
pub type RecordText = String;
/// A normalized term counted by the aggregator (a token or a joined n-gram).
/// Examples: `cafe`, `leite quente`
pub type Term = String;
/// Language hint passed to a reducer (ISO 639-1 code or English name).
/// Examples: `pt`, `english`
pub type LangCode = String;
/// Position of a record in the concatenated input, before any filtering.
pub type OriginIndex = usize;
