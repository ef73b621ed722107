#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Term counting, top-K truncation and size weighting.
pub mod aggregate;
/// Loader, normalizer and pipeline configuration types.
pub mod config;
/// Centralized constants used across loading, normalization and rendering.
pub mod constants;
/// Record, frequency table and cloud entry types.
pub mod data;
/// Reusable command-line runner for the `wordcloud-nlp` binary.
pub mod example_apps;
/// CSV export of frequency tables.
pub mod export;
/// N-gram windows over token sequences.
pub mod ngrams;
/// Text normalization.
pub mod normalize;
/// Stage pipeline from records to a frequency table.
pub mod pipeline;
/// Linguistic reducers (Snowball stemming, language tables and detection).
pub mod reduce;
/// HTML word cloud rendering and asset caching.
pub mod render;
/// Source descriptors and the multi-source loader.
pub mod source;
/// Built-in stopword lists.
pub mod stopwords;
/// Input transports used by the loader (filesystem today).
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use aggregate::{aggregate, normalize_weights};
pub use config::{ColumnSelection, LoaderOptions, NormalizerConfig, PipelineConfig, RecordTransform};
pub use data::{CloudEntry, FrequencyTable, Record, RecordSet};
pub use errors::PipelineError;
pub use normalize::Normalizer;
pub use pipeline::{Batch, Pipeline, PipelineBuilder, PipelineOutput, Stage};
pub use reduce::{LanguageDetector, LanguageTable, Reducer, SnowballReducer, StopwordDetector};
pub use render::{AssetCache, AssetFetcher, CloudRenderer};
pub use source::{SourceDescriptor, SourceLoader, load};
pub use stopwords::StopwordList;
pub use types::{ColumnName, LangCode, OriginIndex, RecordText, SourceId, Term};
