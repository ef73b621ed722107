//! Ordered processing stages from loaded records to a frequency table.
//!
//! Stage order is fixed by [`PipelineBuilder`]:
//! normalize, lemma, stem, n-grams. Aggregation always runs last and
//! consumes whatever the final stage produced.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::aggregate::{aggregate, normalize_weights, split_terms};
use crate::config::PipelineConfig;
use crate::data::{CloudEntry, FrequencyTable, RecordSet};
use crate::errors::PipelineError;
use crate::ngrams::record_ngrams;
use crate::normalize::Normalizer;
use crate::reduce::{Reducer, SnowballReducer};
use crate::source::{SourceDescriptor, SourceLoader};
use crate::types::{LangCode, Term};

/// Data flowing between stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Batch {
    /// One text per record, lines separated by `\n`.
    Texts(Vec<String>),
    /// One term list per record.
    Terms(Vec<Vec<Term>>),
}

impl Batch {
    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        match self {
            Self::Texts(texts) => texts.len(),
            Self::Terms(terms) => terms.len(),
        }
    }

    /// Whether the batch has no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Term lists for aggregation; texts are split on whitespace.
    pub fn into_terms(self) -> Vec<Vec<Term>> {
        match self {
            Self::Texts(texts) => split_terms(&texts),
            Self::Terms(terms) => terms,
        }
    }

    fn into_texts(self, stage: &str) -> Result<Vec<String>, PipelineError> {
        match self {
            Self::Texts(texts) => Ok(texts),
            Self::Terms(_) => Err(PipelineError::Configuration(format!(
                "stage '{stage}' expects record texts but received terms"
            ))),
        }
    }
}

/// One batch-to-batch processing step.
pub trait Stage: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;
    /// Turn one batch into the next; record count is preserved.
    fn transform(&self, batch: Batch) -> Result<Batch, PipelineError>;
}

/// Text normalization stage.
#[derive(Clone, Debug, Default)]
pub struct NormalizeStage {
    normalizer: Normalizer,
}

impl NormalizeStage {
    /// Tokenizer stage named `token`.
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }
}

impl Stage for NormalizeStage {
    fn name(&self) -> &str {
        "token"
    }

    fn transform(&self, batch: Batch) -> Result<Batch, PipelineError> {
        let texts = batch.into_texts(self.name())?;
        Ok(Batch::Texts(self.normalizer.normalize(&texts)))
    }
}

/// Applies a [`Reducer`] to every record with an optional language hint.
pub struct ReduceStage {
    name: String,
    reducer: Arc<dyn Reducer>,
    lang: Option<LangCode>,
}

impl ReduceStage {
    /// Reducer stage; `lang` is passed as the language hint.
    pub fn new(name: impl Into<String>, reducer: Arc<dyn Reducer>, lang: Option<LangCode>) -> Self {
        Self {
            name: name.into(),
            reducer,
            lang,
        }
    }
}

impl fmt::Debug for ReduceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReduceStage")
            .field("name", &self.name)
            .field("lang", &self.lang)
            .finish()
    }
}

impl Stage for ReduceStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, batch: Batch) -> Result<Batch, PipelineError> {
        let texts = batch.into_texts(self.name())?;
        let lang = self.lang.as_deref();
        Ok(Batch::Texts(
            texts
                .iter()
                .map(|text| self.reducer.reduce(text, lang))
                .collect(),
        ))
    }
}

/// Per-record n-gram extraction; windows never span a line break.
#[derive(Clone, Copy, Debug)]
pub struct NGramStage {
    n: usize,
}

impl NGramStage {
    /// `n` must be at least 1.
    pub fn new(n: usize) -> Result<Self, PipelineError> {
        if n == 0 {
            return Err(PipelineError::Configuration(
                "n-gram width must be at least 1".to_string(),
            ));
        }
        Ok(Self { n })
    }

    /// Window width.
    pub fn n(&self) -> usize {
        self.n
    }
}

impl Stage for NGramStage {
    fn name(&self) -> &str {
        "ngrams"
    }

    fn transform(&self, batch: Batch) -> Result<Batch, PipelineError> {
        let texts = batch.into_texts(self.name())?;
        Ok(Batch::Terms(
            texts
                .iter()
                .map(|text| record_ngrams(text, self.n))
                .collect(),
        ))
    }
}

/// Result of one pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    /// Records as loaded, before any stage ran.
    pub records: RecordSet,
    /// Terms per record after the final stage.
    pub terms: Vec<Vec<Term>>,
    /// Ranked, filtered and truncated counts.
    pub table: FrequencyTable,
}

impl PipelineOutput {
    /// Cloud entries with normalized sizes, in table order.
    pub fn entries(&self) -> Vec<CloudEntry> {
        normalize_weights(&self.table)
    }
}

/// Loader plus an ordered list of stages and the aggregation settings.
pub struct Pipeline {
    loader: SourceLoader,
    stages: Vec<Box<dyn Stage>>,
    max_terms: Option<usize>,
    exclude_terms: Vec<Term>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<&str> = self.stages.iter().map(|stage| stage.name()).collect();
        f.debug_struct("Pipeline")
            .field("loader", &self.loader)
            .field("stages", &stages)
            .field("max_terms", &self.max_terms)
            .field("exclude_terms", &self.exclude_terms)
            .finish()
    }
}

impl Pipeline {
    /// Stage names, in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Load `sources` and run every stage over the records.
    pub fn run(&self, sources: &[SourceDescriptor]) -> Result<PipelineOutput, PipelineError> {
        let records = self.loader.load(sources)?;
        self.run_records(records)
    }

    /// Run every stage over already loaded records.
    pub fn run_records(&self, records: RecordSet) -> Result<PipelineOutput, PipelineError> {
        let mut batch = Batch::Texts(records.texts());
        for stage in &self.stages {
            debug!(stage = stage.name(), records = batch.len(), "running stage");
            batch = stage.transform(batch)?;
        }
        let terms = batch.into_terms();
        let table = aggregate(&terms, self.max_terms, &self.exclude_terms);
        info!(
            records = records.len(),
            dropped = records.dropped().len(),
            terms = table.len(),
            "pipeline finished"
        );
        Ok(PipelineOutput {
            records,
            terms,
            table,
        })
    }

    /// Run every stage over in-memory texts.
    pub fn run_texts<I, S>(&self, texts: I) -> Result<PipelineOutput, PipelineError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run(&[SourceDescriptor::memory(texts)])
    }
}

/// Assembles a [`Pipeline`] from a [`PipelineConfig`].
pub struct PipelineBuilder {
    config: PipelineConfig,
    stemmer: Option<Arc<dyn Reducer>>,
    lemmatizer: Option<Arc<dyn Reducer>>,
}

impl PipelineBuilder {
    /// Builder with the stages `config` enables.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self {
            config,
            stemmer: None,
            lemmatizer: None,
        }
    }

    /// Replace the default Snowball stemmer used when `use_stemmer` is set.
    pub fn with_reducer(mut self, reducer: Arc<dyn Reducer>) -> Self {
        self.stemmer = Some(reducer);
        self
    }

    /// Insert a lemma stage (before stemming) backed by `lemmatizer`.
    pub fn with_lemmatizer(mut self, lemmatizer: Arc<dyn Reducer>) -> Self {
        self.lemmatizer = Some(lemmatizer);
        self
    }

    /// Assemble the stages in order: token, lemma, stem, n-grams.
    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let config = self.config;
        let mut stages: Vec<Box<dyn Stage>> = Vec::new();

        if config.use_tokens {
            let normalizer = Normalizer::new(&config.normalizer);
            stages.push(Box::new(NormalizeStage::new(normalizer)));
        }
        if let Some(lemmatizer) = self.lemmatizer {
            stages.push(Box::new(ReduceStage::new(
                "lemma",
                lemmatizer,
                config.lang.clone(),
            )));
        }
        if config.use_stemmer {
            let stemmer = self.stemmer.unwrap_or_else(|| {
                Arc::new(
                    SnowballReducer::default()
                        .with_ignore_chars(config.ignore_chars.clone())
                        .with_ignore_stopwords(config.ignore_stopwords),
                )
            });
            stages.push(Box::new(ReduceStage::new(
                "stem",
                stemmer,
                config.lang.clone(),
            )));
        }
        if let Some(n) = config.n_grams {
            stages.push(Box::new(NGramStage::new(n)?));
        }

        let pipeline = Pipeline {
            loader: SourceLoader::new(config.loader),
            stages,
            max_terms: config.max_terms,
            exclude_terms: config.exclude_terms,
        };
        debug!(stages = ?pipeline.stage_names(), "built pipeline");
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizerConfig;

    struct Upper;

    impl Reducer for Upper {
        fn reduce(&self, sentence: &str, _lang: Option<&str>) -> String {
            sentence.to_uppercase()
        }
    }

    fn plain_config() -> PipelineConfig {
        PipelineConfig {
            normalizer: NormalizerConfig::default().with_min_word_len(1),
            max_terms: Some(10),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn counts_terms_across_records() {
        let pipeline = PipelineBuilder::from_config(plain_config()).build().unwrap();
        let output = pipeline
            .run_texts(["the cat sat", "the dog sat", "the cat ran"])
            .unwrap();
        let counts: Vec<(&str, u64)> = output.table.iter().collect();
        assert_eq!(
            counts,
            vec![("the", 3), ("cat", 2), ("sat", 2), ("dog", 1), ("ran", 1)]
        );
        assert_eq!(output.table.top(), Some(("the", 3)));
        assert_eq!(output.terms.len(), 3);
    }

    #[test]
    fn stage_order_follows_toggles() {
        let config = PipelineConfig {
            use_stemmer: true,
            n_grams: Some(2),
            ..PipelineConfig::default()
        };
        let pipeline = PipelineBuilder::from_config(config)
            .with_lemmatizer(Arc::new(Upper))
            .build()
            .unwrap();
        assert_eq!(pipeline.stage_names(), vec!["token", "lemma", "stem", "ngrams"]);

        let config = PipelineConfig {
            use_tokens: false,
            n_grams: None,
            ..PipelineConfig::default()
        };
        let pipeline = PipelineBuilder::from_config(config).build().unwrap();
        assert!(pipeline.stage_names().is_empty());
    }

    #[test]
    fn zero_width_ngrams_are_rejected() {
        let config = PipelineConfig {
            n_grams: Some(0),
            ..PipelineConfig::default()
        };
        let err = PipelineBuilder::from_config(config).build().unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn bigrams_stay_within_lines() {
        let pipeline = PipelineBuilder::from_config(PipelineConfig {
            n_grams: Some(2),
            ..plain_config()
        })
        .build()
        .unwrap();
        let output = pipeline.run_texts(["red fox\nblue fox"]).unwrap();
        assert_eq!(output.terms, vec![vec!["red fox", "blue fox"]]);
    }

    #[test]
    fn custom_reducer_replaces_the_stemmer() {
        let config = PipelineConfig {
            use_stemmer: true,
            ..plain_config()
        };
        let pipeline = PipelineBuilder::from_config(config)
            .with_reducer(Arc::new(Upper))
            .build()
            .unwrap();
        let output = pipeline.run_texts(["quiet cat"]).unwrap();
        assert_eq!(output.table.get("CAT"), Some(1));
    }

    #[test]
    fn excluded_terms_and_weights() {
        let config = PipelineConfig {
            exclude_terms: vec!["cat".into(), "zebra".into()],
            ..plain_config()
        };
        let pipeline = PipelineBuilder::from_config(config).build().unwrap();
        let output = pipeline.run_texts(["cat dog dog"]).unwrap();
        assert_eq!(output.table.get("cat"), None);
        let entries = output.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "dog");
        assert_eq!(entries[0].size, 210);
    }

    #[test]
    fn term_batches_are_rejected_by_text_stages() {
        let stage = NormalizeStage::default();
        let err = stage
            .transform(Batch::Terms(vec![vec!["a".into()]]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }
}
