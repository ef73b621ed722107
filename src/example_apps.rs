use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};
use tracing::info;

use crate::aggregate::normalize_weights;
use crate::config::{LoaderOptions, NormalizerConfig, PipelineConfig};
use crate::constants::aggregate::{MAX_TERMS, N_GRAMS};
use crate::constants::normalizer::MIN_WORD_LEN;
use crate::constants::reducer::IGNORE_CHARS;
use crate::constants::render::DEFAULT_ASSET_DIR;
use crate::export::write_table_csv;
use crate::pipeline::PipelineBuilder;
use crate::render::{AssetCache, CloudRenderer};
use crate::source::SourceDescriptor;
use crate::stopwords::StopwordList;
use crate::transport::fs::{discover_inputs, output_target};

#[derive(Debug, Parser)]
#[command(
    name = "wordcloud-nlp",
    disable_help_subcommand = true,
    about = "Build a word cloud from text files, tables and JSON",
    long_about = "Load records from every input, normalize and optionally stem them, count n-grams, then write a CSV frequency table and an HTML word cloud.",
    after_help = "Folders expand to their direct child files in name order. Set RUST_LOG=debug to trace each stage."
)]
struct WordcloudCli {
    #[arg(
        required = true,
        value_name = "INPUT",
        help = "Input files or folders"
    )]
    inputs: Vec<PathBuf>,
    #[arg(
        short = 'o',
        long = "output-name",
        value_name = "PATH",
        help = "Output file name and/or folder (default: <first input>_wordcloud)"
    )]
    output: Option<PathBuf>,
    #[arg(short = 'n', long = "n-grams", default_value_t = N_GRAMS, help = "Length of n-grams")]
    n_grams: usize,
    #[arg(
        short = 'w',
        long = "max-words",
        default_value_t = MAX_TERMS,
        help = "Maximum words in the cloud"
    )]
    max_words: usize,
    #[arg(
        short = 'x',
        long = "exclude-words",
        value_delimiter = ',',
        help = "Extra words left out of the cloud (comma separated)"
    )]
    exclude_words: Vec<String>,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Column names or positions (comma separated)"
    )]
    column: Vec<String>,
    #[arg(
        long,
        value_parser = parse_delimiter_arg,
        help = "Table delimiter (a single character, or \\t)"
    )]
    delimiter: Option<char>,
    #[arg(long, help = "Number of rows skipped before a table header")]
    skiprows: Option<usize>,
    #[arg(
        long = "min-word-len",
        default_value_t = MIN_WORD_LEN,
        help = "Minimum word length for the tokenizer"
    )]
    min_word_len: usize,
    #[arg(
        long = "ignore-startswith",
        value_delimiter = ',',
        help = "Word prefixes dropped by the tokenizer (comma separated; default: http,www,kk)"
    )]
    ignore_startswith: Option<Vec<String>>,
    #[arg(
        long = "ignore-startswith-chars",
        default_value = IGNORE_CHARS,
        help = "Leading characters that drop a word before stemming"
    )]
    ignore_startswith_chars: String,
    #[arg(long = "lang-stemmer", help = "Stemmer language (ISO 639-1 code or name)")]
    lang_stemmer: Option<String>,
    #[arg(
        long = "lang-stopwords",
        default_value = "all",
        help = "Stopword list for the tokenizer (all, none, english, portuguese, spanish, french, german, italian)"
    )]
    lang_stopwords: StopwordList,
    #[arg(long = "no-stopwords", help = "Do not filter stopwords")]
    no_stopwords: bool,
    #[arg(long = "no-tokens", help = "Skip the tokenizer stage")]
    no_tokens: bool,
    #[arg(long = "use-stemmer", help = "Add the Snowball stemmer stage")]
    use_stemmer: bool,
    #[arg(
        long = "json-document",
        help = "Read .json files as one document instead of JSON lines"
    )]
    json_document: bool,
    #[arg(long = "drop-duplicates", help = "Drop repeated records")]
    drop_duplicates: bool,
    #[arg(long, help = "Drop missing records")]
    dropna: bool,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Columns used to sort records in descending order (comma separated)"
    )]
    sort: Vec<String>,
    #[arg(
        long = "asset-dir",
        default_value = DEFAULT_ASSET_DIR,
        value_name = "PATH",
        help = "Folder caching the d3 cloud layout script"
    )]
    asset_dir: PathBuf,
}

impl WordcloudCli {
    fn pipeline_config(&self) -> PipelineConfig {
        let mut loader = LoaderOptions::default()
            .with_columns(self.column.iter().cloned())
            .with_sort_keys(self.sort.iter().cloned())
            .with_skip_rows(self.skiprows.unwrap_or(0))
            .with_drop_duplicates(self.drop_duplicates)
            .with_drop_missing(self.dropna)
            .with_json_records(!self.json_document);
        if let Some(delimiter) = self.delimiter {
            loader = loader.with_delimiter(delimiter);
        }

        let mut normalizer = NormalizerConfig::default().with_min_word_len(self.min_word_len);
        if let Some(prefixes) = &self.ignore_startswith {
            normalizer = normalizer.with_ignore_prefixes(prefixes.iter().cloned());
        }
        if !self.no_stopwords {
            normalizer = normalizer.with_stopword_list(self.lang_stopwords);
        }

        PipelineConfig {
            loader,
            normalizer,
            use_tokens: !self.no_tokens,
            use_stemmer: self.use_stemmer,
            lang: self.lang_stemmer.clone(),
            ignore_chars: self.ignore_startswith_chars.clone(),
            n_grams: Some(self.n_grams),
            // The CSV export keeps every term; the cloud is truncated later.
            max_terms: None,
            exclude_terms: self.exclude_words.clone(),
            ..PipelineConfig::default()
        }
    }
}

/// Run the word cloud command line.
///
/// Writes `<name>.csv` (every counted term) before rendering `<name>.html`
/// (the top `--max-words` terms), so a failed render keeps the counts.
pub fn run_wordcloud<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<WordcloudCli, _>(std::iter::once("wordcloud-nlp".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let files = discover_inputs(&cli.inputs);
    if files.is_empty() {
        return Err("no input files found".into());
    }
    let (folder, name) = output_target(files.first().map(PathBuf::as_path), cli.output.as_deref());
    fs::create_dir_all(&folder)?;

    let pipeline = PipelineBuilder::from_config(cli.pipeline_config()).build()?;
    let sources: Vec<SourceDescriptor> = files.iter().map(SourceDescriptor::path).collect();
    let output = pipeline.run(&sources)?;

    let csv_path = folder.join(format!("{name}.csv"));
    write_table_csv(&output.table, &csv_path)?;
    println!("frequency table: {}", csv_path.display());

    let mut top = output.table.clone();
    top.truncate(cli.max_words);
    let renderer = CloudRenderer::new(AssetCache::d3_cloud(&cli.asset_dir));
    let html = renderer.render(&normalize_weights(&top))?;
    let html_path = folder.join(format!("{name}.html"));
    fs::write(&html_path, html)?;
    println!("word cloud: {}", html_path.display());

    info!(
        inputs = files.len(),
        records = output.records.len(),
        terms = output.table.len(),
        cloud_terms = top.len(),
        "word cloud written"
    );
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_delimiter_arg(raw: &str) -> Result<char, String> {
    if raw == "\\t" || raw.eq_ignore_ascii_case("tab") {
        return Ok('\t');
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(delimiter), None) => Ok(delimiter),
        _ => Err(format!("--delimiter expects a single character, got '{raw}'")),
    }
}
