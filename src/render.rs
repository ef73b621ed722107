//! Self-contained HTML rendering of cloud entries.
//!
//! The layout script is loaded through an [`AssetCache`]: a cached copy on
//! disk wins, otherwise it is fetched once and persisted before use.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::constants::render::{
    D3_CLOUD_FILENAME, D3_CLOUD_URL, SCRIPT_PLACEHOLDER, WORDS_PLACEHOLDER,
};
use crate::data::CloudEntry;
use crate::errors::PipelineError;

/// Embedded default HTML template.
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/wordcloud.html");

/// Retrieves a remote text asset.
pub trait AssetFetcher: Send + Sync {
    /// Body of `url` as text.
    fn fetch(&self, url: &str) -> Result<String, PipelineError>;
}

/// Blocking HTTP fetcher.
#[cfg(feature = "fetch")]
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "fetch")]
impl HttpFetcher {
    /// Fetcher with the default HTTP client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "fetch")]
impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        let unavailable = |reason: String| PipelineError::ResourceUnavailable {
            resource: url.to_string(),
            reason,
        };
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| unavailable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }
        response.text().map_err(|err| unavailable(err.to_string()))
    }
}

/// Fetcher that never reaches the network; only cached assets can be used.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineFetcher;

impl AssetFetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> Result<String, PipelineError> {
        Err(PipelineError::ResourceUnavailable {
            resource: url.to_string(),
            reason: "network fetching is disabled".to_string(),
        })
    }
}

#[cfg(feature = "fetch")]
fn default_fetcher() -> Box<dyn AssetFetcher> {
    Box::new(HttpFetcher::new())
}

#[cfg(not(feature = "fetch"))]
fn default_fetcher() -> Box<dyn AssetFetcher> {
    Box::new(OfflineFetcher)
}

/// Cache-or-fetch access to one remote text asset.
pub struct AssetCache {
    path: PathBuf,
    url: String,
    fetcher: Box<dyn AssetFetcher>,
}

impl fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetCache")
            .field("path", &self.path)
            .field("url", &self.url)
            .finish()
    }
}

impl AssetCache {
    /// Cache of `url` at `path`, filled by `fetcher`.
    pub fn new(
        path: impl Into<PathBuf>,
        url: impl Into<String>,
        fetcher: impl AssetFetcher + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
            fetcher: Box::new(fetcher),
        }
    }

    /// The d3 cloud layout script cached under `dir`, fetched with the
    /// default fetcher for this build.
    pub fn d3_cloud(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(D3_CLOUD_FILENAME),
            url: D3_CLOUD_URL.to_string(),
            fetcher: default_fetcher(),
        }
    }

    /// Local cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remote location of the asset.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Cached content if present; otherwise fetch, persist, then return it.
    pub fn load(&self) -> Result<String, PipelineError> {
        if self.path.is_file() {
            debug!(path = %self.path.display(), "using cached asset");
            return fs::read_to_string(&self.path).map_err(|err| self.unavailable(err));
        }

        info!(url = %self.url, "fetching asset");
        let content = self.fetcher.fetch(&self.url)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| self.unavailable(err))?;
        }
        fs::write(&self.path, &content).map_err(|err| self.unavailable(err))?;
        debug!(path = %self.path.display(), bytes = content.len(), "cached asset");
        Ok(content)
    }

    fn unavailable(&self, err: impl fmt::Display) -> PipelineError {
        PipelineError::ResourceUnavailable {
            resource: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Fills an HTML template with the layout script and the word list.
#[derive(Debug)]
pub struct CloudRenderer {
    template: String,
    assets: AssetCache,
}

impl CloudRenderer {
    /// Renderer using the embedded template.
    pub fn new(assets: AssetCache) -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            assets,
        }
    }

    /// Use a custom template; it must contain both placeholders.
    pub fn with_template(mut self, template: impl Into<String>) -> Result<Self, PipelineError> {
        let template = template.into();
        for placeholder in [SCRIPT_PLACEHOLDER, WORDS_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(PipelineError::Configuration(format!(
                    "template is missing the {placeholder} placeholder"
                )));
            }
        }
        self.template = template;
        Ok(self)
    }

    /// Asset cache used for the layout script.
    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    /// Render `entries` into a complete HTML document.
    pub fn render(&self, entries: &[CloudEntry]) -> Result<String, PipelineError> {
        let script = self.assets.load()?;
        let words = serde_json::to_string_pretty(entries).map_err(|err| {
            PipelineError::Configuration(format!("cloud entries are not serializable: {err}"))
        })?;
        debug!(entries = entries.len(), "rendering cloud");
        Ok(fill_template(
            &self.template,
            &[
                (SCRIPT_PLACEHOLDER, script.as_str()),
                (WORDS_PLACEHOLDER, words.as_str()),
            ],
        ))
    }
}

/// Single left-to-right pass, so substituted values are never rescanned.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = values
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|at| (at, *key, *value)))
            .min_by_key(|(at, _, _)| *at);
        let Some((at, key, value)) = next else {
            filled.push_str(rest);
            return filled;
        };
        filled.push_str(&rest[..at]);
        filled.push_str(value);
        rest = &rest[at + key.len()..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[derive(Clone, Default)]
    struct CountingFetcher {
        calls: Arc<AtomicUsize>,
    }

    impl AssetFetcher for CountingFetcher {
        fn fetch(&self, _url: &str) -> Result<String, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("/* layout */".to_string())
        }
    }

    fn entries() -> Vec<CloudEntry> {
        vec![CloudEntry {
            text: "cafe".into(),
            size: 110,
        }]
    }

    #[test]
    fn fetches_once_then_reads_cache() {
        let temp = tempdir().unwrap();
        let fetcher = CountingFetcher::default();
        let cache = AssetCache::new(
            temp.path().join("assets/d3.js"),
            "https://example.invalid/d3.js",
            fetcher.clone(),
        );
        assert_eq!(cache.load().unwrap(), "/* layout */");
        assert!(cache.path().is_file());
        assert_eq!(cache.load().unwrap(), "/* layout */");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn render_substitutes_script_and_words() {
        let temp = tempdir().unwrap();
        let cache = AssetCache::new(
            temp.path().join("d3.js"),
            "https://example.invalid/d3.js",
            CountingFetcher::default(),
        );
        let html = CloudRenderer::new(cache).render(&entries()).unwrap();
        assert!(html.contains("/* layout */"));
        assert!(html.contains("\"text\": \"cafe\""));
        assert!(html.contains("\"size\": 110"));
        assert!(!html.contains(SCRIPT_PLACEHOLDER));
        assert!(!html.contains(WORDS_PLACEHOLDER));
    }

    #[test]
    fn missing_asset_without_network_is_unavailable() {
        let temp = tempdir().unwrap();
        let cache = AssetCache::new(temp.path().join("d3.js"), D3_CLOUD_URL, OfflineFetcher);
        let err = CloudRenderer::new(cache).render(&entries()).unwrap_err();
        assert!(matches!(err, PipelineError::ResourceUnavailable { .. }));
    }

    #[test]
    fn cached_asset_is_used_without_fetching() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("d3.js");
        fs::write(&path, "cached").unwrap();
        let cache = AssetCache::new(&path, D3_CLOUD_URL, OfflineFetcher);
        assert_eq!(cache.load().unwrap(), "cached");
    }

    #[test]
    fn custom_template_requires_placeholders() {
        let temp = tempdir().unwrap();
        let renderer = CloudRenderer::new(AssetCache::d3_cloud(temp.path()));
        let err = renderer.with_template("<html></html>").unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let filled = fill_template("{{A}}-{{B}}", &[("{{A}}", "{{B}}"), ("{{B}}", "b")]);
        assert_eq!(filled, "{{B}}-b");
    }
}
