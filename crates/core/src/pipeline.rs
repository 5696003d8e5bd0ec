//! End-to-end generation: fetch, extract, analyze, build.
//!
//! The main entry point is [`Pipeline`], along with the convenience function
//! [`generate`].
//!
//! # Example
//!
//! ```rust,no_run
//! use blogld_core::{Pipeline, PipelineConfig};
//!
//! # async fn example() -> blogld_core::Result<()> {
//! let config = PipelineConfig::builder().timeout(10).max_keywords(5).build();
//! let pipeline = Pipeline::new(config);
//! let output = pipeline.run("https://example.com/blog/post", None, &mut ()).await?;
//! println!("{}", output.schema.to_json(true)?);
//! # Ok(())
//! # }
//! ```

use tracing::info;

use crate::analyze::{AnalysisResult, AnalysisWarning, AnalyzeConfig, Analyzer, KeywordService};
use crate::extract::{ExtractConfig, ExtractedContent, extract_with_config};
use crate::fetch::{FetchConfig, RawPage, fetch_url};
use crate::schema::{BlogPostingSchema, BuildConfig, build};
use crate::Result;

/// Configuration for every pipeline stage.
///
/// # Example
///
/// ```rust
/// use blogld_core::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .timeout(10)
///     .ai_timeout(5)
///     .include_article_body(true)
///     .build();
/// assert_eq!(config.fetch.timeout, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
    pub analyze: AnalyzeConfig,
    pub build: BuildConfig,
}

impl PipelineConfig {
    /// Creates a new builder for PipelineConfig.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }
}

/// Builder for PipelineConfig.
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: PipelineConfig::default() }
    }

    /// Sets the page fetch timeout in seconds.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.config.fetch.timeout = secs;
        self
    }

    /// Sets the User-Agent sent when fetching the page.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Sets the minimum size for in-content images.
    pub fn min_image_size(mut self, px: u32) -> Self {
        self.config.extract.min_image_size = px;
        self
    }

    /// Sets the keyword request timeout in seconds.
    pub fn ai_timeout(mut self, secs: u64) -> Self {
        self.config.analyze.timeout = secs;
        self
    }

    /// Sets the keyword service base URL.
    pub fn endpoint(mut self, value: impl Into<String>) -> Self {
        self.config.analyze.endpoint = value.into();
        self
    }

    /// Sets the keyword model name.
    pub fn model(mut self, value: impl Into<String>) -> Self {
        self.config.analyze.model = value.into();
        self
    }

    pub fn max_keywords(mut self, value: usize) -> Self {
        self.config.analyze.max_keywords = value;
        self
    }

    pub fn max_input_chars(mut self, value: usize) -> Self {
        self.config.analyze.max_input_chars = value;
        self
    }

    /// Sets whether `articleBody` is emitted.
    pub fn include_article_body(mut self, value: bool) -> Self {
        self.config.build.include_article_body = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Callbacks invoked after each completed stage.
///
/// All methods default to doing nothing. `()` implements this trait for
/// callers that do not need progress reporting.
pub trait PipelineObserver {
    fn on_fetched(&mut self, _page: &RawPage) {}
    fn on_extracted(&mut self, _content: &ExtractedContent) {}
    fn on_analyzed(&mut self, _analysis: &AnalysisResult) {}
    fn on_built(&mut self, _schema: &BlogPostingSchema) {}
}

impl PipelineObserver for () {}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub content: ExtractedContent,
    pub analysis: AnalysisResult,
    pub schema: BlogPostingSchema,
    /// Non-fatal problems encountered along the way.
    pub warnings: Vec<AnalysisWarning>,
}

/// Runs the four stages strictly in sequence.
///
/// A fatal error at any stage stops the run; later stages are not started
/// and the observer is not called for them.
pub struct Pipeline {
    config: PipelineConfig,
    analyzer: Analyzer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let analyzer = Analyzer::new(config.analyze.clone());
        Self { config, analyzer }
    }

    /// Creates a pipeline whose keywords come from `service`.
    pub fn with_keyword_service(config: PipelineConfig, service: impl KeywordService + 'static) -> Self {
        let analyzer = Analyzer::with_service(config.analyze.clone(), service);
        Self { config, analyzer }
    }

    /// Fetches `url` and runs the remaining stages on the result.
    pub async fn run(
        &self, url: &str, api_key: Option<&str>, observer: &mut impl PipelineObserver,
    ) -> Result<PipelineOutput> {
        let page = fetch_url(url, &self.config.fetch).await?;
        observer.on_fetched(&page);
        self.run_page(&page, api_key, observer).await
    }

    /// Runs extraction, analysis and schema assembly on an already loaded page.
    pub async fn run_page(
        &self, page: &RawPage, api_key: Option<&str>, observer: &mut impl PipelineObserver,
    ) -> Result<PipelineOutput> {
        let content = extract_with_config(page, &self.config.extract)?;
        observer.on_extracted(&content);

        let analysis = self.analyzer.analyze(&content, api_key).await;
        observer.on_analyzed(&analysis);

        let schema = build(&content, &analysis, &self.config.build)?;
        observer.on_built(&schema);

        let warnings = analysis.warning.iter().cloned().collect();
        info!(
            url = %page.requested_url,
            word_count = analysis.word_count,
            keywords = analysis.keywords.len(),
            "generated schema"
        );

        Ok(PipelineOutput { content, analysis, schema, warnings })
    }
}

/// Generates a schema for `url` with the default configuration.
pub async fn generate(url: &str, api_key: Option<&str>) -> Result<BlogPostingSchema> {
    let output = Pipeline::new(PipelineConfig::default()).run(url, api_key, &mut ()).await?;
    Ok(output.schema)
}
