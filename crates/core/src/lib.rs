//! Turn a blog post URL into schema.org `BlogPosting` JSON-LD.
//!
//! The work happens in four sequential stages: [`fetch_url`] retrieves the
//! page, [`extract`] derives structured fields from the HTML, [`Analyzer`]
//! counts words and asks an AI service for keywords, and [`build`] assembles
//! the JSON-LD document. [`Pipeline`] runs them in order.
//!
//! ```rust
//! use blogld_core::{AnalysisResult, BuildConfig, RawPage, build, extract, word_count};
//! use url::Url;
//!
//! let page = RawPage {
//!     html: r#"<meta property="og:title" content="Example Post"><p>Hello world example text</p>"#.to_string(),
//!     base_url: Url::parse("https://example.com/post").unwrap(),
//!     requested_url: "https://example.com/post".to_string(),
//! };
//! let content = extract(&page).unwrap();
//! let words = word_count(&content.body_text);
//! let analysis = AnalysisResult { word_count: words, reading_time_minutes: 1, keywords: vec![], warning: None };
//! let schema = build(&content, &analysis, &BuildConfig::default()).unwrap();
//!
//! assert_eq!(schema.headline.as_deref(), Some("Example Post"));
//! assert_eq!(schema.word_count, 4);
//! ```

pub mod analyze;
pub mod content;
pub mod date;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod metadata;
pub mod parse;
pub mod pipeline;
pub mod schema;

pub use analyze::{AnalysisResult, AnalysisWarning, AnalyzeConfig, Analyzer, ChatKeywordService, KeywordService};
pub use analyze::{truncate_chars, word_count};
pub use content::ContentRegion;
pub use date::PublishedDate;
pub use error::{BlogLdError, FetchCause, Result};
pub use extract::{ExtractConfig, ExtractedContent, extract, extract_with_config};
pub use fetch::{FetchConfig, RawPage, fetch_url, read_file, validate_url};
pub use parse::Document;
pub use pipeline::{Pipeline, PipelineConfig, PipelineConfigBuilder, PipelineObserver, PipelineOutput, generate};
pub use schema::{BlogPostingSchema, BreadcrumbList, BuildConfig, ListItem, NamedNode, NodeRef, build};
