//! Field extraction from a fetched page into [`ExtractedContent`].

use serde::Serialize;

use crate::content::ContentRegion;
use crate::date::PublishedDate;
use crate::fetch::RawPage;
use crate::parse::Document;
use crate::Result;

/// Configuration for field extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Minimum declared width/height (px) for an in-content image to be used
    /// when the page has no Open Graph image.
    pub min_image_size: u32,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { min_image_size: 200 }
    }
}

/// Structured fields derived from a fetched page.
///
/// Every field except `body_text` and `source_url` is optional. `source_url`
/// is always the URL the caller originally requested, even when the page was
/// served from a redirect target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedContent {
    pub headline: Option<String>,
    pub author: Option<String>,
    pub publish_date: Option<PublishedDate>,
    pub modified_date: Option<PublishedDate>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub site_name: Option<String>,
    pub language: Option<String>,
    pub body_text: String,
    pub source_url: String,
}

/// Extract fields from a page using the default configuration.
pub fn extract(page: &RawPage) -> Result<ExtractedContent> {
    extract_with_config(page, &ExtractConfig::default())
}

/// Extract fields from a page.
///
/// Missing fields never cause a failure; the only error is
/// [`BlogLdError::Parse`](crate::BlogLdError::Parse) for input that is not
/// HTML at all.
#[tracing::instrument(skip_all, fields(url = %page.requested_url))]
pub fn extract_with_config(page: &RawPage, config: &ExtractConfig) -> Result<ExtractedContent> {
    let doc = Document::parse(&page.html)?;
    let region = ContentRegion::locate(&doc)?;

    let image_url = doc
        .extract_meta_image(&page.base_url)
        .or_else(|| region.lead_image(&page.base_url, config.min_image_size));

    let content = ExtractedContent {
        headline: doc.extract_headline(),
        author: doc.extract_author(),
        publish_date: doc.extract_published_date(),
        modified_date: doc.extract_modified_date(),
        description: doc.extract_description(),
        image_url,
        site_name: doc.extract_site_name(&page.base_url),
        language: doc.language(),
        body_text: region.body_text(),
        source_url: page.requested_url.clone(),
    };

    tracing::debug!(
        headline = content.headline.is_some(),
        author = content.author.is_some(),
        date = content.publish_date.is_some(),
        image = content.image_url.is_some(),
        body_chars = content.body_text.len(),
        "extracted fields"
    );

    Ok(content)
}
