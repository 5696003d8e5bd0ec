//! schema.org `BlogPosting` JSON-LD assembly.
//!
//! [`build`] is a pure mapping from [`ExtractedContent`] and [`AnalysisResult`]
//! onto [`BlogPostingSchema`]. Absent values are omitted from the JSON output
//! instead of being written as `null`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::analyze::truncate_chars;
use crate::{AnalysisResult, BlogLdError, ExtractedContent, Result};

pub const SCHEMA_CONTEXT: &str = "https://schema.org";
pub const BLOG_POSTING: &str = "BlogPosting";

/// Search engines cut headlines beyond this length.
const MAX_HEADLINE_CHARS: usize = 110;
const MAX_DESCRIPTION_CHARS: usize = 160;
const MAX_ARTICLE_BODY_CHARS: usize = 5000;

/// Configuration for schema assembly
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// Emit `articleBody` with the (truncated) body text
    pub include_article_body: bool,
}

/// A typed node with a name, e.g. `{"@type": "Person", "name": "Jane"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedNode {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
}

impl NamedNode {
    pub fn person(name: impl Into<String>) -> Self {
        Self { kind: "Person".to_string(), name: name.into() }
    }

    pub fn organization(name: impl Into<String>) -> Self {
        Self { kind: "Organization".to_string(), name: name.into() }
    }
}

/// A reference to another node by `@id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "@id")]
    pub id: String,
}

/// Navigation trail derived from the URL path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbList {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "itemListElement")]
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    pub kind: String,
    /// 1-based position in the trail.
    pub position: usize,
    pub name: String,
    pub item: String,
}

impl BreadcrumbList {
    /// Home, one entry per intermediate path segment, then the page itself.
    ///
    /// Returns `None` when the path has fewer than two non-empty segments.
    pub fn from_url(url: &Url, page_name: Option<&str>) -> Option<Self> {
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        if segments.len() < 2 {
            return None;
        }

        let origin = url.origin().ascii_serialization();
        let mut names = vec![("Home".to_string(), origin.clone())];
        let mut path = String::new();
        for segment in &segments[..segments.len() - 1] {
            path.push('/');
            path.push_str(segment);
            names.push((segment_name(segment), format!("{}{}", origin, path)));
        }
        names.push((page_name.unwrap_or("Current Page").to_string(), url.to_string()));

        let items = names
            .into_iter()
            .enumerate()
            .map(|(i, (name, item))| ListItem { kind: "ListItem".to_string(), position: i + 1, name, item })
            .collect();

        Some(Self { kind: "BreadcrumbList".to_string(), items })
    }
}

/// `build-cache` becomes `Build Cache`.
fn segment_name(segment: &str) -> String {
    segment
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map(|first| first.to_uppercase().chain(chars).collect::<String>()).unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// JSON-LD `BlogPosting` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostingSchema {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "@id")]
    pub id: String,
    pub url: String,
    pub main_entity_of_page: NodeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<NamedNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<NamedNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_language: Option<String>,
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_required: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breadcrumb: Option<BreadcrumbList>,
}

impl BlogPostingSchema {
    /// Serialize to a JSON string.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty { serde_json::to_string_pretty(self)? } else { serde_json::to_string(self)? };
        Ok(json)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Wrap the pretty-printed document in a `<script type="application/ld+json">` tag.
    pub fn to_script_tag(&self) -> Result<String> {
        let json = self.to_json(true)?;
        Ok(format!("<script type=\"application/ld+json\">\n{}\n</script>", json.replace("</", "<\\/")))
    }
}

/// Build a `BlogPosting` from extracted content and analysis results.
///
/// Fails with [`BlogLdError::Build`] only when `source_url` is not an
/// absolute URL.
pub fn build(content: &ExtractedContent, analysis: &AnalysisResult, config: &BuildConfig) -> Result<BlogPostingSchema> {
    let url = Url::parse(&content.source_url)
        .map_err(|e| BlogLdError::Build(format!("source URL {:?} is not absolute: {}", content.source_url, e)))?;
    let breadcrumb = BreadcrumbList::from_url(&url, content.headline.as_deref());
    let url = url.to_string();

    let headline = content.headline.as_deref().map(|h| truncate_chars(h, MAX_HEADLINE_CHARS).trim_end().to_string());
    let name = content.headline.clone().filter(|full| Some(full) != headline.as_ref());
    let description =
        content.description.as_deref().map(|d| truncate_chars(d, MAX_DESCRIPTION_CHARS).trim_end().to_string());

    let time_required = (analysis.reading_time_minutes > 0).then(|| format!("PT{}M", analysis.reading_time_minutes));
    let article_body = config
        .include_article_body
        .then(|| truncate_chars(&content.body_text, MAX_ARTICLE_BODY_CHARS).to_string())
        .filter(|body| !body.is_empty());

    let schema = BlogPostingSchema {
        context: SCHEMA_CONTEXT.to_string(),
        kind: BLOG_POSTING.to_string(),
        id: url.clone(),
        main_entity_of_page: NodeRef { kind: "WebPage".to_string(), id: url.clone() },
        url,
        headline,
        name,
        description,
        author: content.author.as_deref().map(NamedNode::person),
        publisher: content.site_name.as_deref().map(NamedNode::organization),
        date_published: content.publish_date.map(|d| d.to_iso8601()),
        date_modified: content.modified_date.map(|d| d.to_iso8601()),
        image: content.image_url.clone(),
        in_language: content.language.clone(),
        word_count: analysis.word_count,
        time_required,
        keywords: analysis.keywords.clone(),
        article_body,
        breadcrumb,
    };

    tracing::debug!(keywords = schema.keywords.len(), word_count = schema.word_count, "built schema");

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PublishedDate;
    use serde_json::Value;

    fn empty_content() -> ExtractedContent {
        ExtractedContent {
            headline: None,
            author: None,
            publish_date: None,
            modified_date: None,
            description: None,
            image_url: None,
            site_name: None,
            language: None,
            body_text: String::new(),
            source_url: "https://blog.example.com/posts/hello".to_string(),
        }
    }

    fn full_content() -> ExtractedContent {
        ExtractedContent {
            headline: Some("Example Post".to_string()),
            author: Some("Jane Doe".to_string()),
            publish_date: PublishedDate::parse_structured("2024-01-15T10:30:00Z"),
            modified_date: PublishedDate::parse_structured("2024-02-01"),
            description: Some("A short post.".to_string()),
            image_url: Some("https://blog.example.com/hero.jpg".to_string()),
            site_name: Some("Example Blog".to_string()),
            language: Some("en".to_string()),
            body_text: "Hello world example text".to_string(),
            source_url: "https://blog.example.com/posts/hello".to_string(),
        }
    }

    fn analysis(words: usize, keywords: &[&str]) -> AnalysisResult {
        AnalysisResult {
            word_count: words,
            reading_time_minutes: words.div_ceil(200),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            warning: None,
        }
    }

    #[test]
    fn test_full_mapping() {
        let schema = build(&full_content(), &analysis(4, &["rust", "json-ld"]), &BuildConfig::default()).unwrap();
        let value = schema.to_value().unwrap();

        assert_eq!(value["@context"], "https://schema.org");
        assert_eq!(value["@type"], "BlogPosting");
        assert_eq!(value["@id"], "https://blog.example.com/posts/hello");
        assert_eq!(value["mainEntityOfPage"]["@type"], "WebPage");
        assert_eq!(value["headline"], "Example Post");
        assert_eq!(value["author"]["@type"], "Person");
        assert_eq!(value["author"]["name"], "Jane Doe");
        assert_eq!(value["publisher"]["@type"], "Organization");
        assert_eq!(value["datePublished"], "2024-01-15T10:30:00Z");
        assert_eq!(value["dateModified"], "2024-02-01");
        assert_eq!(value["image"], "https://blog.example.com/hero.jpg");
        assert_eq!(value["inLanguage"], "en");
        assert_eq!(value["wordCount"], 4);
        assert_eq!(value["timeRequired"], "PT1M");
        assert_eq!(value["keywords"], serde_json::json!(["rust", "json-ld"]));
        assert!(value.get("name").is_none());
        assert!(value.get("articleBody").is_none());
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let schema = build(&empty_content(), &analysis(0, &[]), &BuildConfig::default()).unwrap();
        let value = schema.to_value().unwrap();
        let obj = value.as_object().unwrap();

        assert!(obj.values().all(|v| !v.is_null()));
        for key in ["headline", "author", "datePublished", "image", "keywords", "timeRequired", "publisher"] {
            assert!(!obj.contains_key(key), "{key} should be omitted");
        }
        assert_eq!(value["@context"], "https://schema.org");
        assert_eq!(value["@type"], "BlogPosting");
        assert_eq!(value["wordCount"], 0);
    }

    #[test]
    fn test_long_headline_is_truncated() {
        let mut content = empty_content();
        let long = "word ".repeat(40);
        content.headline = Some(long.clone());

        let schema = build(&content, &analysis(0, &[]), &BuildConfig::default()).unwrap();
        let headline = schema.headline.unwrap();

        assert!(headline.chars().count() <= 110);
        assert!(!headline.ends_with(' '));
        assert_eq!(schema.name, Some(long));
    }

    #[test]
    fn test_article_body_opt_in() {
        let config = BuildConfig { include_article_body: true };
        let schema = build(&full_content(), &analysis(4, &[]), &config).unwrap();
        assert_eq!(schema.article_body.as_deref(), Some("Hello world example text"));

        let schema = build(&empty_content(), &analysis(0, &[]), &config).unwrap();
        assert_eq!(schema.article_body, None);
    }

    #[test]
    fn test_breadcrumb_from_path() {
        let mut content = full_content();
        content.source_url = "https://blog.example.com/2024/road-trips/desert-night-drive".to_string();
        let schema = build(&content, &analysis(4, &[]), &BuildConfig::default()).unwrap();
        let value = schema.to_value().unwrap();
        let items = &value["breadcrumb"]["itemListElement"];

        assert_eq!(value["breadcrumb"]["@type"], "BreadcrumbList");
        assert_eq!(items.as_array().unwrap().len(), 4);
        assert_eq!(items[0]["name"], "Home");
        assert_eq!(items[0]["item"], "https://blog.example.com");
        assert_eq!(items[1]["name"], "2024");
        assert_eq!(items[1]["item"], "https://blog.example.com/2024");
        assert_eq!(items[2]["name"], "Road Trips");
        assert_eq!(items[2]["item"], "https://blog.example.com/2024/road-trips");
        assert_eq!(items[3]["@type"], "ListItem");
        assert_eq!(items[3]["position"], 4);
        assert_eq!(items[3]["name"], "Example Post");
        assert_eq!(items[3]["item"], "https://blog.example.com/2024/road-trips/desert-night-drive");
    }

    #[test]
    fn test_breadcrumb_needs_two_segments() {
        let mut content = empty_content();
        content.source_url = "https://blog.example.com/hello".to_string();
        let schema = build(&content, &analysis(0, &[]), &BuildConfig::default()).unwrap();
        assert!(schema.to_value().unwrap().get("breadcrumb").is_none());

        let url = Url::parse("https://blog.example.com:8080/posts/hello/").unwrap();
        let trail = BreadcrumbList::from_url(&url, None).unwrap();
        assert_eq!(trail.items[0].item, "https://blog.example.com:8080");
        assert_eq!(trail.items[2].name, "Current Page");
    }

    #[test]
    fn test_image_is_plain_url() {
        let schema = build(&full_content(), &analysis(4, &[]), &BuildConfig::default()).unwrap();
        let value = schema.to_value().unwrap();
        assert!(value["image"].is_string());
    }

    #[test]
    fn test_relative_source_url_fails() {
        let mut content = empty_content();
        content.source_url = "/posts/hello".to_string();
        let result = build(&content, &analysis(0, &[]), &BuildConfig::default());
        assert!(matches!(result, Err(BlogLdError::Build(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let schema = build(&full_content(), &analysis(4, &["rust"]), &BuildConfig::default()).unwrap();
        let json = schema.to_json(false).unwrap();
        assert!(!json.contains('\n'));

        let parsed: BlogPostingSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schema);

        let pretty: Value = serde_json::from_str(&schema.to_json(true).unwrap()).unwrap();
        assert_eq!(pretty, schema.to_value().unwrap());
    }

    #[test]
    fn test_script_tag() {
        let mut content = empty_content();
        content.headline = Some("Closing </script> tags".to_string());
        let schema = build(&content, &analysis(0, &[]), &BuildConfig::default()).unwrap();
        let tag = schema.to_script_tag().unwrap();

        assert!(tag.starts_with("<script type=\"application/ld+json\">\n{"));
        assert!(tag.ends_with("}\n</script>"));
        assert_eq!(tag.matches("</script>").count(), 1);
    }
}
