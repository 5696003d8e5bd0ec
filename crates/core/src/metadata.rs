//! Field extractors for headline, author, dates, description, site name and
//! preview image, each a prioritized list of fallbacks.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::Document;
use crate::date::PublishedDate;
use crate::parse::non_empty;

/// Longest text accepted as an author name.
const MAX_AUTHOR_LEN: usize = 100;

static BYLINE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:written\s+|posted\s+)?by[:\s]+").expect("byline prefix regex is valid"));

/// One to four capitalized words, e.g. "Ada Lovelace" or "J. R. Tolkien".
static NAME_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{Lu}[\p{L}.'-]*(?:\s+\p{Lu}[\p{L}.'-]*){0,3}$").expect("name shape regex is valid")
});

static BYLINE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?i:by)\s+(\p{Lu}[\p{L}.'-]*(?:\s+\p{Lu}[\p{L}.'-]*){0,3})").expect("byline regex is valid")
});

impl Document {
    /// Extract headline with priority fallback:
    /// 1. Open Graph `og:title`
    /// 2. `<title>` element
    /// 3. First `<h1>` element
    pub fn extract_headline(&self) -> Option<String> {
        self.get_meta_content("og:title")
            .or_else(|| self.title())
            .or_else(|| self.first_text("h1"))
    }

    /// Extract author with priority fallback:
    /// 1. Meta `author`, `article:author` (unless it is a profile URL)
    /// 2. JSON-LD `author`
    /// 3. `[rel="author"]`, `[itemprop="author"]`
    /// 4. Class containing "byline" or "author", when the text is name-shaped
    /// 5. Short text starting with "By Firstname Lastname"
    pub fn extract_author(&self) -> Option<String> {
        let structured = self
            .get_meta_content("author")
            .or_else(|| self.get_meta_content("article:author").filter(|a| !looks_like_url(a)))
            .or_else(|| self.json_ld_field("author").and_then(|a| author_from_json_ld(&a)))
            .and_then(|a| clean_author(&a));
        if structured.is_some() {
            return structured;
        }

        let bylines = [
            ("[rel=\"author\"]", false),
            ("[itemprop=\"author\"]", false),
            ("[class*=\"byline\"]", true),
            ("[class*=\"author\"]", true),
        ];
        for (selector, needs_name_shape) in bylines {
            if let Ok(elements) = self.select(selector) {
                for el in elements.iter().take(3) {
                    let text = el.attr("content").map(str::to_string).unwrap_or_else(|| el.normalized_text());
                    if let Some(author) = clean_author(&text)
                        && (!needs_name_shape || NAME_SHAPE.is_match(&author))
                    {
                        return Some(author);
                    }
                }
            }
        }

        if let Ok(elements) = self.select("p, span, address") {
            for el in elements {
                let text = el.normalized_text();
                if text.len() > 120 {
                    continue;
                }
                if let Some(caps) = BYLINE_TEXT.captures(&text)
                    && let Some(author) = clean_author(&caps[1])
                {
                    return Some(author);
                }
            }
        }

        None
    }

    /// Extract publication date with priority fallback:
    /// 1. Meta `article:published_time`, `date`, `pubdate`, `publish-date`, `DC.date`
    /// 2. `[itemprop="datePublished"]`
    /// 3. JSON-LD `datePublished`
    /// 4. `<time datetime="">` element
    /// 5. Recognized date text in `time`, `.published`, `.date`, `.posted`
    ///    (and `post-`/`entry-`/`publish-` prefixed) elements
    pub fn extract_published_date(&self) -> Option<PublishedDate> {
        let meta_names =
            ["article:published_time", "date", "pubdate", "publish-date", "publish_date", "DC.date", "DC.date.issued"];
        for name in meta_names {
            if let Some(date) = self.get_meta_content(name).and_then(|v| PublishedDate::parse_structured(&v)) {
                return Some(date);
            }
        }

        if let Ok(elements) = self.select("[itemprop=\"datePublished\"]") {
            for el in elements {
                let value = el.attr("content").or_else(|| el.attr("datetime"));
                if let Some(date) = value.and_then(PublishedDate::parse_structured) {
                    return Some(date);
                }
            }
        }

        if let Some(date) = self.json_ld_date("datePublished") {
            return Some(date);
        }

        if let Ok(elements) = self.select("time[datetime]") {
            for el in elements {
                if let Some(date) = el.attr("datetime").and_then(PublishedDate::parse_structured) {
                    return Some(date);
                }
            }
        }

        let visible = ["time", ".published", ".date", ".posted", ".post-date", ".entry-date", ".publish-date"];
        for selector in visible {
            if let Ok(elements) = self.select(selector) {
                for el in elements.iter().take(5) {
                    let text = el.normalized_text();
                    if text.len() > 100 {
                        continue;
                    }
                    if let Some(date) = PublishedDate::find_in_text(&text) {
                        return Some(date);
                    }
                }
            }
        }

        None
    }

    /// Extract last-modified date from `article:modified_time`,
    /// `og:updated_time` or JSON-LD `dateModified`.
    pub fn extract_modified_date(&self) -> Option<PublishedDate> {
        self.get_meta_content("article:modified_time")
            .or_else(|| self.get_meta_content("og:updated_time"))
            .and_then(|v| PublishedDate::parse_structured(&v))
            .or_else(|| self.json_ld_date("dateModified"))
    }

    /// Extract description from `og:description`, then meta `description`.
    pub fn extract_description(&self) -> Option<String> {
        self.get_meta_content("og:description")
            .or_else(|| self.get_meta_content("description"))
    }

    /// Extract site name with priority fallback:
    /// 1. Open Graph `og:site_name`
    /// 2. JSON-LD `publisher.name`
    /// 3. Host of `base_url` without a leading `www.`
    pub fn extract_site_name(&self, base_url: &Url) -> Option<String> {
        if let Some(site) = self.get_meta_content("og:site_name") {
            return Some(site);
        }

        if let Some(publisher) = self.json_ld_field("publisher")
            && let Some(name) = publisher.get("name").and_then(Value::as_str)
            && let Some(name) = non_empty(name.to_string())
        {
            return Some(name);
        }

        base_url
            .host_str()
            .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
            .filter(|host| !host.is_empty())
    }

    /// Extract the social preview image (`og:image` and friends), resolved
    /// against `base_url`.
    pub fn extract_meta_image(&self, base_url: &Url) -> Option<String> {
        ["og:image", "og:image:secure_url", "og:image:url", "twitter:image", "twitter:image:src"]
            .iter()
            .filter_map(|name| self.get_meta_content(name))
            .find_map(|value| resolve_url(base_url, &value))
    }

    /// Get meta tag content by name or property attribute
    fn get_meta_content(&self, attr: &str) -> Option<String> {
        for key in ["name", "property"] {
            let selector = format!("meta[{}=\"{}\"]", key, attr);
            if let Ok(elements) = self.select(&selector) {
                for el in elements {
                    if let Some(content) = el.attr("content").and_then(|c| non_empty(c.to_string())) {
                        return Some(content);
                    }
                }
            }
        }
        None
    }

    fn first_text(&self, selector: &str) -> Option<String> {
        self.select(selector).ok()?.iter().find_map(|el| non_empty(el.text()))
    }

    /// Parse every JSON-LD block, flattening top-level arrays and `@graph`.
    fn json_ld_objects(&self) -> Vec<Value> {
        let mut objects = Vec::new();
        if let Ok(elements) = self.select("script[type=\"application/ld+json\"]") {
            for el in elements {
                if let Ok(value) = serde_json::from_str::<Value>(el.text().trim()) {
                    flatten_json_ld(value, &mut objects);
                }
            }
        }
        objects
    }

    /// First value of `key` across all JSON-LD objects, preferring article types.
    fn json_ld_field(&self, key: &str) -> Option<Value> {
        let objects = self.json_ld_objects();
        let is_article = |obj: &Value| {
            obj.get("@type")
                .and_then(Value::as_str)
                .is_some_and(|t| t.ends_with("Article") || t == "BlogPosting")
        };

        objects
            .iter()
            .filter(|obj| is_article(obj))
            .chain(objects.iter().filter(|obj| !is_article(obj)))
            .find_map(|obj| obj.get(key).cloned())
    }

    fn json_ld_date(&self, key: &str) -> Option<PublishedDate> {
        self.json_ld_field(key)
            .and_then(|v| v.as_str().and_then(PublishedDate::parse_structured))
    }
}

fn flatten_json_ld(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => items.into_iter().for_each(|item| flatten_json_ld(item, out)),
        Value::Object(mut obj) => {
            if let Some(graph) = obj.remove("@graph") {
                flatten_json_ld(graph, out);
            }
            out.push(Value::Object(obj));
        }
        _ => {}
    }
}

/// Extract author name from a JSON-LD author field.
/// Handles string, object and array formats.
fn author_from_json_ld(author: &Value) -> Option<String> {
    match author {
        Value::String(name) => Some(name.clone()),
        Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
        Value::Array(items) => items.iter().find_map(author_from_json_ld),
        _ => None,
    }
}

/// Strip a "By" prefix and trailing separators from a byline candidate.
fn clean_author(raw: &str) -> Option<String> {
    let text = non_empty(raw.to_string())?;
    let text = BYLINE_PREFIX.replace(&text, "");
    let name = text.split(['|', '·', '•']).next().unwrap_or_default().trim();

    if name.is_empty() || name.chars().count() > MAX_AUTHOR_LEN || looks_like_url(name) {
        None
    } else {
        Some(name.to_string())
    }
}

fn looks_like_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://") || value.starts_with("//")
}

/// Resolve an image reference against the page URL, ignoring inline data.
pub(crate) fn resolve_url(base_url: &Url, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.starts_with("data:") {
        return None;
    }

    let resolved = base_url.join(value).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
