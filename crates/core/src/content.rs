//! Primary content region detection and body text collection.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::metadata::resolve_url;
use crate::parse::{Document, Element, non_empty};
use crate::Result;

/// Containers tried in order when looking for the article body.
const CONTENT_REGIONS: &[&str] = &[
    "article",
    "[itemprop=\"articleBody\"]",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".content",
    "#content",
    "main",
    ".main-content",
    "[role=\"main\"]",
];

/// Elements whose paragraphs never count as body text.
const EXCLUDED_TAGS: &[&str] = &["script", "style", "noscript", "template", "nav", "aside", "footer", "header", "form"];

/// Class/ID fragments that mark navigation, ads and other page furniture.
const NEGATIVE_PATTERNS: &str = r"(?i)(^|[\s_-])(ad|ads|advert|advertisement|adsense|sponsor|sponsored|promo|banner|breadcrumbs?|comments?|disqus|sidebar|menu|nav|navbar|navigation|footer|share|sharing|social|related|newsletter|subscribe|popup|cookie|pagination|pager)($|[\s_-])";

static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(NEGATIVE_PATTERNS).expect("negative pattern regex is valid"));

/// The part of the page holding the post itself.
#[derive(Debug)]
pub struct ContentRegion<'a> {
    root: Element<'a>,
    paragraphs: Vec<String>,
}

impl<'a> ContentRegion<'a> {
    /// Locate the primary content region.
    ///
    /// Returns the first [`CONTENT_REGIONS`] match that sits outside page
    /// furniture and contains at least one included paragraph, falling back
    /// to `<body>` (which may have none).
    pub fn locate(doc: &'a Document) -> Result<Self> {
        for selector in CONTENT_REGIONS {
            for root in doc.select(selector)? {
                if in_furniture(&root) {
                    continue;
                }
                let paragraphs = collect_paragraphs(&root)?;
                if !paragraphs.is_empty() {
                    tracing::debug!(region = *selector, paragraphs = paragraphs.len(), "located content region");
                    return Ok(Self { root, paragraphs });
                }
            }
        }

        let root = match doc.select_first("body")? {
            Some(body) => body,
            None => doc.select_first("html")?.ok_or_else(|| crate::BlogLdError::Parse("document has no root".into()))?,
        };
        let paragraphs = collect_paragraphs(&root)?;
        tracing::debug!(paragraphs = paragraphs.len(), "falling back to document body");

        Ok(Self { root, paragraphs })
    }

    /// Concatenated paragraph text separated by single spaces.
    pub fn body_text(&self) -> String {
        self.paragraphs.join(" ")
    }

    /// First image inside the region that is not known to be smaller than
    /// `min_size` pixels in either dimension.
    ///
    /// Images without `width`/`height` attributes are accepted since their
    /// size cannot be determined from markup.
    pub fn lead_image(&self, base_url: &Url, min_size: u32) -> Option<String> {
        let images = self.root.select("img").ok()?;

        images
            .iter()
            .filter(|img| !is_excluded(img, &self.root))
            .filter(|img| {
                let big_enough = |attr: &str| pixel_size(img.attr(attr)).is_none_or(|px| px >= min_size);
                big_enough("width") && big_enough("height")
            })
            .filter_map(|img| img.attr("src").or_else(|| img.attr("data-src")))
            .find_map(|src| resolve_url(base_url, src))
    }
}

fn collect_paragraphs(root: &Element<'_>) -> Result<Vec<String>> {
    Ok(root
        .select("p")?
        .iter()
        .filter(|p| !is_excluded(p, root))
        .filter_map(|p| non_empty(p.text()))
        .collect())
}

/// Whether `element` sits inside page furniture below `root`.
fn is_excluded(element: &Element<'_>, root: &Element<'_>) -> bool {
    if is_furniture(element) {
        return true;
    }

    for ancestor in element.ancestors() {
        if ancestor.same_node(root) {
            break;
        }
        if is_furniture(&ancestor) {
            return true;
        }
    }

    false
}

/// Whether a candidate region is furniture itself or nested inside furniture.
///
/// `<body>` and `<html>` are not checked; their classes describe page state.
fn in_furniture(root: &Element<'_>) -> bool {
    is_furniture(root)
        || root
            .ancestors()
            .filter(|ancestor| !matches!(ancestor.tag_name().as_str(), "body" | "html"))
            .any(|ancestor| is_furniture(&ancestor))
}

fn is_furniture(element: &Element<'_>) -> bool {
    if EXCLUDED_TAGS.contains(&element.tag_name().as_str()) {
        return true;
    }
    if element.attr("hidden").is_some() || element.attr("aria-hidden") == Some("true") {
        return true;
    }

    let class_and_id = element.class_and_id();
    !class_and_id.is_empty() && NEGATIVE.is_match(&class_and_id)
}

/// Parse a `width`/`height` attribute such as `"640"` or `"640px"`.
fn pixel_size(value: Option<&str>) -> Option<u32> {
    value?.trim().trim_end_matches("px").trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://blog.example.com/posts/1").unwrap()
    }

    #[test]
    fn test_locate_prefers_article() {
        let html = r#"
            <html><body>
                <div class="content"><p>Outside the article.</p></div>
                <article>
                    <p>First   paragraph.</p>
                    <p>Second
                    paragraph.</p>
                </article>
            </body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        let region = ContentRegion::locate(&doc).unwrap();
        assert_eq!(region.paragraphs, ["First paragraph.", "Second paragraph."]);
        assert_eq!(region.body_text(), "First paragraph. Second paragraph.");
    }

    #[test]
    fn test_locate_skips_empty_regions() {
        let html = r#"
            <html><body>
                <article><h2>Teaser without paragraphs</h2></article>
                <main><p>Real content.</p></main>
            </body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        let region = ContentRegion::locate(&doc).unwrap();
        assert_eq!(region.body_text(), "Real content.");
    }

    #[test]
    fn test_excludes_furniture() {
        let html = r#"
            <html><body>
                <article>
                    <p>Keep me.</p>
                    <nav><p>Menu text</p></nav>
                    <div class="ad-slot"><p>Buy things</p></div>
                    <div id="comments"><p>First!</p></div>
                    <aside><p>Aside text</p></aside>
                    <div class="share-buttons"><p>Share this</p></div>
                    <p hidden>Hidden text</p>
                    <footer><p>Footer text</p></footer>
                    <p>Keep me too.</p>
                </article>
            </body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        let region = ContentRegion::locate(&doc).unwrap();
        assert_eq!(region.body_text(), "Keep me. Keep me too.");
    }

    #[test]
    fn test_regions_inside_furniture_are_skipped() {
        let html = r#"
            <html><body>
                <aside class="related"><article><p>Related teaser you will love.</p></article></aside>
                <main><article><p>Real post body.</p></article></main>
            </body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(ContentRegion::locate(&doc).unwrap().body_text(), "Real post body.");

        let html = r#"
            <html><body>
                <nav><article><p>Menu card text.</p></article></nav>
                <div class="entry-content"><p>Entry body.</p></div>
            </body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(ContentRegion::locate(&doc).unwrap().body_text(), "Entry body.");
    }

    #[test]
    fn test_body_classes_do_not_hide_content() {
        let html = r#"<html><body class="has-sidebar nav-open"><article><p>Still found.</p></article></body></html>"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(ContentRegion::locate(&doc).unwrap().body_text(), "Still found.");
    }

    #[test]
    fn test_ad_substrings_are_not_furniture() {
        let html = r#"<html><body><article><div class="header-image loaded"><p>Loaded text.</p></div></article></body></html>"#;
        let doc = Document::parse(html).unwrap();
        let region = ContentRegion::locate(&doc).unwrap();
        assert_eq!(region.body_text(), "Loaded text.");
    }

    #[test]
    fn test_body_fallback_and_empty() {
        let doc = Document::parse("<html><body><div>No paragraphs</div></body></html>").unwrap();
        let region = ContentRegion::locate(&doc).unwrap();
        assert!(region.paragraphs.is_empty());
        assert_eq!(region.body_text(), "");

        let doc = Document::parse("<html><body><p>Loose paragraph</p></body></html>").unwrap();
        let region = ContentRegion::locate(&doc).unwrap();
        assert_eq!(region.body_text(), "Loose paragraph");
    }

    #[test]
    fn test_lead_image_size_heuristic() {
        let html = r#"
            <html><body><article>
                <img src="/icons/tiny.png" width="16" height="16">
                <img src="data:image/gif;base64,R0lGOD" width="800" height="600">
                <img src="/img/hero.jpg" width="800px" height="450">
                <p>Text</p>
            </article></body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        let region = ContentRegion::locate(&doc).unwrap();
        assert_eq!(
            region.lead_image(&base(), 200),
            Some("https://blog.example.com/img/hero.jpg".to_string())
        );
    }

    #[test]
    fn test_lead_image_unknown_size_accepted() {
        let html = r#"<html><body><article><p>Text <img data-src="photo.jpg"></p></article></body></html>"#;
        let doc = Document::parse(html).unwrap();
        let region = ContentRegion::locate(&doc).unwrap();
        assert_eq!(
            region.lead_image(&base(), 200),
            Some("https://blog.example.com/posts/photo.jpg".to_string())
        );
    }

    #[test]
    fn test_pixel_size() {
        assert_eq!(pixel_size(Some("640")), Some(640));
        assert_eq!(pixel_size(Some(" 640px ")), Some(640));
        assert_eq!(pixel_size(Some("auto")), None);
        assert_eq!(pixel_size(None), None);
    }
}
