//! HTML parsing and DOM navigation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and querying it with CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use blogld_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::{BlogLdError, Result};

/// Represents a parsed HTML document.
///
/// # Example
///
/// ```rust
/// use blogld_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// The HTML5 parser recovers from any malformed markup, so the only inputs
    /// rejected are those that are not markup at all: blank strings and text
    /// without a single tag.
    ///
    /// # Errors
    ///
    /// Returns [`BlogLdError::Parse`] for blank or tag-free input.
    pub fn parse(html: &str) -> Result<Self> {
        if html.trim().is_empty() {
            return Err(BlogLdError::Parse("document is empty".to_string()));
        }
        if !html.contains('<') {
            return Err(BlogLdError::Parse("document contains no markup".to_string()));
        }

        Ok(Self { html: Html::parse_document(html) })
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`BlogLdError::Parse`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use blogld_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|element| Element { element }).collect())
    }

    /// Selects the first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).next().map(|element| Element { element }))
    }

    /// Gets the whitespace-normalized `<title>` text, if non-empty.
    pub fn title(&self) -> Option<String> {
        self.select_first("title").ok().flatten().and_then(|el| non_empty(el.text()))
    }

    /// Gets the `lang` attribute of the root `<html>` element.
    pub fn language(&self) -> Option<String> {
        self.html.root_element().value().attr("lang").and_then(|lang| non_empty(lang.to_string()))
    }
}

/// A wrapper around scraper's ElementRef.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the raw concatenated text of this element and its descendants.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the text content with whitespace runs collapsed and trimmed.
    pub fn normalized_text(&self) -> String {
        normalize_whitespace(&self.text())
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Gets the element's `id` and `class` attributes joined by a space.
    pub fn class_and_id(&self) -> String {
        let id = self.attr("id").unwrap_or_default();
        let class = self.attr("class").unwrap_or_default();
        format!("{} {}", id, class).trim().to_string()
    }

    /// Whether both wrappers point at the same node of the same tree.
    pub fn same_node(&self, other: &Element<'_>) -> bool {
        self.element.id() == other.element.id()
    }

    /// Iterates over the ancestor elements, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        self.element.ancestors().filter_map(ElementRef::wrap).map(|element| Element { element })
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`BlogLdError::Parse`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).map(|element| Element { element }).collect())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| BlogLdError::Parse(format!("Invalid selector '{}': {}", selector, e)))
}

/// Collapses runs of whitespace into single spaces and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes `text` and returns it unless it ends up empty.
pub(crate) fn non_empty(text: String) -> Option<String> {
    let text = normalize_whitespace(&text);
    if text.is_empty() { None } else { Some(text) }
}
