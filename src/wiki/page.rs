// src/wiki/page.rs
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::utils::text::clean_text;

// --- Selectors (Lazy Static) ---

static CONTENT_CLASS_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.dokuwiki").expect("Failed to compile CONTENT_CLASS_SELECTOR")
});

static CONTENT_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div#dokuwiki__content").expect("Failed to compile CONTENT_ID_SELECTOR")
});

// The element whitelist every extractor folds over. Anything outside it
// (tables, divs, spans) contributes text through its whitelisted children.
static FLATTEN_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6, p, li, tr, a, img")
        .expect("Failed to compile FLATTEN_SELECTOR")
});

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("Failed to compile ANCHOR_SELECTOR"));

static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("Failed to compile IMG_SELECTOR"));

/// What a flattened element was in the markup. Extractors dispatch on this
/// instead of touching the DOM again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Heading(u8),
    Paragraph,
    ListItem,
    TableRow,
    Anchor,
    Image,
}

/// One element of the flattened content sequence.
///
/// DokuWiki pages carry no schema, so extraction works on a linear,
/// source-ordered view: each node owns its normalized text plus the first
/// link, image, and mailto address found inside it. Nested whitelisted
/// elements also appear as their own nodes later in the sequence, which is
/// what lets a list item and the anchor inside it both be seen.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNode {
    pub kind: NodeKind,
    /// Unicode-normalized, whitespace-collapsed text content.
    pub text: String,
    /// Text as authored, newlines intact, for extractors that split on them.
    pub raw_text: String,
    /// The node's own href for anchors, otherwise the first contained one.
    pub href: Option<String>,
    /// The node's own src for images, otherwise the first contained one.
    /// Empty src attributes count as absent.
    pub img_src: Option<String>,
    /// Alt text of that same image, empty when it has none.
    pub img_alt: String,
    /// First mailto: link inside the node, scheme stripped.
    pub email: Option<String>,
}

/// An `<img>` element as found anywhere in the document, for the manifest
/// collector, which scans beyond the content root.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTag {
    pub src: String,
    pub alt: String,
}

/// A parsed wiki page.
pub struct Page {
    doc: Html,
}

impl Page {
    /// Parses raw HTML. Never fails; the parser recovers from the malformed
    /// markup hand-edited wiki pages tend to accumulate.
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_document(html),
        }
    }

    fn content_root(&self) -> Option<ElementRef<'_>> {
        self.doc
            .select(&CONTENT_CLASS_SELECTOR)
            .next()
            .or_else(|| self.doc.select(&CONTENT_ID_SELECTOR).next())
    }

    /// Flattens the content root into source-ordered nodes.
    ///
    /// A document without a recognizable content root yields an empty
    /// sequence, so every extractor degrades to its zero value instead of
    /// misreading navigation chrome as content.
    pub fn content_nodes(&self) -> Vec<PageNode> {
        let Some(root) = self.content_root() else {
            tracing::warn!("No DokuWiki content root in document; treating page as empty");
            return Vec::new();
        };

        root.select(&FLATTEN_SELECTOR)
            .filter_map(|el| node_kind(el.value().name()).map(|kind| to_page_node(kind, el)))
            .collect()
    }

    /// Every image in the whole document, navigation and sidebar included.
    pub fn images(&self) -> Vec<ImageTag> {
        self.doc
            .select(&IMG_SELECTOR)
            .map(|el| ImageTag {
                src: el.value().attr("src").unwrap_or("").to_string(),
                alt: el.value().attr("alt").unwrap_or("").to_string(),
            })
            .collect()
    }
}

fn node_kind(name: &str) -> Option<NodeKind> {
    match name {
        "p" => Some(NodeKind::Paragraph),
        "li" => Some(NodeKind::ListItem),
        "tr" => Some(NodeKind::TableRow),
        "a" => Some(NodeKind::Anchor),
        "img" => Some(NodeKind::Image),
        _ => name
            .strip_prefix('h')
            .and_then(|level| level.parse().ok())
            .map(NodeKind::Heading),
    }
}

fn to_page_node(kind: NodeKind, el: ElementRef) -> PageNode {
    let raw_text: String = el.text().collect();
    let text = clean_text(&raw_text);

    let href = match kind {
        NodeKind::Anchor => el.value().attr("href").map(String::from),
        _ => el
            .select(&ANCHOR_SELECTOR)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(String::from),
    };

    let (img_src, img_alt) = match kind {
        NodeKind::Image => (
            el.value().attr("src").map(String::from),
            el.value().attr("alt").unwrap_or("").to_string(),
        ),
        _ => match el.select(&IMG_SELECTOR).next() {
            Some(img) => (
                img.value().attr("src").map(String::from),
                img.value().attr("alt").unwrap_or("").to_string(),
            ),
            None => (None, String::new()),
        },
    };
    let img_src = img_src.filter(|src| !src.is_empty());

    let email = el.select(&ANCHOR_SELECTOR).find_map(|a| {
        a.value()
            .attr("href")
            .and_then(|href| href.strip_prefix("mailto:"))
            .map(String::from)
    });

    PageNode {
        kind,
        text,
        raw_text,
        href,
        img_src,
        img_alt,
        email,
    }
}
