// src/extractors/research.rs
use serde::Serialize;

use crate::extractors::patterns::{contains_cjk, slugify};
use crate::utils::urls::absolute_link;
use crate::wiki::page::{NodeKind, PageNode};

// Topic markers that identify a highlight sub-header on the start page.
const HIGHLIGHT_MARKERS: &[&str] = &["ATP", "生醫大數據", "Ectopic", "Big Data"];

/// One research highlight block from the start page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchHighlight {
    pub id: String,
    pub title_zh: String,
    pub title_en: String,
    pub description: Vec<String>,
    pub image: Option<String>,
    pub publications: Vec<String>,
}

/// Extracts research highlight blocks.
///
/// A highlight opens at an h1-h3 header carrying a topic marker and closes
/// when the next qualifying header arrives or the page ends, so at most one
/// is open at a time. While open it accumulates paragraphs longer than
/// 50 characters (shorter ones are navigation and caption noise) and the
/// last anchor-wrapped image whose path looks highlight-related.
pub fn extract_research_highlights(nodes: &[PageNode], base_url: &str) -> Vec<ResearchHighlight> {
    let mut highlights = Vec::new();
    let mut current: Option<ResearchHighlight> = None;

    for node in nodes {
        match node.kind {
            NodeKind::Heading(1..=3) => {
                // The section banner itself is not a highlight.
                if node.text.contains("Research Highlight") {
                    continue;
                }
                if HIGHLIGHT_MARKERS.iter().any(|m| node.text.contains(m)) {
                    if let Some(done) = current.take() {
                        highlights.push(done);
                    }
                    current = Some(open_highlight(&node.text));
                }
            }
            NodeKind::Anchor => {
                if let (Some(open), Some(src)) = (current.as_mut(), node.img_src.as_deref()) {
                    let src_lower = src.to_lowercase();
                    if src_lower.contains("highlight") || src_lower.contains("research") {
                        open.image = Some(absolute_link(base_url, src));
                    }
                }
            }
            NodeKind::Paragraph => {
                if let Some(open) = current.as_mut() {
                    if node.text.chars().count() > 50 {
                        open.description.push(node.text.clone());
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(done) = current.take() {
        highlights.push(done);
    }

    tracing::info!("Extracted {} research highlights", highlights.len());
    highlights
}

fn open_highlight(title: &str) -> ResearchHighlight {
    let (title_zh, title_en) = if contains_cjk(title) {
        (title.to_string(), String::new())
    } else {
        (String::new(), title.to_string())
    };

    ResearchHighlight {
        id: slugify(title),
        title_zh,
        title_en,
        description: Vec::new(),
        image: None,
        publications: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::page::Page;

    const BASE: &str = "https://sbl.csie.org/JuanLab";

    fn highlight_page(body: &str) -> Vec<PageNode> {
        let html = format!("<html><body><div class=\"dokuwiki\">{}</div></body></html>", body);
        Page::parse(&html).content_nodes()
    }

    fn long_para(c: char, n: usize) -> String {
        format!("<p>{}</p>", c.to_string().repeat(n))
    }

    #[test]
    fn test_next_marker_header_closes_open_highlight() {
        let body = format!(
            "<h2>Research Highlights</h2>\
             <h3>Ectopic ATP synthase</h3>{}\
             <h3>Big Data analysis</h3>{}",
            long_para('a', 60),
            long_para('b', 60),
        );
        let nodes = highlight_page(&body);
        let highlights = extract_research_highlights(&nodes, BASE);

        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[0].id, "ectopic-atp-synthase");
        assert_eq!(highlights[0].description, vec!["a".repeat(60)]);
        assert_eq!(highlights[1].id, "big-data-analysis");
        assert_eq!(highlights[1].description, vec!["b".repeat(60)]);
    }

    #[test]
    fn test_section_banner_is_not_a_highlight() {
        // "ATP" inside a banner header stays a banner.
        let nodes = highlight_page("<h2>Research Highlight: ATP studies</h2>");
        assert!(extract_research_highlights(&nodes, BASE).is_empty());
    }

    #[test]
    fn test_paragraph_length_boundary() {
        let body = format!(
            "<h3>ATP synthase trafficking</h3>{}{}",
            long_para('s', 50),
            long_para('l', 51),
        );
        let nodes = highlight_page(&body);
        let highlights = extract_research_highlights(&nodes, BASE);

        assert_eq!(highlights[0].description, vec!["l".repeat(51)]);
    }

    #[test]
    fn test_paragraphs_before_first_highlight_are_ignored() {
        let body = format!("{}<h3>Big Data platforms</h3>", long_para('x', 80));
        let nodes = highlight_page(&body);
        let highlights = extract_research_highlights(&nodes, BASE);

        assert_eq!(highlights.len(), 1);
        assert!(highlights[0].description.is_empty());
    }

    #[test]
    fn test_image_needs_research_or_highlight_in_path() {
        let body = "<h3>Ectopic expression</h3>\
             <a href=\"/d1\"><img src=\"/lib/exe/fetch.php?media=misc:logo.png\"/></a>\
             <a href=\"/d2\"><img src=\"/lib/exe/fetch.php?media=research:atp.png\"/></a>";
        let nodes = highlight_page(body);
        let highlights = extract_research_highlights(&nodes, BASE);

        assert_eq!(
            highlights[0].image.as_deref(),
            Some("https://sbl.csie.org/lib/exe/fetch.php?media=research:atp.png")
        );
    }

    #[test]
    fn test_later_qualifying_image_wins() {
        let body = "<h3>ATP synthase</h3>\
             <a href=\"/d1\"><img src=\"/media/highlight_one.png\"/></a>\
             <a href=\"/d2\"><img src=\"/media/highlight_two.png\"/></a>";
        let nodes = highlight_page(body);
        let highlights = extract_research_highlights(&nodes, BASE);

        assert_eq!(
            highlights[0].image.as_deref(),
            Some("https://sbl.csie.org/media/highlight_two.png")
        );
    }

    #[test]
    fn test_cjk_title_routes_to_zh() {
        let nodes = highlight_page("<h3>生醫大數據之智慧分析</h3>");
        let highlights = extract_research_highlights(&nodes, BASE);

        assert_eq!(highlights[0].title_zh, "生醫大數據之智慧分析");
        assert_eq!(highlights[0].title_en, "");
        // A fully-CJK title has nothing for the ASCII slug to keep.
        assert_eq!(highlights[0].id, "");
        assert!(highlights[0].publications.is_empty());
    }
}
