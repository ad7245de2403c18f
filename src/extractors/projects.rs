// src/extractors/projects.rs
use serde::Serialize;

use crate::extractors::patterns::{contains_cjk, match_numbered_project};
use crate::utils::text::clean_text;
use crate::wiki::page::{NodeKind, PageNode};

// Headers that open the funded-projects section of the start page.
const PROJECT_MARKERS: &[&str] = &["Research Project", "研究計畫"];

/// One numbered research project from the start page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResearchProject {
    pub id: String,
    pub number: u32,
    pub title_zh: String,
    pub title_en: String,
    /// The wiki never carries project descriptions; downstream consumers
    /// still expect the field.
    pub description: String,
}

/// Extracts numbered research projects.
///
/// Extraction is gated to the projects section: any h1-h3 header containing
/// a project marker opens it, and the next h1/h2 header without one closes
/// it. Inside, paragraphs and list items matching "N. title" become
/// projects; bilingual titles authored on separate source lines are routed
/// per line, with digit-led lines (the numbering itself) dropped.
pub fn extract_research_projects(nodes: &[PageNode]) -> Vec<ResearchProject> {
    let mut projects = Vec::new();
    let mut in_section = false;

    for node in nodes {
        if let NodeKind::Heading(level) = node.kind {
            if (1..=3).contains(&level) {
                if PROJECT_MARKERS.iter().any(|m| node.text.contains(m)) {
                    in_section = true;
                    continue;
                }
                if in_section && level <= 2 {
                    in_section = false;
                }
            }
            continue;
        }

        if !in_section || !matches!(node.kind, NodeKind::Paragraph | NodeKind::ListItem) {
            continue;
        }
        let Some((number, title)) = match_numbered_project(&node.text) else {
            continue;
        };

        let (title_zh, title_en) = split_project_title(&title, &node.raw_text);
        projects.push(ResearchProject {
            id: format!("project-{}", number),
            number,
            title_zh,
            title_en,
            description: String::new(),
        });
    }

    tracing::info!("Extracted {} research projects", projects.len());
    projects
}

/// Routes a project title into zh/en halves.
///
/// Titles authored across source lines get each cleaned line routed by CJK
/// content (later same-language lines overwrite), skipping lines that open
/// with an ASCII digit. Single-line titles route whole.
fn split_project_title(title: &str, raw_text: &str) -> (String, String) {
    let mut title_zh = String::new();
    let mut title_en = String::new();

    if raw_text.contains('\n') {
        for part in raw_text.trim().split('\n') {
            let part = clean_text(part);
            if part.is_empty() || part.starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            if contains_cjk(&part) {
                title_zh = part;
            } else {
                title_en = part;
            }
        }
    } else if contains_cjk(title) {
        title_zh = title.to_string();
    } else {
        title_en = title.to_string();
    }

    (title_zh, title_en)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::page::Page;

    fn project_page(body: &str) -> Vec<PageNode> {
        let html = format!("<html><body><div class=\"dokuwiki\">{}</div></body></html>", body);
        Page::parse(&html).content_nodes()
    }

    #[test]
    fn test_numbered_items_only_inside_section() {
        let nodes = project_page(
            "<ul><li>1. Before the section</li></ul>\
             <h2>Current Research Projects</h2>\
             <ul><li>1. Integrative omics of lung cancer</li>\
                 <li>2. 癌症網絡藥理學研究</li></ul>\
             <h2>Teaching</h2>\
             <ul><li>3. After the section</li></ul>",
        );
        let projects = extract_research_projects(&nodes);

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, "project-1");
        assert_eq!(projects[0].title_en, "Integrative omics of lung cancer");
        assert_eq!(projects[0].title_zh, "");
        assert_eq!(projects[1].number, 2);
        assert_eq!(projects[1].title_zh, "癌症網絡藥理學研究");
        assert_eq!(projects[1].title_en, "");
    }

    #[test]
    fn test_chinese_marker_opens_section() {
        let nodes = project_page(
            "<h3>研究計畫</h3><p>4. Spatial transcriptomics pipeline</p>",
        );
        let projects = extract_research_projects(&nodes);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].number, 4);
    }

    #[test]
    fn test_h3_does_not_close_section() {
        let nodes = project_page(
            "<h2>Research Projects</h2>\
             <h3>Ongoing</h3>\
             <ul><li>1. Proteogenomics of drug response</li></ul>",
        );
        assert_eq!(extract_research_projects(&nodes).len(), 1);
    }

    #[test]
    fn test_multiline_title_routed_per_line() {
        let nodes = project_page(
            "<h2>Research Projects</h2>\
             <ul><li>1.\nNetwork pharmacology platform\n網絡藥理學平台</li></ul>",
        );
        let projects = extract_research_projects(&nodes);

        assert_eq!(projects[0].title_en, "Network pharmacology platform");
        assert_eq!(projects[0].title_zh, "網絡藥理學平台");
    }

    #[test]
    fn test_digit_led_lines_are_dropped() {
        // The line carrying the numbering contributes nothing by itself.
        let nodes = project_page(
            "<h2>Research Projects</h2>\
             <ul><li>2. 細胞瘧原蟲體學\nMalaria cell atlas</li></ul>",
        );
        let projects = extract_research_projects(&nodes);

        assert_eq!(projects[0].title_zh, "");
        assert_eq!(projects[0].title_en, "Malaria cell atlas");
        assert_eq!(projects[0].description, "");
    }
}
