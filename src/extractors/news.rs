// src/extractors/news.rs
use serde::Serialize;

use crate::extractors::patterns::{classify_news, match_news_line, NewsCategory};
use crate::utils::urls::absolute_link;
use crate::wiki::page::{NodeKind, PageNode};

/// One dated announcement from the home page news list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    /// "YYYY-MM" date code the entry was authored under.
    pub date: String,
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub link: Option<String>,
    pub category: NewsCategory,
}

/// Extracts dated news entries from the flattened home page.
///
/// Only list items opening with a `YY.MM` token qualify; every other list
/// item on the page (navigation, research blurbs) falls through silently.
/// Output is ordered newest first, page order breaking ties.
pub fn extract_news(nodes: &[PageNode], base_url: &str) -> Vec<NewsItem> {
    let mut items = Vec::new();

    for node in nodes {
        if node.kind != NodeKind::ListItem {
            continue;
        }
        let Some(line) = match_news_line(&node.text) else {
            continue;
        };

        let category = classify_news(&line.title);
        let link = node
            .href
            .as_deref()
            .map(|href| absolute_link(base_url, href))
            .filter(|url| !url.is_empty());

        items.push(NewsItem {
            date: format!("{}-{:02}", line.year, line.month),
            year: line.year,
            month: line.month,
            title: line.title,
            link,
            category,
        });
    }

    // sort_by is stable, so same-month items keep their page order.
    items.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));

    tracing::info!("Extracted {} news items", items.len());
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::page::Page;

    const BASE: &str = "https://sbl.csie.org/JuanLab";

    fn news_page(body: &str) -> Vec<PageNode> {
        let html = format!("<html><body><div class=\"dokuwiki\">{}</div></body></html>", body);
        Page::parse(&html).content_nodes()
    }

    #[test]
    fn test_extracts_only_dated_list_items() {
        let nodes = news_page(
            "<h1>News</h1>\
             <ul>\
               <li>13.05 Paper published in Nature Communications</li>\
               <li>Useful links</li>\
               <li>24.01 本實驗室榮獲傑出研究獎</li>\
             </ul>",
        );
        let items = extract_news(&nodes, BASE);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].date, "2024-01");
        assert_eq!(items[0].category, NewsCategory::Award);
        assert_eq!(items[1].date, "2013-05");
        assert_eq!(items[1].category, NewsCategory::Publication);
    }

    #[test]
    fn test_sorted_descending_with_century_inference() {
        let nodes = news_page(
            "<ul>\
               <li>99.12 Oldest entry</li>\
               <li>13.01 Middle entry</li>\
               <li>13.09 Newest entry</li>\
             </ul>",
        );
        let items = extract_news(&nodes, BASE);

        let years: Vec<i32> = items.iter().map(|i| i.year).collect();
        assert_eq!(years, vec![2013, 2013, 1999]);
        assert_eq!(items[0].title, "Newest entry");
        assert_eq!(items[1].title, "Middle entry");
    }

    #[test]
    fn test_same_month_items_keep_page_order() {
        let nodes = news_page(
            "<ul>\
               <li>21.06 First on page</li>\
               <li>21.06 Second on page</li>\
             </ul>",
        );
        let items = extract_news(&nodes, BASE);
        assert_eq!(items[0].title, "First on page");
        assert_eq!(items[1].title, "Second on page");
    }

    #[test]
    fn test_link_resolves_against_wiki_root() {
        let nodes = news_page(
            "<ul><li>20.11 Award ceremony \
             <a href=\"doku.php?id=news:ceremony\">details</a></li></ul>",
        );
        let items = extract_news(&nodes, BASE);
        assert_eq!(
            items[0].link.as_deref(),
            Some("https://sbl.csie.org/JuanLab/doku.php?id=news:ceremony")
        );
    }

    #[test]
    fn test_item_without_anchor_has_no_link() {
        let nodes = news_page("<ul><li>20.11 Plain announcement</li></ul>");
        let items = extract_news(&nodes, BASE);
        assert_eq!(items[0].link, None);
    }

    #[test]
    fn test_out_of_range_month_is_dropped() {
        let nodes = news_page("<ul><li>20.13 Not a real month</li></ul>");
        assert!(extract_news(&nodes, BASE).is_empty());
    }
}
