// src/extractors/people.rs
use serde::Serialize;

use crate::extractors::patterns::{
    contains_cjk, match_member_entry, match_roster_keyword, split_bilingual_name, RosterCategory,
    DEFAULT_MEMBER_YEAR,
};
use crate::utils::urls::absolute_link;
use crate::wiki::page::{NodeKind, PageNode};

// Unmatched text this short is taken to be a bare member name; anything
// longer is prose and gets dropped.
const BARE_NAME_MIN_CHARS: usize = 2;
const BARE_NAME_MAX_CHARS: usize = 49;

/// One lab member, current or graduated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonRecord {
    pub name_zh: String,
    pub name_en: String,
    pub year_start: i32,
    pub department: String,
    pub research: Vec<String>,
    pub photo: Option<String>,
    pub email: Option<String>,
}

/// The roster, bucketed by role. All six buckets are always serialized,
/// empty or not; downstream templates index them unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeopleRoster {
    pub phd_students: Vec<PersonRecord>,
    pub masters_students: Vec<PersonRecord>,
    pub undergrads: Vec<PersonRecord>,
    pub visiting: Vec<PersonRecord>,
    pub alumni: Vec<PersonRecord>,
    pub postdocs: Vec<PersonRecord>,
}

impl PeopleRoster {
    fn bucket_mut(&mut self, category: RosterCategory) -> &mut Vec<PersonRecord> {
        match category {
            RosterCategory::PhdStudents => &mut self.phd_students,
            RosterCategory::MastersStudents => &mut self.masters_students,
            RosterCategory::Undergrads => &mut self.undergrads,
            RosterCategory::Visiting => &mut self.visiting,
            RosterCategory::Alumni => &mut self.alumni,
            RosterCategory::Postdocs => &mut self.postdocs,
        }
    }

    /// Bucket name / member pairs in output order, for summaries.
    pub fn categories(&self) -> [(&'static str, &[PersonRecord]); 6] {
        [
            ("phd_students", self.phd_students.as_slice()),
            ("masters_students", self.masters_students.as_slice()),
            ("undergrads", self.undergrads.as_slice()),
            ("visiting", self.visiting.as_slice()),
            ("alumni", self.alumni.as_slice()),
            ("postdocs", self.postdocs.as_slice()),
        ]
    }

    pub fn total(&self) -> usize {
        self.categories().iter().map(|(_, members)| members.len()).sum()
    }
}

/// Extracts the member roster from the members page.
///
/// Headers switch the active bucket through the roster keyword table. An
/// alumni header is sticky: from then on the standard-role headers
/// (phd/masters/undergrad/postdoc) file their members under `alumni` too,
/// since the page lists graduates under their old roles. Visiting stays its
/// own bucket either way.
///
/// List items, paragraphs and table rows under an active bucket are parsed
/// with the member-entry matcher; short unmatched text is kept as a bare
/// name, the rest dropped.
pub fn extract_people(nodes: &[PageNode], base_url: &str) -> PeopleRoster {
    let mut roster = PeopleRoster::default();
    let mut current: Option<RosterCategory> = None;
    let mut in_alumni_section = false;

    for node in nodes {
        if node.text.is_empty() {
            continue;
        }

        match node.kind {
            NodeKind::Heading(1..=4) => {
                let header_lower = node.text.to_lowercase();
                if let Some(category) = match_roster_keyword(&header_lower) {
                    if category == RosterCategory::Alumni {
                        in_alumni_section = true;
                        current = Some(RosterCategory::Alumni);
                    } else if in_alumni_section && category.is_standard_role() {
                        current = Some(RosterCategory::Alumni);
                    } else {
                        current = Some(category);
                    }
                }
                // A header without a roster keyword leaves the bucket as-is.
            }
            NodeKind::ListItem | NodeKind::Paragraph | NodeKind::TableRow => {
                let Some(category) = current else {
                    continue;
                };
                if node.text.chars().count() < BARE_NAME_MIN_CHARS {
                    continue;
                }

                if let Some(record) = parse_member(node, base_url) {
                    roster.bucket_mut(category).push(record);
                } else if let Some(record) = parse_bare_name(node, base_url) {
                    tracing::debug!("Keeping unmatched roster text as bare name: '{}'", node.text);
                    roster.bucket_mut(category).push(record);
                }
            }
            _ => {}
        }
    }

    tracing::info!("Extracted {} roster members", roster.total());
    roster
}

fn parse_member(node: &PageNode, base_url: &str) -> Option<PersonRecord> {
    let entry = match_member_entry(&node.text)?;
    let (name_zh, name_en) = split_bilingual_name(&entry.name);

    Some(PersonRecord {
        name_zh,
        name_en,
        year_start: entry.year_start,
        department: entry.department,
        research: entry.research,
        photo: node_photo(node, base_url),
        email: node.email.clone(),
    })
}

/// Fallback for entries without parenthesized metadata: short text is the
/// member's name, routed whole by script.
fn parse_bare_name(node: &PageNode, base_url: &str) -> Option<PersonRecord> {
    let char_count = node.text.chars().count();
    if !(BARE_NAME_MIN_CHARS..=BARE_NAME_MAX_CHARS).contains(&char_count) {
        return None;
    }

    let (name_zh, name_en) = if contains_cjk(&node.text) {
        (node.text.clone(), String::new())
    } else {
        (String::new(), node.text.clone())
    };

    Some(PersonRecord {
        name_zh,
        name_en,
        year_start: DEFAULT_MEMBER_YEAR,
        department: String::new(),
        research: Vec::new(),
        photo: node_photo(node, base_url),
        email: None,
    })
}

fn node_photo(node: &PageNode, base_url: &str) -> Option<String> {
    node.img_src
        .as_deref()
        .map(|src| absolute_link(base_url, src))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::page::Page;

    const BASE: &str = "https://sbl.csie.org/JuanLab";

    fn members_page(body: &str) -> Vec<PageNode> {
        let html = format!("<html><body><div class=\"dokuwiki\">{}</div></body></html>", body);
        Page::parse(&html).content_nodes()
    }

    #[test]
    fn test_members_bucketed_by_header() {
        let nodes = members_page(
            "<h2>PhD Students</h2>\
             <ul><li>王小明 Wang Ming (21-LS) systems biology, genomics</li></ul>\
             <h2>Master Students 碩士班</h2>\
             <ul><li>李四 Li Si (23-CSIE) deep learning</li></ul>",
        );
        let roster = extract_people(&nodes, BASE);

        assert_eq!(roster.phd_students.len(), 1);
        assert_eq!(roster.masters_students.len(), 1);
        assert_eq!(roster.total(), 2);

        let wang = &roster.phd_students[0];
        assert_eq!(wang.name_zh, "王小明");
        assert_eq!(wang.name_en, "Wang Ming");
        assert_eq!(wang.year_start, 2021);
        assert_eq!(wang.department, "LS");
        assert_eq!(wang.research, vec!["systems biology", "genomics"]);
    }

    #[test]
    fn test_alumni_header_is_sticky_for_standard_roles() {
        let nodes = members_page(
            "<h1>Alumni</h1>\
             <h3>PhD Graduates</h3>\
             <ul><li>張三 Chang San (15-LS)</li></ul>\
             <h3>Visiting Scholars</h3>\
             <ul><li>John Doe (19-Med)</li></ul>\
             <h3>Master Graduates</h3>\
             <ul><li>趙六 Chao Liu (17-CSIE)</li></ul>",
        );
        let roster = extract_people(&nodes, BASE);

        // Standard roles after an alumni header file under alumni.
        assert_eq!(roster.alumni.len(), 2);
        assert!(roster.phd_students.is_empty());
        assert!(roster.masters_students.is_empty());
        // Visiting keeps its own bucket even inside the alumni section.
        assert_eq!(roster.visiting.len(), 1);
        assert_eq!(roster.visiting[0].name_en, "John Doe");
    }

    #[test]
    fn test_chinese_alumni_header_counts() {
        let nodes = members_page(
            "<h2>畢業生</h2>\
             <h3>博士班</h3>\
             <ul><li>吳一 Wu Yi (12-LS)</li></ul>",
        );
        let roster = extract_people(&nodes, BASE);
        assert_eq!(roster.alumni.len(), 1);
    }

    #[test]
    fn test_bare_name_fallback() {
        let nodes = members_page(
            "<h2>Undergraduate Students</h2>\
             <ul><li>陳小美</li>\
                 <li>x</li>\
                 <li>This line is far too long to be anyone's name because it keeps going on and on</li></ul>",
        );
        let roster = extract_people(&nodes, BASE);

        assert_eq!(roster.undergrads.len(), 1);
        let member = &roster.undergrads[0];
        assert_eq!(member.name_zh, "陳小美");
        assert_eq!(member.name_en, "");
        assert_eq!(member.year_start, DEFAULT_MEMBER_YEAR);
        assert_eq!(member.department, "");
        assert!(member.research.is_empty());
    }

    #[test]
    fn test_photo_and_email_attach_to_member() {
        let nodes = members_page(
            "<h2>Postdoctoral Fellows</h2>\
             <ul><li>林五 Lin Wu (20-LS) proteomics \
                 <img src=\"/lib/exe/fetch.php?media=people:lin.jpg\" alt=\"\"/>\
                 <a href=\"mailto:lin@ntu.edu.tw\">contact</a></li></ul>",
        );
        let roster = extract_people(&nodes, BASE);

        let member = &roster.postdocs[0];
        assert_eq!(
            member.photo.as_deref(),
            Some("https://sbl.csie.org/lib/exe/fetch.php?media=people:lin.jpg")
        );
        assert_eq!(member.email.as_deref(), Some("lin@ntu.edu.tw"));
    }

    #[test]
    fn test_table_rows_parse_like_list_items() {
        let nodes = members_page(
            "<h2>Visiting Scholars</h2>\
             <table><tr><td>Maria Garcia (22-BEBI) metabolomics</td></tr></table>",
        );
        let roster = extract_people(&nodes, BASE);

        assert_eq!(roster.visiting.len(), 1);
        assert_eq!(roster.visiting[0].name_en, "Maria Garcia");
        assert_eq!(roster.visiting[0].year_start, 2022);
        assert_eq!(roster.visiting[0].department, "BEBI");
    }

    #[test]
    fn test_text_before_any_roster_header_is_dropped() {
        let nodes = members_page("<ul><li>王小明 Wang Ming (21-LS)</li></ul>");
        assert_eq!(extract_people(&nodes, BASE).total(), 0);
    }

    #[test]
    fn test_keywordless_header_keeps_bucket() {
        let nodes = members_page(
            "<h2>PhD Students</h2>\
             <h4>2024 Cohort</h4>\
             <ul><li>周七 Chou Chi (24-LS)</li></ul>",
        );
        let roster = extract_people(&nodes, BASE);
        assert_eq!(roster.phd_students.len(), 1);
    }
}
