// src/extractors/patterns.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// --- Constants ---
/// Start year recorded for a member entry whose parenthesized info carries no
/// parseable 2-digit year token.
pub const DEFAULT_MEMBER_YEAR: i32 = 2024;

// --- Regex Patterns (Lazy Static) ---
// News lines as authored on the wiki: "YY.MM free-text title".
static NEWS_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2})\.(\d{2})\s+(.+)$").expect("Failed to compile NEWS_LINE_RE")
});

// Numbered project entries, tolerating leading wiki emphasis markers ("**1. …").
static PROJECT_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\*?\*?\s*(\d+)\.\s*(.+)$").expect("Failed to compile PROJECT_LINE_RE")
});

// Member entries: name text, first parenthesized group, trailing free text.
// The paren group mixes year and department in loose shapes like "23- Med",
// "20-21 LS", "19-22 LS; BEBI ms"; parse_member_info picks it apart.
static MEMBER_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^(]+?)\s*\(([^)]+)\)(.*)$").expect("Failed to compile MEMBER_LINE_RE")
});

static YEAR_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{2}").expect("Failed to compile YEAR_TOKEN_RE")
});

static NON_SLUG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9]+").expect("Failed to compile NON_SLUG_RE")
});

// --- Category Tags ---

/// News item classification, serialized lowercase into `news.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    General,
    Award,
    Publication,
    Recruitment,
}

/// The six roster buckets every people extraction produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterCategory {
    PhdStudents,
    MastersStudents,
    Undergrads,
    Visiting,
    Alumni,
    Postdocs,
}

impl RosterCategory {
    /// Standard lab roles. Once an alumni header has been seen these remap to
    /// the alumni bucket: a graduated member is filed once, under alumni.
    pub fn is_standard_role(self) -> bool {
        matches!(
            self,
            RosterCategory::PhdStudents
                | RosterCategory::MastersStudents
                | RosterCategory::Undergrads
                | RosterCategory::Postdocs
        )
    }
}

/// PI profile list sections switched by header keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiSection {
    Education,
    Positions,
    Awards,
    Societies,
}

// --- Keyword Tables (ordered, first match wins) ---
// Priority order is part of the contract. Alumni keywords outrank everything
// so a header like "PhD Alumni" files under alumni, and more specific
// keywords come before their substrings (博士後/"postdoc" before 博士/
// "doctoral") so "Postdoctoral Researchers" lands in postdocs rather than
// phd_students.
const ROSTER_KEYWORDS: &[(&str, RosterCategory)] = &[
    ("alumni", RosterCategory::Alumni),
    ("畢業", RosterCategory::Alumni),
    ("former", RosterCategory::Alumni),
    ("postdoc", RosterCategory::Postdocs),
    ("博士後", RosterCategory::Postdocs),
    ("phd", RosterCategory::PhdStudents),
    ("ph.d", RosterCategory::PhdStudents),
    ("博士", RosterCategory::PhdStudents),
    ("doctoral", RosterCategory::PhdStudents),
    ("master", RosterCategory::MastersStudents),
    ("碩士", RosterCategory::MastersStudents),
    ("ms student", RosterCategory::MastersStudents),
    ("undergrad", RosterCategory::Undergrads),
    ("大專", RosterCategory::Undergrads),
    ("大學部", RosterCategory::Undergrads),
    ("visiting", RosterCategory::Visiting),
    ("exchange", RosterCategory::Visiting),
    ("訪問", RosterCategory::Visiting),
];

const PI_SECTION_KEYWORDS: &[(&str, PiSection)] = &[
    ("education", PiSection::Education),
    ("學歷", PiSection::Education),
    ("position", PiSection::Positions),
    ("經歷", PiSection::Positions),
    ("award", PiSection::Awards),
    ("榮譽", PiSection::Awards),
    ("honor", PiSection::Awards),
    ("society", PiSection::Societies),
    ("學會", PiSection::Societies),
];

// News classification keyword sets, tested in priority order
// award > publication > recruitment.
const AWARD_KEYWORDS: &[&str] = &["獎", "award", "榮獲", "得獎"];
const PUBLICATION_KEYWORDS: &[&str] = &["發表", "paper", "publish", "journal"];
const RECRUITMENT_KEYWORDS: &[&str] = &["徵", "recruit", "聘"];

// --- Structured Match Results ---

/// A news line split into its date code and title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsLine {
    pub year: i32,
    pub month: u32,
    pub title: String,
}

/// A member roster line split into name text and parsed metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    pub name: String,
    pub year_start: i32,
    pub department: String,
    pub research: Vec<String>,
}

// --- Matchers ---
// Every matcher is total: it matches or declines, never panics.

/// Matches a normalized "YY.MM title" news line. Declines 4-digit years and
/// month tokens outside 1-12.
pub fn match_news_line(text: &str) -> Option<NewsLine> {
    let caps = NEWS_LINE_RE.captures(text)?;
    let yy: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some(NewsLine {
        year: infer_century(yy),
        month,
        title: caps[3].to_string(),
    })
}

/// Classifies a news title by bilingual keyword membership.
pub fn classify_news(title: &str) -> NewsCategory {
    let lower = title.to_lowercase();
    if AWARD_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        NewsCategory::Award
    } else if PUBLICATION_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        NewsCategory::Publication
    } else if RECRUITMENT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        NewsCategory::Recruitment
    } else {
        NewsCategory::General
    }
}

/// Matches a numbered project entry "N. title", returning (N, title).
pub fn match_numbered_project(text: &str) -> Option<(u32, String)> {
    let caps = PROJECT_LINE_RE.captures(text)?;
    let number: u32 = caps[1].parse().ok()?;
    Some((number, caps[2].to_string()))
}

/// Matches a member roster line "Name (info) research, tags".
///
/// The info group yields the start year (first 2-digit token, century
/// inferred, [`DEFAULT_MEMBER_YEAR`] when absent) and the department (info
/// with the first occurrence of the year digits removed, stray separators
/// trimmed). Trailing text splits on commas into research tags.
pub fn match_member_entry(text: &str) -> Option<MemberEntry> {
    let caps = MEMBER_LINE_RE.captures(text)?;
    let name = caps[1].trim().to_string();
    let (year_start, department) = parse_member_info(caps[2].trim());
    let research = caps[3]
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from)
        .collect();
    Some(MemberEntry {
        name,
        year_start,
        department,
        research,
    })
}

fn parse_member_info(info: &str) -> (i32, String) {
    match YEAR_TOKEN_RE.find(info) {
        Some(m) => {
            let year = infer_century(m.as_str().parse().unwrap_or(0));
            // Remove only the first occurrence of the year digits; whatever
            // survives (minus stray separators) is the department code.
            let dept = info
                .replacen(m.as_str(), "", 1)
                .trim_matches([' ', '-', ';', ','].as_slice())
                .to_string();
            (year, dept)
        }
        None => (DEFAULT_MEMBER_YEAR, info.to_string()),
    }
}

/// Looks a lower-cased header up in the roster keyword table.
pub fn match_roster_keyword(header_lower: &str) -> Option<RosterCategory> {
    ROSTER_KEYWORDS
        .iter()
        .find(|(kw, _)| header_lower.contains(kw))
        .map(|&(_, category)| category)
}

/// Looks a lower-cased header up in the PI section keyword table.
pub fn match_pi_keyword(header_lower: &str) -> Option<PiSection> {
    PI_SECTION_KEYWORDS
        .iter()
        .find(|(kw, _)| header_lower.contains(kw))
        .map(|&(_, section)| section)
}

// --- Text Classification Helpers ---

/// True if the text contains any CJK Unified Ideograph (U+4E00..U+9FFF).
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// Maps a 2-digit year to its century: below 50 is 2000s, 50 and up is 1900s.
pub fn infer_century(two_digit: u32) -> i32 {
    if two_digit < 50 {
        2000 + two_digit as i32
    } else {
        1900 + two_digit as i32
    }
}

/// Splits a whitespace-tokenized bilingual name into (Chinese, English)
/// halves. CJK tokens route to the Chinese side (last one wins); the rest
/// concatenate in order on the English side.
pub fn split_bilingual_name(name: &str) -> (String, String) {
    let mut zh = String::new();
    let mut en = String::new();
    for token in name.split_whitespace() {
        if contains_cjk(token) {
            zh = token.to_string();
        } else {
            if !en.is_empty() {
                en.push(' ');
            }
            en.push_str(token);
        }
    }
    (zh, en)
}

/// Lowercased slug: runs of anything outside [a-z0-9] become single hyphens.
pub fn slugify(text: &str) -> String {
    NON_SLUG_RE
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}
