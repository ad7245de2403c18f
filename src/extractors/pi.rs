// src/extractors/pi.rs
use serde::Serialize;

use crate::extractors::patterns::{match_pi_keyword, PiSection};
use crate::utils::urls::absolute_link;
use crate::wiki::page::{NodeKind, PageNode};

// Identity facts are stable and authored nowhere on the wiki in a parseable
// form, so they are fixed here; only photo, bio and the four lists are
// extracted.
const PI_NAME_ZH: &str = "阮雪芬";
const PI_NAME_EN: &str = "Hsueh-Fen Juan";
const PI_TITLE: &str = "Distinguished Professor";
const PI_DEPARTMENT: &str = "Department of Life Science";
const PI_INSTITUTION: &str = "National Taiwan University";
const PI_EMAIL: &str = "yukijuan@ntu.edu.tw";
const PI_EMAIL2: &str = "yukijuan@gmail.com";
const PI_PHONE: &str = "+886-2-3366-4536";
const PI_FAX: &str = "+886-2-2367-3374";
const PI_ADDRESS: &str = "Rm. 1105, Life Science Building, National Taiwan University, \
No. 1 Sec. 4 Roosevelt Road, Taipei 106, Taiwan";

const BIO_MIN_CHARS: usize = 100;
const BIO_MAX_PARAGRAPHS: usize = 3;

/// The principal investigator's profile page, flattened for the site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PiProfile {
    pub name_zh: String,
    pub name_en: String,
    pub title: String,
    pub department: String,
    pub institution: String,
    pub email: String,
    pub email2: String,
    pub phone: String,
    pub fax: String,
    pub address: String,
    pub photo: Option<String>,
    pub bio: String,
    pub education: Vec<String>,
    pub positions: Vec<String>,
    pub awards: Vec<String>,
    pub societies: Vec<String>,
}

impl Default for PiProfile {
    fn default() -> Self {
        Self {
            name_zh: PI_NAME_ZH.to_string(),
            name_en: PI_NAME_EN.to_string(),
            title: PI_TITLE.to_string(),
            department: PI_DEPARTMENT.to_string(),
            institution: PI_INSTITUTION.to_string(),
            email: PI_EMAIL.to_string(),
            email2: PI_EMAIL2.to_string(),
            phone: PI_PHONE.to_string(),
            fax: PI_FAX.to_string(),
            address: PI_ADDRESS.to_string(),
            photo: None,
            bio: String::new(),
            education: Vec::new(),
            positions: Vec::new(),
            awards: Vec::new(),
            societies: Vec::new(),
        }
    }
}

impl PiProfile {
    fn section_mut(&mut self, section: PiSection) -> &mut Vec<String> {
        match section {
            PiSection::Education => &mut self.education,
            PiSection::Positions => &mut self.positions,
            PiSection::Awards => &mut self.awards,
            PiSection::Societies => &mut self.societies,
        }
    }
}

/// Extracts the PI profile page.
///
/// Photo is the first image whose path mentions the PI; bio is the first
/// three substantial paragraphs (over 100 characters) joined with blank
/// lines. Keyworded h2-h4 headers pick the active CV section and list items
/// append to it; there is no closing rule, a section stays active until the
/// next keyword match.
pub fn extract_pi_profile(nodes: &[PageNode], base_url: &str) -> PiProfile {
    let mut pi = PiProfile::default();
    let mut bio_paragraphs: Vec<String> = Vec::new();
    let mut section: Option<PiSection> = None;

    for node in nodes {
        match node.kind {
            NodeKind::Image => {
                if pi.photo.is_some() {
                    continue;
                }
                if let Some(src) = node.img_src.as_deref() {
                    let src_lower = src.to_lowercase();
                    if src_lower.contains("juan") || src_lower.contains("pi") {
                        pi.photo = Some(absolute_link(base_url, src));
                    }
                }
            }
            NodeKind::Paragraph => {
                if bio_paragraphs.len() < BIO_MAX_PARAGRAPHS
                    && node.text.chars().count() > BIO_MIN_CHARS
                {
                    bio_paragraphs.push(node.text.clone());
                }
            }
            NodeKind::Heading(2..=4) => {
                if let Some(matched) = match_pi_keyword(&node.text.to_lowercase()) {
                    section = Some(matched);
                }
            }
            NodeKind::ListItem => {
                if node.text.is_empty() {
                    continue;
                }
                if let Some(active) = section {
                    pi.section_mut(active).push(node.text.clone());
                }
            }
            _ => {}
        }
    }

    pi.bio = bio_paragraphs.join("\n\n");

    tracing::info!(
        "Extracted PI profile: {} education, {} positions, {} awards, {} societies",
        pi.education.len(),
        pi.positions.len(),
        pi.awards.len(),
        pi.societies.len()
    );
    pi
}
