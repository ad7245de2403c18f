// src/extractors/mod.rs
pub mod images;
pub mod news;
pub mod patterns;
pub mod people;
pub mod pi;
pub mod projects;
pub mod research;

// Re-export the extractor entry points and their record types
#[allow(unused_imports)]
pub use images::{dedup_by_url, extract_image_urls, ImageReference};
#[allow(unused_imports)]
pub use news::{extract_news, NewsItem};
#[allow(unused_imports)]
pub use people::{extract_people, PeopleRoster, PersonRecord};
#[allow(unused_imports)]
pub use pi::{extract_pi_profile, PiProfile};
#[allow(unused_imports)]
pub use projects::{extract_research_projects, ResearchProject};
#[allow(unused_imports)]
pub use research::{extract_research_highlights, ResearchHighlight};
