// src/extractors/images.rs
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::utils::urls::{absolute_image_src, percent_decode};
use crate::wiki::page::Page;

// Bare paths ending in one of these count as images even outside the
// DokuWiki media endpoint.
const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// One downloadable image discovered on a page. The download subcommand
/// reads these back from the manifest, so it round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReference {
    pub url: String,
    pub filename: String,
    pub alt: String,
}

/// Collects every image reference on a page, navigation chrome included.
///
/// A src is relevant if it goes through the media endpoint
/// (`/lib/exe/fetch.php`) or ends in a common image extension. The filename
/// is the media id: the text after the last `media=` parameter, otherwise
/// the last path segment with its query stripped, URL-decoded either way.
pub fn extract_image_urls(page: &Page, base_url: &str) -> Vec<ImageReference> {
    let mut images = Vec::new();

    for img in page.images() {
        if !is_relevant(&img.src) {
            continue;
        }
        let url = absolute_image_src(base_url, &img.src);
        let filename = filename_from_url(&url);
        images.push(ImageReference {
            url,
            filename,
            alt: img.alt,
        });
    }

    tracing::debug!("Collected {} image references", images.len());
    images
}

fn is_relevant(src: &str) -> bool {
    src.contains("/lib/exe/fetch.php") || IMAGE_EXTENSIONS.iter().any(|ext| src.ends_with(ext))
}

fn filename_from_url(url: &str) -> String {
    if let Some((_, media_id)) = url.rsplit_once("media=") {
        return percent_decode(media_id);
    }
    let last_segment = url.rsplit('/').next().unwrap_or(url);
    let without_query = last_segment.split('?').next().unwrap_or(last_segment);
    percent_decode(without_query)
}

/// Drops later duplicates of the same absolute URL, keeping first-seen
/// order. Identity is the exact URL string, so two spellings of one
/// resource stay distinct.
pub fn dedup_by_url(images: Vec<ImageReference>) -> Vec<ImageReference> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(images.len());

    for image in images {
        if seen.insert(image.url.clone()) {
            unique.push(image);
        }
    }
    unique
}
