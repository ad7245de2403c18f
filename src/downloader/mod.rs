// src/downloader/mod.rs
use std::fs;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::ImageReference;
use crate::utils::error::{AppError, FetchError, ImageError};
use crate::utils::urls::percent_decode;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";
const ACCEPT_IMAGES: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";
const REQUEST_TIMEOUT_SECS: u64 = 30;

// Target directory per image, decided by the first list whose pattern
// appears in the combined filename + URL.
const CATEGORY_PATTERNS: &[(&str, &[&str])] = &[
    ("people", &["member", "student", "alumni", "pi", "photo", "portrait"]),
    ("research", &["highlight", "research", "figure", "diagram"]),
    ("covers", &["cover", "banner", "hero"]),
    ("gallery", &["lab", "group", "event", "阮雪芬"]),
];
const FALLBACK_CATEGORY: &str = "misc";

// --- Regex Patterns (Lazy Static) ---
static UNSAFE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("Failed to compile UNSAFE_CHARS_RE"));

static WHITESPACE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RUN_RE"));

static IMAGE_EXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.(jpg|jpeg|png|gif|webp|svg)$").expect("Failed to compile IMAGE_EXT_RE")
});

/// Per-item outcomes of one download run.
#[derive(Debug, Default, Clone, Copy)]
pub struct DownloadStats {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Downloads every manifest image into `<images_dir>/<category>/`.
///
/// Individual failures are logged and counted, never fatal: a partially
/// mirrored image set is still useful for the site build. Existing files
/// are skipped so reruns only fetch what is missing.
pub async fn run(
    manifest_path: &Path,
    images_dir: &Path,
    delay_ms: u64,
    create_webp: bool,
) -> Result<DownloadStats, AppError> {
    let raw = fs::read_to_string(manifest_path)?;
    let images: Vec<ImageReference> = serde_json::from_str(&raw).map_err(|e| {
        AppError::Config(format!(
            "invalid manifest {}: {}",
            manifest_path.display(),
            e
        ))
    })?;

    tracing::info!("Manifest lists {} images", images.len());
    fs::create_dir_all(images_dir)?;

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(FetchError::Network)?;

    let delay = Duration::from_millis(delay_ms);
    let mut stats = DownloadStats::default();

    let pb = ProgressBar::new(images.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    for (index, image) in images.iter().enumerate() {
        let category = detect_category(&image.filename, &image.url);
        let filename = if image.filename.is_empty() {
            format!("image_{}.png", index + 1)
        } else {
            sanitize_filename(&image.filename)
        };
        let output_path = images_dir.join(category).join(&filename);

        if output_path.exists() {
            tracing::debug!("Skipping existing {}/{}", category, filename);
            stats.skipped += 1;
            pb.inc(1);
            continue;
        }

        pb.set_message(format!("{}/{}", category, filename));
        match download_one(&client, &image.url, &output_path, create_webp).await {
            Ok(()) => stats.downloaded += 1,
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", image.url, e);
                stats.failed += 1;
            }
        }
        pb.inc(1);

        tokio::time::sleep(delay).await;
    }
    pb.finish_with_message("done");

    log_category_counts(images_dir);
    Ok(stats)
}

async fn download_one(
    client: &reqwest::Client,
    url: &str,
    output_path: &Path,
    create_webp: bool,
) -> Result<(), ImageError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, ACCEPT_IMAGES)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ImageError::Http(status));
    }

    // The wiki serves HTML error pages with status 200 sometimes; trust the
    // declared content type over the status line.
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.starts_with("image/") {
        return Err(ImageError::NotAnImage(content_type));
    }

    let bytes = response.bytes().await?;

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, &bytes)?;

    if create_webp && is_webp_source(output_path) {
        // A failed transcode is only a missing optimization.
        if let Err(e) = write_webp_copy(&bytes, output_path) {
            tracing::warn!("Could not create WebP for {}: {}", output_path.display(), e);
        }
    }

    Ok(())
}

fn is_webp_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ext == "jpg" || ext == "jpeg" || ext == "png"
        })
        .unwrap_or(false)
}

fn write_webp_copy(bytes: &[u8], original: &Path) -> Result<(), ImageError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;

    // Convert RGBA to RGB before encoding
    let rgb = image::DynamicImage::ImageRgb8(decoded.to_rgb8());
    let webp_path = original.with_extension("webp");
    rgb.save_with_format(&webp_path, image::ImageFormat::WebP)
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    Ok(())
}

fn detect_category(filename: &str, url: &str) -> &'static str {
    let combined = format!("{} {}", filename, url).to_lowercase();

    for &(category, patterns) in CATEGORY_PATTERNS {
        if patterns.iter().any(|p| combined.contains(p)) {
            return category;
        }
    }
    FALLBACK_CATEGORY
}

fn sanitize_filename(filename: &str) -> String {
    let decoded = percent_decode(filename);
    let last_segment = decoded.rsplit('/').next().unwrap_or(&decoded);
    let without_query = last_segment.split('?').next().unwrap_or(last_segment);

    let cleaned = UNSAFE_CHARS_RE.replace_all(without_query, "_");
    let mut cleaned = WHITESPACE_RUN_RE.replace_all(&cleaned, "_").to_string();

    if !IMAGE_EXT_RE.is_match(&cleaned.to_lowercase()) {
        cleaned.push_str(".png");
    }
    cleaned
}

fn log_category_counts(images_dir: &Path) {
    let Ok(entries) = fs::read_dir(images_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let count = fs::read_dir(&path).map(|d| d.count()).unwrap_or(0);
            tracing::info!("  {}: {} files", entry.file_name().to_string_lossy(), count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("people:王小明.jpg"), "people_王小明.jpg");
        assert_eq!(sanitize_filename("lab photo 2023.png"), "lab_photo_2023.png");
    }

    #[test]
    fn test_sanitize_strips_path_and_query() {
        assert_eq!(sanitize_filename("media/research/atp.gif?cache=1"), "atp.gif");
    }

    #[test]
    fn test_sanitize_decodes_percent_escapes() {
        assert_eq!(sanitize_filename("%E9%98%AE%E9%9B%AA%E8%8A%AC.jpg"), "阮雪芬.jpg");
    }

    #[test]
    fn test_sanitize_ensures_image_extension() {
        assert_eq!(sanitize_filename("research:atp"), "research_atp.png");
        // An uppercase extension already counts.
        assert_eq!(sanitize_filename("PHOTO.JPG"), "PHOTO.JPG");
    }

    #[test]
    fn test_category_priority_order() {
        // "student" (people) wins over "research" even when both appear.
        assert_eq!(
            detect_category("student_figure.jpg", "https://example.org/x"),
            "people"
        );
        assert_eq!(
            detect_category("atp_diagram.png", "https://example.org/x"),
            "research"
        );
        assert_eq!(
            detect_category("hero.png", "https://example.org/x"),
            "covers"
        );
        assert_eq!(
            detect_category("阮雪芬2023.jpg", "https://example.org/x"),
            "gallery"
        );
        assert_eq!(
            detect_category("untagged.png", "https://example.org/files/x.png"),
            "misc"
        );
    }

    #[test]
    fn test_category_also_reads_the_url() {
        assert_eq!(
            detect_category(
                "x.png",
                "https://sbl.csie.org/lib/exe/fetch.php?media=research:x.png"
            ),
            "research"
        );
    }
}
