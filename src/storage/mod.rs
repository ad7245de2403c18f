// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::extractors::{
    ImageReference, NewsItem, PeopleRoster, PiProfile, ResearchHighlight, ResearchProject,
};
use crate::utils::error::StorageError;

/// Writes the JSON content files the static-site build consumes.
pub struct StorageManager {
    output_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified output directory
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self, StorageError> {
        let output_dir = output_dir.as_ref().to_path_buf();

        if !output_dir.exists() {
            fs::create_dir_all(&output_dir)?;
        }

        Ok(Self { output_dir })
    }

    pub fn save_news(&self, news: &[NewsItem]) -> Result<PathBuf, StorageError> {
        self.write_json("news.json", news)
    }

    pub fn save_research(&self, highlights: &[ResearchHighlight]) -> Result<PathBuf, StorageError> {
        self.write_json("research.json", highlights)
    }

    pub fn save_projects(&self, projects: &[ResearchProject]) -> Result<PathBuf, StorageError> {
        self.write_json("projects.json", projects)
    }

    pub fn save_people(&self, roster: &PeopleRoster) -> Result<PathBuf, StorageError> {
        self.write_json("people.json", roster)
    }

    pub fn save_pi(&self, profile: &PiProfile) -> Result<PathBuf, StorageError> {
        self.write_json("pi.json", profile)
    }

    pub fn save_images_manifest(&self, images: &[ImageReference]) -> Result<PathBuf, StorageError> {
        self.write_json("images_manifest.json", images)
    }

    /// Saves a fetched page's raw HTML under `debug/` for offline inspection
    pub fn save_debug_html(&self, page_id: &str, html: &str) -> Result<PathBuf, StorageError> {
        let debug_dir = self.output_dir.join("debug");
        if !debug_dir.exists() {
            fs::create_dir_all(&debug_dir)?;
        }

        let filename = format!("{}.html", page_id.replace(':', "_").replace(' ', "_"));
        let file_path = debug_dir.join(filename);
        fs::write(&file_path, html)?;

        tracing::info!("Saved raw page HTML to {}", file_path.display());
        Ok(file_path)
    }

    fn write_json<T>(&self, filename: &str, value: &T) -> Result<PathBuf, StorageError>
    where
        T: Serialize + ?Sized,
    {
        let file_path = self.output_dir.join(filename);

        // Pretty-printed UTF-8, never ASCII-escaped: the files are bilingual
        // and get reviewed by hand.
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&file_path, json)?;

        tracing::info!("Saved {}", file_path.display());
        Ok(file_path)
    }
}
