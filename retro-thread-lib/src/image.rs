//! Box art lookup via Google Custom Search, then a plain download.

use crate::config::{require, Settings};
use crate::records::GameRecord;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const GOOGLE_API: &str = "https://www.googleapis.com";
pub const DEFAULT_IMAGE_PATH: &str = "image.jpg";

/// An image fetched for the first post of a thread.
#[derive(Debug, Clone)]
pub struct BoxArt {
    pub url: String,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, record: &GameRecord) -> Result<BoxArt>;
}

pub fn box_art_query(record: &GameRecord) -> String {
    format!("box art {} {}", record.title, record.platform)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

#[derive(Debug, Clone)]
pub struct GoogleImageSearch {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    engine_id: Option<String>,
    image_path: PathBuf,
}

impl GoogleImageSearch {
    pub fn new(api_key: Option<String>, engine_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: GOOGLE_API.to_string(),
            api_key,
            engine_id,
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.google_developer_key.clone(),
            settings.google_search_engine_id.clone(),
        )
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Where downloaded images are written. Overwritten on every run.
    pub fn with_image_path(mut self, path: impl AsRef<Path>) -> Self {
        self.image_path = path.as_ref().to_path_buf();
        self
    }

    /// URL of the first image result for `query`.
    pub async fn search(&self, query: &str) -> Result<String> {
        let api_key = require(&self.api_key, "GOOGLE_DEVELOPER_KEY")?;
        let engine_id = require(&self.engine_id, "GOOGLE_CUSTOM_SEARCH_ENGINE_ID")?;

        let response: SearchResponse = self
            .client
            .get(format!("{}/customsearch/v1", self.base_url))
            .query(&[
                ("key", api_key),
                ("cx", engine_id),
                ("q", query),
                ("searchType", "image"),
                ("num", "1"),
                ("safe", "active"),
                ("fileType", "jpg"),
                ("imgType", "photo"),
            ])
            .send()
            .await?
            .error_for_status()
            .context("Image search failed")?
            .json()
            .await
            .context("Failed to parse image search response")?;

        response
            .items
            .into_iter()
            .next()
            .map(|item| item.link)
            .ok_or_else(|| anyhow!("No image results for {:?}", query))
    }

    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("Failed to download image: {}", url))?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageSource for GoogleImageSearch {
    async fn fetch(&self, record: &GameRecord) -> Result<BoxArt> {
        let query = box_art_query(record);
        let url = self.search(&query).await?;
        info!(%url, "Found box art");

        let bytes = self.download(&url).await?;
        tokio::fs::write(&self.image_path, &bytes)
            .await
            .with_context(|| format!("Failed to write image: {}", self.image_path.display()))?;

        info!(
            bytes = bytes.len(),
            path = %self.image_path.display(),
            "Saved box art"
        );

        Ok(BoxArt {
            url,
            path: self.image_path.clone(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_art_query() {
        let record = GameRecord {
            title: "Zork".to_string(),
            platform: "Apple II".to_string(),
        };
        assert_eq!(box_art_query(&record), "box art Zork Apple II");
    }

    #[test]
    fn test_search_response_without_items() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"kind": "customsearch#search"}"#).unwrap();
        assert!(response.items.is_empty());
    }
}
