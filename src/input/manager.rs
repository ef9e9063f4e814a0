//! Input manager for reading résumé and job description files

use crate::error::{Result, ResumeAtsError};
use crate::input::file_detector::MediaType;
use crate::input::text_extractor::extract_bytes;
use std::path::Path;
use std::collections::HashMap;
use log::info;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ResumeAtsError::InvalidInput(
                format!("File does not exist: {}", path.display())
            ));
        }

        let media_type = self.detect_media_type(path)?;
        info!("Extracting {} from: {}", media_type.mime(), path.display());

        let bytes = tokio::fs::read(path).await?;
        let text = extract_bytes(&bytes, media_type).await.map_err(|e| match e {
            ResumeAtsError::Extraction(msg) => {
                ResumeAtsError::Extraction(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    fn detect_media_type(&self, path: &Path) -> Result<MediaType> {
        MediaType::from_path(path).ok_or_else(|| {
            ResumeAtsError::UnsupportedFormat(format!(
                "{} (only .txt and .pdf files are accepted)",
                path.display()
            ))
        })
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
