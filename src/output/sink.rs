//! Persistence of accepted content
//!
//! Two mutually exclusive modes, chosen by `downloadFiles`:
//! - Save: write the body to `<output_folder>/<url-with-slashes-as-underscores>.<ext>`
//! - Log: append the URL as one line to the URL log file

use crate::config::CrawlConfig;
use crate::ScraperError;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Where accepted content goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkMode {
    /// Save full bodies into a folder
    Save { output_folder: PathBuf },
    /// Append accepted URLs to a log file
    Log { url_log_file: PathBuf },
}

/// Writes accepted bodies or URLs to disk
#[derive(Debug)]
pub struct PersistenceSink {
    mode: SinkMode,

    /// Serializes appends to the URL log across concurrent tasks
    log_lock: Mutex<()>,
}

impl PersistenceSink {
    pub fn new(mode: SinkMode) -> Self {
        Self {
            mode,
            log_lock: Mutex::new(()),
        }
    }

    /// Builds the sink for a validated configuration
    pub fn from_config(config: &CrawlConfig) -> Result<Self, ScraperError> {
        let mode = if config.download_files {
            let output_folder = config.output_folder.clone().ok_or_else(|| {
                crate::ConfigError::Validation("outputFolder is not set".to_string())
            })?;
            SinkMode::Save { output_folder }
        } else {
            let url_log_file = config.url_log_file_path.clone().ok_or_else(|| {
                crate::ConfigError::Validation("urlLogFilePath is not set".to_string())
            })?;
            SinkMode::Log { url_log_file }
        };
        Ok(Self::new(mode))
    }

    pub fn mode(&self) -> &SinkMode {
        &self.mode
    }

    /// Creates the output folder in save mode
    pub async fn prepare(&self) -> Result<(), ScraperError> {
        if let SinkMode::Save { output_folder } = &self.mode {
            tokio::fs::create_dir_all(output_folder).await?;
        }
        Ok(())
    }

    /// Persists an accepted response and returns the path written
    pub async fn persist(
        &self,
        url: &str,
        media_type: &str,
        body: &[u8],
    ) -> Result<PathBuf, ScraperError> {
        match &self.mode {
            SinkMode::Save { output_folder } => {
                tokio::fs::create_dir_all(output_folder).await?;
                let path = output_folder.join(file_name_for(url, media_type));
                tokio::fs::write(&path, body).await?;
                Ok(path)
            }
            SinkMode::Log { url_log_file } => {
                self.append_url(url_log_file, url).await?;
                Ok(url_log_file.clone())
            }
        }
    }

    async fn append_url(&self, path: &Path, url: &str) -> Result<(), ScraperError> {
        let _guard = self.log_lock.lock().await;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(format!("{}\n", url).as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Chooses a file extension from the media type family
pub fn extension_for(media_type: &str) -> &'static str {
    if media_type.contains("html") {
        "html"
    } else if media_type.contains("pdf") {
        "pdf"
    } else if media_type.contains("msword") {
        "doc"
    } else {
        "bin"
    }
}

/// Builds the saved file name: the URL with `/` replaced by `_`, plus extension
///
/// # Examples
///
/// ```
/// use web_scraper::output::file_name_for;
///
/// assert_eq!(
///     file_name_for("https://example.com/docs/a", "text/html"),
///     "https:__example.com_docs_a.html"
/// );
/// ```
pub fn file_name_for(url: &str, media_type: &str) -> String {
    format!("{}.{}", url.replace('/', "_"), extension_for(media_type))
}
