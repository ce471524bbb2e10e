//! Per-domain cookie persistence
//!
//! Each domain's session cookies live in `<cookie_folder>/<hostname>.txt` as a
//! JSON list of `{name, value}` pairs, so a login survives process restarts.

use crate::ScraperError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A session cookie harvested from a login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

impl SessionCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Serializes cookies into a `Cookie` request header value
///
/// # Examples
///
/// ```
/// use web_scraper::auth::{build_cookie_header, SessionCookie};
///
/// let cookies = vec![SessionCookie::new("sid", "abc"), SessionCookie::new("lang", "en")];
/// assert_eq!(build_cookie_header(&cookies), "sid=abc; lang=en");
/// ```
pub fn build_cookie_header(cookies: &[SessionCookie]) -> String {
    cookies
        .iter()
        .map(|cookie| format!("{}={}", cookie.name, cookie.value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// File-backed cookie jar keyed by hostname
#[derive(Debug, Clone)]
pub struct CookieStore {
    folder: PathBuf,
}

impl CookieStore {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Returns the cookie file path for a hostname
    pub fn path_for(&self, domain: &str) -> PathBuf {
        self.folder.join(format!("{}.txt", domain))
    }

    /// Loads the persisted cookies for a domain
    ///
    /// A missing file yields `None`. A file that is unreadable as a cookie list
    /// is logged and also treated as absent, which triggers a fresh login.
    pub async fn load(&self, domain: &str) -> Option<Vec<SessionCookie>> {
        let path = self.path_for(domain);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read cookie file {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Vec<SessionCookie>>(content.trim()) {
            Ok(cookies) => Some(cookies),
            Err(e) => {
                tracing::warn!("Ignoring invalid cookie file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Persists a domain's cookies, creating the cookie folder if needed
    pub async fn save(
        &self,
        domain: &str,
        cookies: &[SessionCookie],
    ) -> Result<PathBuf, ScraperError> {
        tokio::fs::create_dir_all(&self.folder).await?;

        let path = self.path_for(domain);
        let content = serde_json::to_string_pretty(cookies)?;
        tokio::fs::write(&path, content).await?;

        tracing::debug!("Saved {} cookies to {}", cookies.len(), path.display());
        Ok(path)
    }

    /// Deletes every cookie file in the folder, returning how many were removed
    pub async fn clear(&self) -> Result<usize, ScraperError> {
        let mut entries = match tokio::fs::read_dir(&self.folder).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("txt") {
                tokio::fs::remove_file(&path).await?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
