//! Cookie-based authentication for protected crawls
//!
//! The authenticator hands out a `Cookie` header per domain. Cookies come from
//! the domain's persisted cookie file when present; otherwise a scripted login
//! runs once and its cookies are persisted for every later task and run.

mod cookies;
mod login;

pub use cookies::{build_cookie_header, CookieStore, SessionCookie};
pub use login::{BrowserLogin, LoginDriver};

use crate::config::LoginConfig;
use crate::url::{extract_domain, host_of};
use crate::ScraperError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use url::Url;

/// Serializes logins per domain and caches login failures for the run
pub struct Authenticator {
    store: CookieStore,
    login: LoginConfig,
    driver: Arc<dyn LoginDriver>,

    /// One async lock per domain, held from the cookie file check until the
    /// fresh cookies are persisted
    domain_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,

    /// Domains whose login already failed during this run
    failed_domains: Mutex<HashSet<String>>,
}

impl Authenticator {
    pub fn new(store: CookieStore, login: LoginConfig, driver: Arc<dyn LoginDriver>) -> Self {
        Self {
            store,
            login,
            driver,
            domain_locks: Mutex::new(HashMap::new()),
            failed_domains: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the `Cookie` header value for a URL's domain
    ///
    /// # Flow
    ///
    /// 1. Acquire the domain's login lock
    /// 2. Use the persisted cookie file if it holds at least one cookie
    /// 3. Fail fast if a login for this domain already failed this run
    /// 4. Fail if a configured login page belongs to another host
    /// 5. Otherwise log in, persist the cookies and return them
    pub async fn cookie_header(&self, url: &Url) -> Result<String, ScraperError> {
        let domain = extract_domain(url).ok_or_else(|| ScraperError::Login {
            domain: url.to_string(),
            message: "URL has no host".to_string(),
        })?;

        let lock = self.domain_lock(&domain);
        let _guard = lock.lock().await;

        if let Some(cookies) = self.store.load(&domain).await {
            if !cookies.is_empty() {
                tracing::debug!("Using persisted cookies for {}", domain);
                return Ok(build_cookie_header(&cookies));
            }
        }

        if self.has_failed(&domain) {
            return Err(ScraperError::Login {
                domain,
                message: "previous login attempt failed in this run".to_string(),
            });
        }

        let login_url = match &self.login.login_url {
            Some(login_url) => {
                if host_of(login_url).as_deref() != Some(domain.as_str()) {
                    return Err(ScraperError::Login {
                        domain,
                        message: format!("login page {} belongs to another host", login_url),
                    });
                }
                login_url.clone()
            }
            None => url.to_string(),
        };

        tracing::info!("Logging in to {} via {}", domain, login_url);
        let cookies = match self.driver.login(&login_url, &self.login).await {
            Ok(cookies) if !cookies.is_empty() => cookies,
            Ok(_) => {
                self.mark_failed(&domain);
                return Err(ScraperError::Login {
                    domain,
                    message: "login produced no cookies".to_string(),
                });
            }
            Err(e) => {
                self.mark_failed(&domain);
                return Err(ScraperError::Login {
                    domain,
                    message: e.to_string(),
                });
            }
        };

        let path = self.store.save(&domain, &cookies).await?;
        tracing::info!(
            "Login succeeded for {}, {} cookies saved to {}",
            domain,
            cookies.len(),
            path.display()
        );

        Ok(build_cookie_header(&cookies))
    }

    fn domain_lock(&self, domain: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .domain_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(domain.to_string()).or_default().clone()
    }

    fn has_failed(&self, domain: &str) -> bool {
        self.failed_domains
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(domain)
    }

    fn mark_failed(&self, domain: &str) {
        self.failed_domains
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(domain.to_string());
    }
}
