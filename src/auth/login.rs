//! Scripted browser login
//!
//! The `LoginDriver` trait is the seam between the authenticator and whatever
//! performs the login. `BrowserLogin` drives headless Chromium over CDP:
//! open the login page, type the credentials into the configured selectors,
//! submit, wait for the post-login navigation and harvest the cookies.

use crate::auth::cookies::SessionCookie;
use crate::config::LoginConfig;
use crate::ScraperError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;

/// Performs a login and returns the resulting session cookies
#[async_trait]
pub trait LoginDriver: Send + Sync {
    async fn login(
        &self,
        login_url: &str,
        login: &LoginConfig,
    ) -> Result<Vec<SessionCookie>, ScraperError>;
}

/// Login driver backed by a headless Chromium instance
///
/// A fresh browser is launched per login and closed afterwards; logins are
/// rare (once per domain per run) so nothing is kept warm.
#[derive(Debug, Default, Clone)]
pub struct BrowserLogin;

impl BrowserLogin {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LoginDriver for BrowserLogin {
    async fn login(
        &self,
        login_url: &str,
        login: &LoginConfig,
    ) -> Result<Vec<SessionCookie>, ScraperError> {
        let config = BrowserConfig::builder().build().map_err(ScraperError::Browser)?;
        let (mut browser, mut handler) = Browser::launch(config).await.map_err(browser_error)?;

        // The CDP handler must be polled for the browser to make progress
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = run_login_flow(&browser, login_url, login).await;

        if let Err(e) = browser.close().await {
            tracing::warn!("Failed to close login browser: {}", e);
        }
        let _ = browser.wait().await;
        handler_task.abort();

        result
    }
}

async fn run_login_flow(
    browser: &Browser,
    login_url: &str,
    login: &LoginConfig,
) -> Result<Vec<SessionCookie>, ScraperError> {
    tracing::info!("Opening login page {}", login_url);
    let page = browser.new_page(login_url).await.map_err(browser_error)?;
    page.wait_for_navigation().await.map_err(browser_error)?;

    fill(&page, &login.username_selector, &login.username).await?;
    fill(&page, &login.password_selector, &login.password).await?;

    page.find_element(login.submit_selector.as_str())
        .await
        .map_err(browser_error)?
        .click()
        .await
        .map_err(browser_error)?;
    page.wait_for_navigation().await.map_err(browser_error)?;

    let cookies = page
        .get_cookies()
        .await
        .map_err(browser_error)?
        .into_iter()
        .map(|cookie| SessionCookie::new(cookie.name, cookie.value))
        .collect();

    Ok(cookies)
}

/// Focuses the element matching `selector` and types `text` into it
async fn fill(page: &Page, selector: &str, text: &str) -> Result<(), ScraperError> {
    page.find_element(selector)
        .await
        .map_err(browser_error)?
        .click()
        .await
        .map_err(browser_error)?
        .type_str(text)
        .await
        .map_err(browser_error)?;
    Ok(())
}

fn browser_error(error: chromiumoxide::error::CdpError) -> ScraperError {
    ScraperError::Browser(error.to_string())
}
