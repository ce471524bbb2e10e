use crate::config::types::{CrawlConfig, LoginConfig};
use crate::ConfigError;
use std::path::Path;

/// Validates the entire configuration
///
/// Required: seed URLs, a host depth limit, a concurrency level, at least one
/// file type, and the output target matching `download_files`. Protected
/// crawls additionally need a complete login configuration.
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_start_urls(&config.start_urls)?;
    validate_depths(config)?;
    validate_concurrency(config.concurrency)?;
    validate_file_types(&config.file_types)?;
    validate_output(config)?;
    validate_allowed_domains(&config.allowed_domains)?;

    if config.protected {
        match &config.login_config {
            Some(login) => validate_login_config(login)?,
            None => {
                return Err(ConfigError::Validation(
                    "loginConfig is required when protected is set".to_string(),
                ))
            }
        }
    }

    if config.http.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "http.requestTimeoutSecs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_start_urls(urls: &[String]) -> Result<(), ConfigError> {
    if urls.is_empty() {
        return Err(ConfigError::Validation(
            "startUrls must contain at least one URL".to_string(),
        ));
    }

    if urls.iter().any(|url| url.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "startUrls cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

fn validate_depths(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_host_depth.is_none() {
        return Err(ConfigError::Validation(
            "maxHostDepth must be defined".to_string(),
        ));
    }
    Ok(())
}

fn validate_concurrency(concurrency: usize) -> Result<(), ConfigError> {
    if !(1..=100).contains(&concurrency) {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            concurrency
        )));
    }
    Ok(())
}

fn validate_file_types(file_types: &[String]) -> Result<(), ConfigError> {
    if file_types.is_empty() {
        return Err(ConfigError::Validation(
            "fileTypes must contain at least one entry".to_string(),
        ));
    }

    if file_types.iter().any(|label| label.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "fileTypes cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Checks that the output target for the selected persistence mode is set
fn validate_output(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.download_files {
        if !is_set(config.output_folder.as_deref()) {
            return Err(ConfigError::Validation(
                "outputFolder is required when downloadFiles is set".to_string(),
            ));
        }
    } else if !is_set(config.url_log_file_path.as_deref()) {
        return Err(ConfigError::Validation(
            "urlLogFilePath is required when downloadFiles is not set".to_string(),
        ));
    }
    Ok(())
}

fn is_set(path: Option<&Path>) -> bool {
    path.is_some_and(|p| !p.as_os_str().is_empty())
}

/// Validates allow-list patterns (exact hosts or "*.example.com")
fn validate_allowed_domains(patterns: &[String]) -> Result<(), ConfigError> {
    for pattern in patterns {
        let host = pattern.strip_prefix("*.").unwrap_or(pattern);
        if host.is_empty() {
            return Err(ConfigError::InvalidPattern(format!(
                "Allowed domain pattern '{}' has no host",
                pattern
            )));
        }

        if host.contains('/') || host.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidPattern(format!(
                "Allowed domain '{}' must be a bare hostname",
                pattern
            )));
        }
    }
    Ok(())
}

fn validate_login_config(login: &LoginConfig) -> Result<(), ConfigError> {
    let selectors = [
        ("usernameSelector", &login.username_selector),
        ("passwordSelector", &login.password_selector),
        ("submitSelector", &login.submit_selector),
    ];

    for (name, value) in selectors {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "loginConfig.{} cannot be empty",
                name
            )));
        }
    }

    Ok(())
}
