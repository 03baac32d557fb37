use crate::config::types::{ApiConfig, Config, OutputConfig, SEMESTER_PLACEHOLDER};
use crate::ConfigError;
use url::Url;

const MAX_INDENT: usize = 8;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates remote API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page_size must be >= 1, got {}",
            config.page_size
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    validate_url_template(&config.url_template)
}

/// Validates that the template resolves to an absolute HTTP(S) URL
fn validate_url_template(template: &str) -> Result<(), ConfigError> {
    if !template.contains(SEMESTER_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "url_template must contain the {} placeholder, got '{}'",
            SEMESTER_PLACEHOLDER, template
        )));
    }

    let sample = template.replace(SEMESTER_PLACEHOLDER, "0");
    let url = Url::parse(&sample)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid url_template '{}': {}", template, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "url_template '{}' must use http or https",
            template
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if config.indent > MAX_INDENT {
        return Err(ConfigError::Validation(format!(
            "indent must be <= {}, got {}",
            MAX_INDENT, config.indent
        )));
    }

    Ok(())
}
