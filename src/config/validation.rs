use super::models::Config;
use axum::http::Uri;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Site base URL '{url}' must be an absolute http(s) URL")]
    InvalidBaseUrl { url: String },

    #[error("Entry path prefix '{prefix}' must start and end with '/'")]
    InvalidEntryPrefix { prefix: String },

    #[error("max_body_bytes must be positive")]
    InvalidBodyLimit,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_site(config)?;
    validate_server(config)?;
    Ok(())
}

/// The base URL must name a host over http(s); the entry prefix must be a
/// directory-like path so identifiers form the last segment.
fn validate_site(config: &Config) -> Result<(), ValidationError> {
    let url = &config.site.base_url;
    let parsed: Option<Uri> = url.parse().ok();
    let absolute = parsed.as_ref().is_some_and(|uri| {
        matches!(uri.scheme_str(), Some("http") | Some("https")) && uri.host().is_some()
    });
    if !absolute {
        return Err(ValidationError::InvalidBaseUrl { url: url.clone() });
    }

    let prefix = &config.site.entry_path_prefix;
    if !prefix.starts_with('/') || !prefix.ends_with('/') {
        return Err(ValidationError::InvalidEntryPrefix {
            prefix: prefix.clone(),
        });
    }

    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.max_body_bytes == 0 {
        return Err(ValidationError::InvalidBodyLimit);
    }
    Ok(())
}
