//! Server address handling.

use thiserror::Error;

/// Address of a locally running reconstruction backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Adresse ist leer")]
    Empty,
    #[error("nur http- und https-Adressen werden unterstützt")]
    UnsupportedScheme,
}

/// Normalizes a user-entered server address: trims whitespace, requires an
/// http(s) scheme and strips trailing slashes.
pub fn normalize_base_url(input: &str) -> Result<String, EndpointError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EndpointError::Empty);
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(EndpointError::UnsupportedScheme);
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Joins a server-relative path onto a base address. Absolute URLs pass
/// through untouched.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_whitespace_and_trailing_slashes() {
        assert_eq!(
            normalize_base_url("  http://localhost:5000/  "),
            Ok("http://localhost:5000".to_string())
        );
        assert_eq!(
            normalize_base_url("https://recon.example.org"),
            Ok("https://recon.example.org".to_string())
        );
    }

    #[test]
    fn empty_and_schemeless_addresses_are_rejected() {
        assert_eq!(normalize_base_url("   "), Err(EndpointError::Empty));
        assert_eq!(
            normalize_base_url("localhost:5000"),
            Err(EndpointError::UnsupportedScheme)
        );
        assert_eq!(
            normalize_base_url("ftp://host"),
            Err(EndpointError::UnsupportedScheme)
        );
    }

    #[test]
    fn join_resolves_server_relative_paths() {
        assert_eq!(
            join_url("http://localhost:5000", "/upload"),
            "http://localhost:5000/upload"
        );
        assert_eq!(
            join_url("http://localhost:5000", "preview/abc"),
            "http://localhost:5000/preview/abc"
        );
    }

    #[test]
    fn join_passes_absolute_urls_through() {
        assert_eq!(
            join_url("http://localhost:5000", "https://cdn.example.org/p.png"),
            "https://cdn.example.org/p.png"
        );
    }
}
