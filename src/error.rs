//! Error types for NationBuilder API operations.

use thiserror::Error;

/// Errors that can occur during NationBuilder API operations.
///
/// Non-success HTTP statuses are not errors: the raw response is handed
/// back to the caller, who decides how to interpret it.
#[derive(Debug, Error)]
pub enum NbError {
    /// Configuration is missing or incomplete.
    #[error("NationBuilder configuration required: {0}")]
    ConfigMissing(String),

    /// Reading a credentials file failed.
    #[error("Failed to read credentials: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A response carried a non-success status and the caller asked for
    /// it to be treated as an error.
    #[error("NationBuilder API error (HTTP {status_code}): {message}")]
    Api { message: String, status_code: u16 },

    /// Endpoint name not in the catalogue.
    #[error("Unknown endpoint '{0}'")]
    UnknownEndpoint(String),

    /// A page body did not carry a `results` array.
    #[error("Malformed page from {url}: {reason}")]
    MalformedPage { url: String, reason: String },

    /// The page walker hit its configured page cap.
    #[error("Stopped after {max_pages} pages, server still reports a next page")]
    PageLimitExceeded { max_pages: u32 },

    /// The resource does not accept this HTTP verb.
    #[error("{method} is not supported on '{endpoint}'")]
    UnsupportedVerb { endpoint: String, method: String },

    /// No site with this name in the site directory.
    #[error("Site '{0}' not found in site directory")]
    UnknownSite(String),

    /// A site-scoped endpoint was requested without a site.
    #[error("No default site configured, call set_site first")]
    NoDefaultSite,
}

/// Result type alias for NationBuilder operations.
pub type Result<T> = core::result::Result<T, NbError>;
