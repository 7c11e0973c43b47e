//! Credential loading.
//!
//! Credentials come from a small text file:
//!
//! ```text
//! slug: my-nation
//! api_key: 0123abcd
//! default_site: my_site
//! ```
//!
//! or from the `NATIONBUILDER_SLUG`, `NATIONBUILDER_API_KEY` and
//! `NATIONBUILDER_SITE` environment variables.

use std::env;
use std::fs;
use std::path::Path;

use crate::error::{NbError, Result};

/// Slug, API key and optional default site for one nation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub slug: String,
    pub api_key: String,
    pub default_site: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("slug", &self.slug)
            .field("default_site", &self.default_site)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Parse `key: value` lines.
    ///
    /// Returns `None` when `slug` or `api_key` is missing. Unknown keys and
    /// lines without a colon are ignored; a repeated key keeps its last value.
    pub fn parse(text: &str) -> Option<Self> {
        let mut slug = None;
        let mut api_key = None;
        let mut default_site = None;

        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim() {
                "slug" => slug = Some(value),
                "api_key" => api_key = Some(value),
                "default_site" => default_site = Some(value),
                _ => {}
            }
        }

        Some(Self {
            slug: slug?,
            api_key: api_key?,
            default_site,
        })
    }

    /// Read and parse a credentials file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read. A readable file that
    /// lacks `slug` or `api_key` yields `Ok(None)`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Read credentials from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `NATIONBUILDER_SLUG` or `NATIONBUILDER_API_KEY`
    /// is not set.
    pub fn from_env() -> Result<Self> {
        let slug = env::var("NATIONBUILDER_SLUG").map_err(|_| {
            NbError::ConfigMissing("NATIONBUILDER_SLUG environment variable not set".to_string())
        })?;
        let api_key = env::var("NATIONBUILDER_API_KEY").map_err(|_| {
            NbError::ConfigMissing(
                "NATIONBUILDER_API_KEY environment variable not set".to_string(),
            )
        })?;
        let default_site = env::var("NATIONBUILDER_SITE").ok();

        Ok(Self {
            slug,
            api_key,
            default_site,
        })
    }
}
