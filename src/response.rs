//! Raw API responses and the rate-limit diagnostics read from them.

use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, DATE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{NbError, Result};

/// Header carrying the number of requests left in the current window.
pub const RATE_LIMIT_REMAINING: &str = "nation-ratelimit-remaining";

/// A fully-read HTTP response.
///
/// The request issuer never inspects the status code: a 404 or 500 comes
/// back as an `ApiResponse` just like a 200 does.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    /// Build a response from its parts.
    pub fn from_parts(url: Url, status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            url,
            status,
            headers,
            body,
        }
    }

    /// Drain a transport response into an `ApiResponse`.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(NbError::Http)?.to_vec();

        Ok(Self::from_parts(url, status, headers, body))
    }

    /// The URL the request was sent to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns true for any 2xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a non-2xx response into [`NbError::Api`].
    ///
    /// The request issuer never does this on its own; callers opt in.
    ///
    /// # Errors
    ///
    /// Returns [`NbError::Api`] carrying the server's message when the
    /// status is not a success.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(NbError::Api {
            message: self.error_message(),
            status_code: self.status.as_u16(),
        })
    }

    /// Extract an error message from a failed response body.
    fn error_message(&self) -> String {
        if let Ok(json) = serde_json::from_slice::<serde_json::Value>(&self.body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(code) = json.get("code").and_then(|m| m.as_str()) {
                return code.to_string();
            }
        }

        let text = self.text();
        if text.trim().is_empty() {
            format!("HTTP {}", self.status)
        } else {
            text
        }
    }

    /// Rate-limit diagnostics carried by this response.
    pub fn rate_status(&self) -> RateStatus {
        let date = self
            .headers
            .get(DATE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
            .map(|d| d.with_timezone(&Utc));

        let remaining = self
            .headers
            .get(RATE_LIMIT_REMAINING)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());

        RateStatus {
            date,
            status_code: self.status.as_u16(),
            remaining,
        }
    }
}

/// Server time, status code and remaining request budget of one response.
///
/// Only reported for operator visibility, never acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateStatus {
    pub date: Option<DateTime<Utc>>,
    pub status_code: u16,
    pub remaining: Option<u32>,
}

impl fmt::Display for RateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(f, "{}", date.format("%a, %d %b %Y %H:%M:%S GMT"))?,
            None => f.write_str("-")?,
        }
        write!(f, "  Status Code: {}", self.status_code)?;
        match self.remaining {
            Some(remaining) => write!(f, "  Rate Limit: {remaining}"),
            None => f.write_str("  Rate Limit: -"),
        }
    }
}
