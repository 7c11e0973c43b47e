//! Mock server state management.
//!
//! Provides the in-memory data store for the mock NationBuilder API server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use serde_json::Value;

use crate::Item;

/// Rate-limit budget reported on the first request.
pub const DEFAULT_RATE_LIMIT: u32 = 10_000;

/// A write request received by the mock server.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedWrite {
    pub method: String,
    /// Path below `/api/v1/`.
    pub path: String,
    pub body: Option<Value>,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    /// Collections indexed by path below `/api/v1/` (e.g. "people",
    /// "sites/main/pages/events").
    pub collections: HashMap<String, Vec<Item>>,

    /// Single records indexed by path (e.g. "people/count").
    pub records: HashMap<String, Value>,

    /// Largest page the server hands out, whatever `limit` asks for.
    pub page_size: usize,

    /// Collections whose last page links back to the first one.
    pub cyclic: Vec<String>,

    /// Optional access token. If set, requests must carry it.
    pub required_token: Option<String>,

    /// Value of the `nation-ratelimit-remaining` header on the next response.
    pub rate_limit_remaining: u32,

    /// Writes received, in arrival order.
    pub writes: Vec<RecordedWrite>,

    /// Number of GET requests served.
    pub reads: usize,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            collections: HashMap::new(),
            records: HashMap::new(),
            page_size: 100,
            cyclic: Vec::new(),
            required_token: None,
            rate_limit_remaining: DEFAULT_RATE_LIMIT,
            writes: Vec::new(),
            reads: 0,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Serve `items` as a paginated collection at `path`.
    pub fn with_collection(mut self, path: &str, items: Vec<Item>) -> Self {
        self.collections
            .insert(path.trim_matches('/').to_string(), items);
        self
    }

    /// Serve a single JSON document at `path`.
    pub fn with_record(mut self, path: &str, record: Value) -> Self {
        self.records.insert(path.trim_matches('/').to_string(), record);
        self
    }

    /// Cap the number of items per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make the collection at `path` never report a last page.
    pub fn with_cycle(mut self, path: &str) -> Self {
        self.cyclic.push(path.trim_matches('/').to_string());
        self
    }

    /// Set the required access token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Get a collection by path.
    pub fn collection(&self, path: &str) -> Option<&Vec<Item>> {
        self.collections.get(path)
    }

    pub fn is_cyclic(&self, path: &str) -> bool {
        self.cyclic.iter().any(|p| p == path)
    }

    /// Check if a token is valid.
    pub fn is_token_valid(&self, token: Option<&str>) -> bool {
        match &self.required_token {
            None => true,
            Some(required) => token == Some(required.as_str()),
        }
    }

    /// Take one unit off the rate-limit budget and return what is left.
    pub fn spend_rate_limit(&mut self) -> u32 {
        self.rate_limit_remaining = self.rate_limit_remaining.saturating_sub(1);
        self.rate_limit_remaining
    }
}
