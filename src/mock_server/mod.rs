//! Mock NationBuilder API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the
//! NationBuilder API for integration and end-to-end testing. Unlike wiremock
//! which mocks at the HTTP level per-test, this server keeps state across
//! requests: collections are paginated with real `next` references and
//! every write is recorded.
//!
//! # Example
//!
//! ```ignore
//! use nbee::mock_server::MockServer;
//! use nbee::{NationBuilderClient, PageWalker};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = NationBuilderClient::with_origin("demo", "test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures, two items per page
//!     let first = client.get("people").await.unwrap();
//!     let people = PageWalker::new(&client).walk(&first).await.unwrap();
//!     assert_eq!(people.len(), 5);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures, DEFAULT_SITE};
pub use handlers::PAGE_NONCE;
pub use server::MockServer;
pub use state::{MockState, RecordedWrite, DEFAULT_RATE_LIMIT};
