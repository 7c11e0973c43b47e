//! NationBuilder API client library.
//!
//! A thin Rust wrapper over the NationBuilder REST API: it builds URLs,
//! attaches the access token, issues requests and follows the API's
//! `next`-link pagination, optionally laying the gathered records out as a
//! table.
//!
//! # Quick Start
//!
//! ```no_run
//! use nbee::{Nation, ResultFormat, Results};
//!
//! #[tokio::main]
//! async fn main() -> nbee::Result<()> {
//!     // Reads NATIONBUILDER_SLUG, NATIONBUILDER_API_KEY, NATIONBUILDER_SITE
//!     let mut nation = Nation::from_env()?;
//!     nation.index_sites().await?;
//!
//!     // First page only
//!     let first = nation.people().index(&[]).await?;
//!     println!("{} -> {}", first.rate_status(), first.status());
//!
//!     // Every page, as a table
//!     if let Results::Table(table) = nation.all_results(&first, ResultFormat::Table).await? {
//!         println!("{table}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`NationBuilderClient`] issues one request and returns the raw
//!   [`ApiResponse`], whatever its status code.
//! - [`PageWalker`] follows `next` references and concatenates each page's
//!   `results` into a [`ResultSet`].
//! - [`Resource`] is one endpoint path plus its accepted [`Verbs`]; writes go
//!   through [`SafeMode`] and come back as [`Guarded`] values.
//! - [`Nation`] hands out resources and keeps the site directory.
//!
//! # Configuration
//!
//! Credentials come from a `key: value` file (see [`Credentials`]) or from
//! environment variables:
//!
//! - `NATIONBUILDER_SLUG` (required) - the nation's subdomain
//! - `NATIONBUILDER_API_KEY` (required) - API access token
//! - `NATIONBUILDER_SITE` (optional) - default site for page endpoints

pub mod cli;
mod client;
mod config;
mod error;
mod nation;
mod pagination;
mod resource;
mod resources;
mod response;
mod safe_mode;
mod table;

#[cfg(feature = "test-server")]
pub mod mock_server;

pub use client::{NationBuilderClient, DEFAULT_PAGE_LIMIT};
pub use config::Credentials;
pub use error::{NbError, Result};
pub use nation::Nation;
pub use pagination::{Item, Page, PageWalker, ResultFormat, ResultSet, Results};
pub use resource::{Endpoint, Resource, Verbs};
pub use resources::{EventQuery, Events, Lists, People, Tags};
pub use response::{ApiResponse, RateStatus, RATE_LIMIT_REMAINING};
pub use safe_mode::{Guarded, SafeMode};
pub use table::Table;
