//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the nbee binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// NationBuilder API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "nbee", about = "NationBuilder API CLI", version)]
pub struct Cli {
    /// Credentials file with `slug:`, `api_key:` and optional `default_site:` lines.
    ///
    /// Falls back to NATIONBUILDER_* environment variables when omitted.
    #[arg(long, global = true, env = "NBEE_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the site directory and print it.
    Sites,

    /// Print the known endpoints.
    Endpoints,

    /// List a collection endpoint.
    List {
        /// Endpoint name, e.g. `people`, `tags`, `events`.
        endpoint: String,

        /// Follow `next` links and gather every page.
        #[arg(long)]
        all: bool,

        /// Site for site-scoped endpoints (overrides the default site).
        #[arg(long)]
        site: Option<String>,

        /// Page size sent with each request.
        #[arg(long)]
        limit: Option<u32>,

        /// Stop with an error after this many pages.
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// GET a raw path under the API base and print the body.
    Get {
        /// Path below `/api/v1/`, e.g. `people/count`.
        path: String,

        /// Extra query parameters as `key=value`.
        #[arg(long = "query", short = 'q', value_parser = parse_key_val)]
        query: Vec<(String, String)>,
    },
}

/// Parse a `key=value` pair.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid key=value pair: '{s}'"))
}
