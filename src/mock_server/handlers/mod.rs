//! HTTP handlers for the mock server.

mod collections;
mod writes;

pub use collections::*;
pub use writes::*;
