//! Client code for sitesnap.
//!
//! This crate provides the HTTP fetcher the server plugs into the resolver.

pub mod fetch;

pub use fetch::{FetchClient, FetchConfig};
