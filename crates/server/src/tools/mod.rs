//! MCP tool implementations.
//!
//! This module contains all tools exposed by the sitesnap server.

pub mod sites_data;

pub use sites_data::{SitesDataParams, sites_data_impl};
