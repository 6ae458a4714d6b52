//! XDR alert API adapter
//!
//! This module provides the API trait, the reqwest-backed implementation,
//! request URL construction and the close request model.

pub mod api;
pub mod client;
pub mod models;
pub mod query;

pub use api::AlertApi;
pub use client::HttpAlertApi;
pub use models::CloseRequest;
