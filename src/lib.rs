//! Web page analyzer.
//!
//! Fetches a submitted URL and reports its HTML version, title, heading
//! counts, link counts and whether it contains a login form. The analyze
//! form is guarded by a submission gate that shows a loader for a fixed
//! delay before the form is actually submitted.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gate;
pub mod logging;
pub mod render;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
