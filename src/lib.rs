//! news-report - console reports over a news site's web-server access log.
//!
//! This library exposes the core modules for the binary and for integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod menu;
pub mod report;
pub mod safety;
