//! Client library for the Ephany Framework catalog service.
//!
//! This crate provides an authenticated client for the paginated asset
//! listing, the full-collection crawl, keyword search and streaming file
//! download, together with the pieces used by the `ephany` command line tool.
//!
//! # Modules
//!
//! - `actions`: CLI command execution
//! - `auth`: Authentication schemes and request headers
//! - `client`: The catalog API client
//! - `commands`: CLI command parsing
//! - `configuration`: Client settings and the persisted tool configuration
//! - `error`: Error types for the client and the CLI
//! - `exit_codes`: Process exit codes
//! - `format`: Data formatting utilities for various output formats
//! - `http_utils`: HTTP request handling shared by all operations
//! - `model`: Data models for catalog entities (assets, files, pages)

pub mod actions;
pub mod auth;
pub mod client;
pub mod commands;
pub mod configuration;
pub mod error;
pub mod exit_codes;
pub mod format;
pub mod http_utils;
pub mod model;

pub use client::EphanyClient;
pub use configuration::ClientConfig;
pub use error::ApiError;
