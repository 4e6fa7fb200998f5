//! # graph-core
//!
//! Core types and utilities for talking to Microsoft Graph.
//!
//! This crate provides the error taxonomy, the token capability, configuration
//! and the authenticated HTTP transport shared by Graph client crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and HTTP status code mapping
//! - [`auth`] - The [`auth::TokenProvider`] capability and a static implementation
//! - [`config`] - Validated configuration for Graph clients
//! - [`client`] - HTTP client settings and the authenticated service transport
//! - [`query`] - Query string construction

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod query;

// Re-export commonly used types
pub use auth::{StaticTokenProvider, TokenProvider};
pub use error::{Error, ErrorCategory, Result};
