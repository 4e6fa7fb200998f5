//! Directory client and data models for Microsoft Graph.
//!
//! Provides typed structures and an asynchronous client for reading users,
//! searching people, fetching profile photos as data URIs and listing
//! calendar events. Every call registers its OAuth scope with a
//! [`graph_core::TokenProvider`] and issues a single request.

#![deny(missing_docs)]

pub mod client;
pub mod models;
pub mod photo;

pub use client::{
    Directory, DirectoryClient, DirectoryClientBuilder, SCOPE_PEOPLE_READ, SCOPE_USER_READ,
    SCOPE_USER_READ_BASIC_ALL,
};
pub use models::{
    Attendee, DateTimeTimeZone, EmailAddress, Event, Location, Person, Recipient,
    ScoredEmailAddress, User, ValueList,
};
pub use photo::{PhotoEncoding, DEFAULT_MEDIA_TYPE};

/// Convenient result alias that reuses the shared Graph error type.
pub type Result<T> = graph_core::Result<T>;
