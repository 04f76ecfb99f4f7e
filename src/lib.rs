//! Mailsnap: Mailbox Snapshot Extraction
//!
//! Extracts a snapshot of a remote mailbox's folder hierarchy and non-junk
//! messages, emitting each message as a JSON record annotated with its
//! fully-qualified folder path.

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod logging;
pub mod page;
pub mod project;
pub mod snapshot;
pub mod store;
pub mod tooling;
pub mod types;
