//! Command-line tooling for the snapshot pipeline.

pub mod cli;
