//! Command line front end for songpat.
//!
//! The `songpat` binary loads song records from a JSON document and formats
//! or filters them with display patterns and library queries.
//!
//! # Configuration
//!
//! - `SONGPAT_LOG_LEVEL`: log verbosity (trace, debug, info, warn, error)
//! - `SONGPAT_CACHE_CAPACITY` and `SONGPAT_PATH_SEGMENT_LIMIT`: read by
//!   `songpat_patterns::config`
//!
//! Command line flags take precedence over the environment.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod songs;
