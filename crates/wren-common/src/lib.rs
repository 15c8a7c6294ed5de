//! Common utilities for the Wren HTML pipeline.
//!
//! This crate provides shared infrastructure used by all pipeline components:
//! - **Warning System** - deduplicated warnings for ignored or unsupported markup
//! - **Logging** - subscriber setup for binaries

pub mod logging;
pub mod warning;
