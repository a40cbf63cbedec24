//! File processing and formatting pipeline.
//!
//! Formatting runs in up to two passes over the whole text:
//!
//! **Pass 1 - Markers (optional):**
//! - Put `@startuml`/`@enduml` on their own lines
//! - Collapse runs of blank lines
//!
//! **Pass 2 - Indentation:**
//! - Strip existing leading whitespace
//! - Re-indent from block keywords
//!
//! The main entry point is [`format_file`] which processes a buffered reader
//! and writes formatted output to any `Write` implementation.

pub mod pipeline;

pub use pipeline::{format_file, format_source};
