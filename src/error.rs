//! Error types and result aliases for umlfmt.
//!
//! The re-indentation itself cannot fail; errors only come from I/O,
//! UTF-8 decoding and configuration loading.
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used throughout the crate

use anyhow::Result as AnyhowResult;

pub type Result<T> = AnyhowResult<T>;
