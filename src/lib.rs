//! umlfmt - Re-indenter for PlantUML diagram sources
//!
//! A small formatter that re-indents block-structured PlantUML markup
//! (`if/else/endif`, `fork/end fork`, `while/end while`, `repeat/repeat while`,
//! `partition { }`, bracketed blocks) from a running keyword-driven level.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod diagram;
pub mod directive;
pub mod error;
pub mod format;
pub mod process;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use diagram::DiagramKind;
pub use directive::{find_directive, parse_directive, DirectiveOverrides};
pub use error::Result;
pub use format::{reindent, UmlIndenter};
