//! PlantUML source formatting.
//!
//! This module contains the formatting passes:
//! - [`keywords`]: Block keyword rules and line classification
//! - [`indenter`]: Re-indents lines from a running nesting level
//! - [`markers`]: Puts `@startuml`/`@enduml` on their own lines

pub mod indenter;
pub mod keywords;
pub mod markers;

pub use indenter::{reindent, UmlIndenter};
pub use keywords::{classify, Effect, LineClass};
pub use markers::normalize_markers;
