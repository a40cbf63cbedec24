//! `@startuml` / `@enduml` marker normalization
//!
//! Puts each diagram marker on a line of its own and squeezes runs of blank
//! lines down to one. Unlike the indenter this pass may change the number
//! of lines, so it only runs when explicitly enabled.

use std::sync::LazyLock;

use regex::Regex;

static STARTUML_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*@startuml\s*").expect("valid @startuml pattern"));
static ENDUML_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*@enduml\s*").expect("valid @enduml pattern"));
static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank run pattern"));

/// Normalize diagram markers and blank-line runs
///
/// Newlines introduced in front of a leading `@startuml` are dropped so the
/// output does not begin with an empty line.
#[must_use]
pub fn normalize_markers(text: &str) -> String {
    let text = STARTUML_RE.replace_all(text, "\n@startuml\n");
    let text = ENDUML_RE.replace_all(&text, "\n@enduml\n");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    text.trim_start_matches('\n').to_string()
}
