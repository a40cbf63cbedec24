//! Inline directive parsing for `' umlfmt:` comments
//!
//! Supports in-file configuration overrides via PlantUML line comments:
//! `' umlfmt: --indent 4 --normalize-markers`

use std::sync::LazyLock;

use regex::Regex;

use crate::config::Config;

/// Pattern to match umlfmt directives
static UMLFMT_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*'\s*umlfmt:\s*(.*?)\s*$").unwrap());

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveOverrides {
    pub indent: Option<usize>,
    pub impose_indent: Option<bool>,
    pub normalize_markers: Option<bool>,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indent.is_none() && self.impose_indent.is_none() && self.normalize_markers.is_none()
    }

    /// Apply the overrides on top of a configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(indent) = self.indent {
            tracing::debug!(indent, "directive override");
            config.indent = indent;
        }
        if let Some(impose_indent) = self.impose_indent {
            tracing::debug!(impose_indent, "directive override");
            config.impose_indent = impose_indent;
        }
        if let Some(normalize_markers) = self.normalize_markers {
            tracing::debug!(normalize_markers, "directive override");
            config.normalize_markers = normalize_markers;
        }
    }
}

/// Check if a line contains an umlfmt directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    UMLFMT_DIRECTIVE_RE.is_match(line)
}

/// Parse an umlfmt directive line and return option overrides
///
/// # Returns
/// * `Some(DirectiveOverrides)` if the line is a directive with known options
/// * `None` otherwise
#[must_use]
pub fn parse_directive(line: &str) -> Option<DirectiveOverrides> {
    let caps = UMLFMT_DIRECTIVE_RE.captures(line)?;
    let args_str = caps.get(1)?.as_str();

    parse_directive_args(args_str)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let tokens: Vec<&str> = args_str.split_whitespace().collect();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "-i" | "--indent" => {
                i += 1;
                if i < tokens.len() {
                    overrides.indent = tokens[i].parse().ok();
                }
            }
            "--no-indent" | "--disable-indent" => {
                overrides.impose_indent = Some(false);
            }
            "--enable-indent" => {
                overrides.impose_indent = Some(true);
            }
            "--normalize-markers" => {
                overrides.normalize_markers = Some(true);
            }
            "--no-normalize-markers" => {
                overrides.normalize_markers = Some(false);
            }
            _ => {
                // Unknown option, skip
            }
        }
        i += 1;
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan input for umlfmt directives and return the first found
///
/// Only the first directive line is used (subsequent ones are ignored).
#[must_use]
pub fn find_directive(source: &str) -> Option<DirectiveOverrides> {
    source
        .lines()
        .find(|line| is_directive_line(line))
        .and_then(parse_directive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_directive_line() {
        assert!(is_directive_line("' umlfmt: --indent 4"));
        assert!(is_directive_line("   '  umlfmt: --no-indent"));
        assert!(is_directive_line("' UMLFMT: --indent 2"));
        assert!(!is_directive_line("' this is a regular comment"));
        assert!(!is_directive_line("Alice -> Bob"));
    }

    #[test]
    fn test_parse_directive_indent() {
        let overrides = parse_directive("' umlfmt: --indent 4").unwrap();
        assert_eq!(overrides.indent, Some(4));
        let overrides = parse_directive("' umlfmt: -i 3").unwrap();
        assert_eq!(overrides.indent, Some(3));
    }

    #[test]
    fn test_parse_directive_multiple() {
        let overrides = parse_directive("' umlfmt: --indent 2 --normalize-markers --no-indent").unwrap();
        assert_eq!(overrides.indent, Some(2));
        assert_eq!(overrides.normalize_markers, Some(true));
        assert_eq!(overrides.impose_indent, Some(false));
    }

    #[test]
    fn test_parse_invalid_directive() {
        assert!(parse_directive("' umlfmt:").is_none());
        assert!(parse_directive("' umlfmt: --bogus").is_none());
    }

    #[test]
    fn test_find_directive_first_wins() {
        let source = "@startuml\n' umlfmt: --indent 4\n' umlfmt: --indent 8\n@enduml";
        let overrides = find_directive(source).unwrap();
        assert_eq!(overrides.indent, Some(4));
    }

    #[test]
    fn test_find_directive_none() {
        assert!(find_directive("@startuml\n' note\n@enduml").is_none());
    }

    #[test]
    fn test_apply_to_config() {
        let mut config = Config::default();
        let overrides = DirectiveOverrides {
            indent: Some(4),
            normalize_markers: Some(true),
            ..Default::default()
        };
        overrides.apply_to(&mut config);
        assert_eq!(config.indent, 4);
        assert!(config.normalize_markers);
        assert!(config.impose_indent);
    }
}
