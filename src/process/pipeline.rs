//! Two-pass formatting pipeline
//!
//! Implements the main formatting pipeline:
//! - Pass 1 (optional): Marker normalization
//! - Pass 2 (optional): Indentation

use std::io::{BufRead, Write};

use anyhow::Context;

use crate::config::Config;
use crate::diagram::DiagramKind;
use crate::format::{normalize_markers, UmlIndenter};
use crate::Result;

const UTF8_BOM: char = '\u{feff}';

/// Re-indent every line of `text` with a fresh indenter
fn indent_pass(text: &str, indent: usize) -> String {
    let mut indenter = UmlIndenter::new(indent);
    let mut out = String::with_capacity(text.len() + text.len() / 4);

    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&indenter.process_line(line));
    }

    if indenter.level() > 0 {
        tracing::debug!(level = indenter.level(), "unclosed blocks at end of input");
    }
    out
}

/// Format PlantUML source text according to `config`
#[must_use]
pub fn format_source(source: &str, config: &Config) -> String {
    let intermediate = if config.normalize_markers {
        normalize_markers(source)
    } else {
        source.to_string()
    };

    if config.impose_indent {
        indent_pass(&intermediate, config.indent)
    } else {
        intermediate
    }
}

/// Format a PlantUML file read from `input` and write it to `output`
///
/// The whole input is buffered; it must be valid UTF-8. A leading byte
/// order mark is dropped so the first line is classified like any other.
pub fn format_file<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    config: &Config,
    filename: &str,
) -> Result<()> {
    let mut input_buffer = Vec::new();
    input.read_to_end(&mut input_buffer)?;

    let source = String::from_utf8(input_buffer)
        .with_context(|| format!("{filename} is not valid UTF-8"))?;
    let source = source.strip_prefix(UTF8_BOM).unwrap_or(&source);

    let kind = DiagramKind::detect(source);
    tracing::debug!(file = filename, %kind, "detected diagram kind");

    let formatted = format_source(source, config);
    output.write_all(formatted.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn run(input: &str, config: &Config) -> String {
        let mut output = Vec::new();
        format_file(Cursor::new(input.as_bytes()), &mut output, config, "test.puml").unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_default_pipeline_only_indents() {
        let input = "@startuml\nif (a)\n:x;\nendif\n@enduml\n";
        let expected = "@startuml\nif (a)\n  :x;\nendif\n@enduml\n";
        assert_eq!(run(input, &Config::default()), expected);
    }

    #[test]
    fn test_normalize_then_indent() {
        let config = Config {
            normalize_markers: true,
            ..Default::default()
        };
        let input = "@startuml if (a)\n:x;\nendif @enduml";
        let expected = "@startuml\nif (a)\n  :x;\nendif\n@enduml\n";
        assert_eq!(run(input, &config), expected);
    }

    #[test]
    fn test_no_indent_passes_through() {
        let config = Config {
            impose_indent: false,
            ..Default::default()
        };
        let input = "  if (a)\n:x;\n    endif";
        assert_eq!(run(input, &config), input);
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let mut output = Vec::new();
        let bytes: &[u8] = &[b'a', 0xff, b'\n'];
        let err = format_file(Cursor::new(bytes), &mut output, &Config::default(), "bad.puml")
            .unwrap_err();
        assert!(err.to_string().contains("bad.puml"));
    }

    #[test]
    fn test_leading_bom_is_dropped() {
        let input = "\u{feff}if (a)\n:x;\nendif";
        assert_eq!(run(input, &Config::default()), "if (a)\n  :x;\nendif");
    }

    #[test]
    fn test_format_source_matches_reindent() {
        let input = "while (a)\n:x;\nend while";
        assert_eq!(
            format_source(input, &Config::default()),
            crate::format::reindent(input, 2)
        );
    }
}
