/// `UmlIndenter` - Keyword-driven indentation counter
///
/// Tracks a single running level instead of a scope stack: closers pull the
/// current line out, openers push the following lines in. There is no block
/// matching, so unbalanced input only produces uneven indentation.
use crate::format::keywords::classify;

/// `UmlIndenter` re-indents PlantUML lines one at a time
#[derive(Debug, Clone)]
pub struct UmlIndenter {
    /// Spaces per level
    indent: usize,
    /// Current nesting level, never negative
    level: usize,
    /// Output: indent (in spaces) applied to the last processed line
    line_indent: usize,
}

impl UmlIndenter {
    /// Create a new `UmlIndenter`
    ///
    /// # Arguments
    /// * `indent` - Number of spaces per nesting level
    #[must_use]
    pub fn new(indent: usize) -> Self {
        Self {
            indent,
            level: 0,
            line_indent: 0,
        }
    }

    /// Process one physical line and return it re-indented
    ///
    /// Blank lines come back empty and leave the level untouched.
    pub fn process_line(&mut self, line: &str) -> String {
        let text = line.trim();

        if text.is_empty() {
            self.line_indent = 0;
            return String::new();
        }

        let class = classify(text);

        if class.closes {
            self.level = self.level.saturating_sub(1);
        }

        self.line_indent = self.level * self.indent;
        let mut out = " ".repeat(self.line_indent);
        out.push_str(text);

        // else/elseif: closed above, opened again here
        if class.opens {
            self.level += 1;
        }
        if class.reopens {
            self.level += 1;
        }

        out
    }

    /// Get the indent (in spaces) applied to the last processed line
    #[must_use]
    pub fn get_line_indent(&self) -> usize {
        self.line_indent
    }

    /// Get the level that the next line will start from
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }
}

/// Re-indent a whole source text
///
/// Lines are split on `\n` only, so the output always has the same number
/// of lines as the input (including a trailing empty line after a final
/// newline).
#[must_use]
pub fn reindent(source: &str, indent: usize) -> String {
    let mut indenter = UmlIndenter::new(indent);
    source
        .split('\n')
        .map(|line| indenter.process_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(text: &str) -> String {
        text.split('\n')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_simple_if() {
        let mut indenter = UmlIndenter::new(2);

        assert_eq!(indenter.process_line("if (x) then"), "if (x) then");
        assert_eq!(indenter.get_line_indent(), 0);
        assert_eq!(indenter.level(), 1);

        assert_eq!(indenter.process_line(":a;"), "  :a;");
        assert_eq!(indenter.get_line_indent(), 2);

        assert_eq!(indenter.process_line("endif"), "endif");
        assert_eq!(indenter.get_line_indent(), 0);
        assert_eq!(indenter.level(), 0);
    }

    #[test]
    fn test_else_outdent() {
        let input = "if (x)\na\nelse\nb\nendif";
        let expected = "if (x)\n  a\nelse\n  b\nendif";
        assert_eq!(reindent(input, 2), expected);
    }

    #[test]
    fn test_elseif_keeps_level() {
        let mut indenter = UmlIndenter::new(2);
        indenter.process_line("if (a) then");
        indenter.process_line(":x;");
        assert_eq!(indenter.process_line("elseif (b) then"), "elseif (b) then");
        assert_eq!(indenter.level(), 1);
        assert_eq!(indenter.process_line(":y;"), "  :y;");
    }

    #[test]
    fn test_nested_if() {
        let input = "if (a)\nif (b)\n:x;\nendif\nendif";
        let expected = "if (a)\n  if (b)\n    :x;\n  endif\nendif";
        assert_eq!(reindent(input, 2), expected);
    }

    #[test]
    fn test_repeat_while() {
        let input = "repeat\n:step;\nrepeat while (more?)\n:after;";
        let expected = "repeat\n  :step;\nrepeat while (more?)\n:after;";
        assert_eq!(reindent(input, 2), expected);
    }

    #[test]
    fn test_while_loop() {
        let input = "while (data?)\n:read;\nend while";
        let expected = "while (data?)\n  :read;\nend while";
        assert_eq!(reindent(input, 2), expected);
    }

    #[test]
    fn test_fork_again() {
        let input = "fork\n:a;\nfork again\n:b;\nend fork";
        let expected = "fork\n  :a;\nfork again\n  :b;\nend fork";
        assert_eq!(reindent(input, 2), expected);
    }

    #[test]
    fn test_bracket_openers() {
        let input = "package P {\n[A]\nnode N [\nx\n]\n}";
        let expected = "package P {\n  [A]\n  node N [\n    x\n  ]\n}";
        assert_eq!(reindent(input, 2), expected);
    }

    #[test]
    fn test_partition_scenario() {
        assert_eq!(
            reindent("partition Foo {\nstep1\n}", 2),
            "partition Foo {\n  step1\n}"
        );
    }

    #[test]
    fn test_partition_with_brace_opens_once() {
        // Opener table and trailing brace are a single check
        let mut indenter = UmlIndenter::new(2);
        indenter.process_line("partition Foo {");
        assert_eq!(indenter.level(), 1);
    }

    #[test]
    fn test_floor_invariant() {
        let output = reindent("endif\nend\n}\n]\nend while", 2);
        for line in output.lines() {
            assert_eq!(line, line.trim_start());
        }
    }

    #[test]
    fn test_excess_closer_then_opener() {
        let input = "endif\nif (a)\n:x;";
        let expected = "endif\nif (a)\n  :x;";
        assert_eq!(reindent(input, 2), expected);
    }

    #[test]
    fn test_unbalanced_openers_accumulate() {
        let mut indenter = UmlIndenter::new(2);
        indenter.process_line("if (a)");
        indenter.process_line("while (b)");
        indenter.process_line("loop");
        assert_eq!(indenter.level(), 3);
        assert_eq!(indenter.process_line(":x;"), "      :x;");
    }

    #[test]
    fn test_blank_lines() {
        let mut indenter = UmlIndenter::new(2);
        indenter.process_line("if (a)");
        assert_eq!(indenter.process_line("    "), "");
        assert_eq!(indenter.process_line(""), "");
        assert_eq!(indenter.level(), 1);
        assert_eq!(indenter.get_line_indent(), 0);
    }

    #[test]
    fn test_line_count_preserved() {
        for input in ["", "\n", "a\n", "\n\nif (x)\n\n", "a\r\nb\r\n"] {
            let output = reindent(input, 2);
            assert_eq!(
                output.split('\n').count(),
                input.split('\n').count(),
                "line count changed for {input:?}"
            );
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(reindent("", 2), "");
    }

    #[test]
    fn test_crlf_is_trimmed() {
        assert_eq!(reindent("if (a)\r\n:x;\r\nendif", 2), "if (a)\n  :x;\nendif");
    }

    #[test]
    fn test_existing_indentation_replaced() {
        let input = "        if (a)\n:x;\n      endif";
        assert_eq!(reindent(input, 2), "if (a)\n  :x;\nendif");
    }

    #[test]
    fn test_custom_indent_unit() {
        assert_eq!(reindent("if (a)\n:x;\nendif", 4), "if (a)\n    :x;\nendif");
    }

    #[test]
    fn test_idempotent_on_balanced_input() {
        let input = "start\nif (a) then (yes)\nwhile (b)\n:x;\nend while\nelse (no)\nrepeat\n:y;\nrepeat while (c)\nendif\nstop";
        let first = reindent(input, 2);
        let second = reindent(&strip(&first), 2);
        assert_eq!(first, second);
        let third = reindent(&first, 2);
        assert_eq!(first, third);
    }
}
