//! Serialization of hunks to unified-diff text.

use std::fmt::Write as _;

use owo_colors::{OwoColorize, Style};

use crate::hunk::Hunk;
use crate::line_diff::EditOp;

/// SGR reset. Uncolored lines are wrapped in it when color is on so that
/// every line carries its own reset.
const NORMAL: &str = "\x1b[0m";

/// What a rendered line represents, independent of how it is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// The `@@ ... @@` range header.
    Header,
    /// A deleted line.
    Deleted,
    /// An inserted line.
    Inserted,
    /// Context lines and the leading blank line.
    Plain,
}

impl LineClass {
    fn of(op: &EditOp<'_>) -> Self {
        match op {
            EditOp::Keep(_) => LineClass::Plain,
            EditOp::Delete(_) => LineClass::Deleted,
            EditOp::Insert(_) => LineClass::Inserted,
        }
    }

    fn style(self) -> Option<Style> {
        match self {
            LineClass::Header => Some(Style::new().blue()),
            LineClass::Deleted => Some(Style::new().red()),
            LineClass::Inserted => Some(Style::new().green()),
            LineClass::Plain => None,
        }
    }
}

/// Render hunks as unified-diff text.
///
/// The output starts with a blank line. With `colorize`, each line including
/// its newline is wrapped in its own color code and reset.
pub fn render(hunks: &[Hunk<'_>], colorize: bool) -> String {
    if hunks.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    push_line(&mut out, "", LineClass::Plain, colorize);
    for hunk in hunks {
        push_line(&mut out, &hunk.header(), LineClass::Header, colorize);
        for op in &hunk.ops {
            let line = format!("{}{}", op.prefix(), op.line());
            push_line(&mut out, &line, LineClass::of(op), colorize);
        }
    }
    out
}

fn push_line(out: &mut String, text: &str, class: LineClass, colorize: bool) {
    let line = format!("{text}\n");
    if !colorize {
        out.push_str(&line);
        return;
    }
    let _ = match class.style() {
        Some(style) => write!(out, "{}", line.style(style)),
        None => write!(out, "{NORMAL}{line}{NORMAL}"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hunk::build_hunks;
    use crate::line_diff::diff_lines;

    #[test]
    fn no_hunks_renders_nothing() {
        assert_eq!(render(&[], false), "");
        assert_eq!(render(&[], true), "");
    }

    #[test]
    fn plain_output() {
        let old = ["foo bang baz"];
        let new = ["foo bar baz"];
        let ops = diff_lines(&old, &new);
        let hunks = build_hunks(&ops, 3);
        assert_eq!(
            render(&hunks, false),
            "\n@@ -1,2 +1,2 @@\n-foo bang baz\n+foo bar baz\n"
        );
    }

    #[test]
    fn colored_output_resets_every_line() {
        let old = ["foo bang baz"];
        let new = ["foo bar baz"];
        let ops = diff_lines(&old, &new);
        let hunks = build_hunks(&ops, 3);
        assert_eq!(
            render(&hunks, true),
            "\x1b[0m\n\x1b[0m\x1b[34m@@ -1,2 +1,2 @@\n\x1b[0m\x1b[31m-foo bang baz\n\x1b[0m\x1b[32m+foo bar baz\n\x1b[0m"
        );
    }

    #[test]
    fn context_lines_use_normal_code() {
        let old = ["keep", "old"];
        let new = ["keep", "new"];
        let ops = diff_lines(&old, &new);
        let rendered = render(&build_hunks(&ops, 3), true);
        assert!(rendered.contains("\x1b[0m keep\n\x1b[0m"));
    }

    #[test]
    fn stripping_colors_gives_plain_output() {
        let old = ["a", "b", "c", "d"];
        let new = ["a", "x", "c", "d", "e"];
        let ops = diff_lines(&old, &new);
        let hunks = build_hunks(&ops, 3);
        assert_eq!(
            strip_ansi_escapes::strip_str(render(&hunks, true)),
            render(&hunks, false)
        );
    }

    #[test]
    fn stripping_keeps_escape_like_line_content() {
        let old = ["plain [brackets]"];
        let new = ["[0m text"];
        let ops = diff_lines(&old, &new);
        let hunks = build_hunks(&ops, 3);
        assert_eq!(
            strip_ansi_escapes::strip_str(render(&hunks, true)),
            "\n@@ -1,2 +1,2 @@\n-plain [brackets]\n+[0m text\n"
        );
    }
}
