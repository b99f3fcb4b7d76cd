//! Grouping of edit scripts into unified-diff hunks.
//!
//! Each run of consecutive changes becomes a block. Blocks are widened by
//! the requested number of context lines and merged when the widened ranges
//! touch. Header ranges follow the historical arithmetic exactly: trailing
//! context is clamped to the old input's length rather than its last index,
//! so a hunk that reaches the end of input reports one more line than it
//! shows (`@@ -1,2 +1,2 @@` for a single changed line).

use std::fmt;

use crate::line_diff::EditOp;

/// A contiguous region of changes with surrounding context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hunk<'a> {
    /// First old line number shown in the header.
    pub old_start: usize,
    /// Old line count shown in the header.
    pub old_count: usize,
    /// First new line number shown in the header.
    pub new_start: usize,
    /// New line count shown in the header.
    pub new_count: usize,
    /// Context and changed lines, in display order.
    pub ops: Vec<EditOp<'a>>,
}

impl Hunk<'_> {
    /// The `@@ -old +new @@` header line.
    pub fn header(&self) -> String {
        self.to_string()
    }

    /// Number of inserted lines.
    pub fn additions(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, EditOp::Insert(_)))
            .count()
    }

    /// Number of deleted lines.
    pub fn deletions(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, EditOp::Delete(_)))
            .count()
    }
}

impl fmt::Display for Hunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@@ -{} +{} @@",
            RangeDisplay(self.old_start, self.old_count),
            RangeDisplay(self.new_start, self.new_count)
        )
    }
}

struct RangeDisplay(usize, usize);

impl fmt::Display for RangeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 == 1 {
            write!(f, "{}", self.0)
        } else {
            write!(f, "{},{}", self.0, self.1)
        }
    }
}

/// Zero-based inclusive line ranges of a hunk in progress, plus the slice
/// of ops it displays.
#[derive(Clone, Copy, Debug)]
struct Span {
    start_old: isize,
    end_old: isize,
    start_new: isize,
    end_new: isize,
    first_op: usize,
    last_op: usize,
}

impl Span {
    fn touches(&self, previous: &Span) -> bool {
        self.start_old - previous.end_old <= 1 || self.start_new - previous.end_new <= 1
    }
}

/// Group `ops` into hunks carrying up to `context` unchanged lines on each
/// side of every change.
///
/// Returns no hunks when `ops` contains no changes.
pub fn build_hunks<'a>(ops: &[EditOp<'a>], context: usize) -> Vec<Hunk<'a>> {
    let old_len = ops
        .iter()
        .filter(|op| !matches!(op, EditOp::Insert(_)))
        .count() as isize;

    let mut spans: Vec<Span> = Vec::new();
    for span in blocks(ops) {
        let span = widen(span, ops, context, old_len);
        match spans.last_mut() {
            Some(previous) if context > 0 && span.touches(previous) => {
                previous.end_old = span.end_old;
                previous.end_new = span.end_new;
                previous.last_op = span.last_op;
            }
            _ => spans.push(span),
        }
    }

    spans
        .into_iter()
        .map(|span| {
            let (old_start, old_count) = header_range(span.start_old, span.end_old);
            let (new_start, new_count) = header_range(span.start_new, span.end_new);
            Hunk {
                old_start,
                old_count,
                new_start,
                new_count,
                ops: ops[span.first_op..=span.last_op].to_vec(),
            }
        })
        .collect()
}

/// One span per maximal run of changes, without context.
fn blocks(ops: &[EditOp<'_>]) -> Vec<Span> {
    let mut spans = Vec::new();
    let (mut old_pos, mut new_pos) = (0isize, 0isize);
    let mut i = 0;
    while i < ops.len() {
        if !ops[i].is_change() {
            old_pos += 1;
            new_pos += 1;
            i += 1;
            continue;
        }
        let (first_op, start_old, start_new) = (i, old_pos, new_pos);
        while i < ops.len() && ops[i].is_change() {
            if let EditOp::Insert(_) = ops[i] {
                new_pos += 1;
            } else {
                old_pos += 1;
            }
            i += 1;
        }
        spans.push(Span {
            start_old,
            end_old: old_pos - 1,
            start_new,
            end_new: new_pos - 1,
            first_op,
            last_op: i - 1,
        });
    }
    spans
}

fn widen(mut span: Span, ops: &[EditOp<'_>], context: usize, old_len: isize) -> Span {
    if context == 0 {
        return span;
    }
    // Context beyond the number of ops shows the same lines.
    let context = isize::try_from(context.min(ops.len())).unwrap_or(isize::MAX);

    let add_start = context.min(span.start_old);
    span.start_old -= add_start;
    span.start_new -= add_start;

    let end_old = span.end_old.saturating_add(context).min(old_len);
    span.end_new += end_old - span.end_old;
    span.end_old = end_old;

    let mut leading = 0;
    while leading < add_start && span.first_op > 0 && !ops[span.first_op - 1].is_change() {
        span.first_op -= 1;
        leading += 1;
    }
    let mut trailing = 0;
    while trailing < context
        && span.last_op + 1 < ops.len()
        && !ops[span.last_op + 1].is_change()
    {
        span.last_op += 1;
        trailing += 1;
    }
    span
}

/// Header `(first, count)` for a zero-based inclusive range. An empty or
/// single-line range is anchored at its end.
fn header_range(start: isize, end: isize) -> (usize, usize) {
    let length = (end - start + 1).max(0);
    let first = if length < 2 { end + 1 } else { start + 1 };
    (first.max(0) as usize, length as usize)
}
