//! The diff presenter facade.
//!
//! Ties the pipeline together: values are canonicalized into lines, encoded
//! strings are reconciled into a shared encoding, and the resulting lines are
//! diffed, grouped into hunks and rendered. Lines of `expected` form the `-`
//! side of the diff, lines of `actual` the `+` side.

use tracing::{debug, warn};

use crate::canonical::{canonicalize, split_lines};
use crate::config::PresenterConfig;
use crate::encoding::{encode_str, reconcile, EncodedText};
use crate::error::{DiffError, EncodingError};
use crate::hunk::build_hunks;
use crate::line_diff::diff_lines;
use crate::render::render;
use crate::value::Value;

/// Renders unified diffs between actual and expected values.
///
/// Holds no state besides its configuration, so one presenter can be shared
/// freely between threads.
#[derive(Clone, Debug, Default)]
pub struct DiffPresenter {
    config: PresenterConfig,
}

impl DiffPresenter {
    /// Create a presenter with the given configuration.
    pub fn new(config: PresenterConfig) -> Self {
        Self { config }
    }

    /// The current configuration.
    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    /// Diff two strings line by line.
    ///
    /// Returns an empty string when the inputs have the same lines.
    pub fn diff_as_string(&self, actual: &str, expected: &str) -> String {
        self.render_lines(&split_lines(expected), &split_lines(actual))
    }

    /// Diff two encoded strings.
    ///
    /// The inputs are first brought into a common encoding (see
    /// [`reconcile`]) and the diff is returned in that encoding. If that is
    /// impossible, the returned text is a message explaining why no diff
    /// could be produced, naming the encodings involved.
    pub fn diff_encoded(&self, actual: &EncodedText, expected: &EncodedText) -> EncodedText {
        match self.try_diff_encoded(actual, expected) {
            Ok(diff) => diff,
            Err(err) => {
                warn!(error = %err, "encoding failure replaced the diff");
                let message = err.to_string();
                EncodedText::encode(&message, self.config.default_external)
                    .unwrap_or_else(|_| EncodedText::utf8(message))
            }
        }
    }

    /// Canonicalize two values and diff their textual forms.
    pub fn diff_as_object(&self, actual: &Value, expected: &Value) -> String {
        let actual_lines = canonicalize(actual);
        let expected_lines = canonicalize(expected);
        debug!(
            actual = actual_lines.len(),
            expected = expected_lines.len(),
            "canonicalized values"
        );
        self.render_lines(&expected_lines, &actual_lines)
    }

    fn try_diff_encoded(
        &self,
        actual: &EncodedText,
        expected: &EncodedText,
    ) -> Result<EncodedText, DiffError> {
        let fail = |source: EncodingError| {
            if actual.encoding() != expected.encoding() {
                DiffError::EncodingMismatch {
                    actual: actual.encoding(),
                    expected: expected.encoding(),
                    source,
                }
            } else {
                DiffError::Unencodable {
                    encoding: expected.encoding(),
                    source,
                }
            }
        };

        let reconciled = reconcile(actual, expected, self.config.default_external).map_err(fail)?;
        let encoding = reconciled.encoding();
        let actual_text = reconciled.actual.decode().map_err(fail)?;
        let expected_text = reconciled.expected.decode().map_err(fail)?;

        let rendered = self.render_lines(&split_lines(&expected_text), &split_lines(&actual_text));
        encode_str(&rendered, encoding, encoding).map_err(fail)
    }

    fn render_lines(&self, old: &[String], new: &[String]) -> String {
        let ops = diff_lines(old, new);
        let hunks = build_hunks(&ops, self.config.context_lines);
        debug!(ops = ops.len(), hunks = hunks.len(), "diff computed");
        render(&hunks, self.config.color)
    }
}
