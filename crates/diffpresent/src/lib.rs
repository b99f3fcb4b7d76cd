//! Unified diff presentation for test-failure output.
//!
//! Turns a pair of values (an expected one and the actual one a test
//! produced) into a human-readable unified diff. Strings are diffed line by
//! line, structured values are first rendered into a canonical line-based
//! form, and inputs in different text encodings are reconciled before they
//! are compared.
//!
//! # Key Types
//!
//! - [`DiffPresenter`] -- Entry point: `diff_as_string`, `diff_encoded`, `diff_as_object`
//! - [`PresenterConfig`] -- Color, context width and fallback encoding
//! - [`Value`] / [`Inspect`] -- Values to canonicalize, and self-describing objects
//! - [`EncodedText`] / [`Encoding`] -- Byte strings tagged with their encoding
//! - [`Hunk`] / [`EditOp`] -- Diff structure between computing and rendering
//! - [`ExpectationHandler`] / [`Matcher`] -- Failure messages with attached diffs
//!
//! # Quick Start
//!
//! ```rust
//! use diffpresent::{DiffPresenter, Value};
//!
//! let presenter = DiffPresenter::default();
//! let diff = presenter.diff_as_object(
//!     &Value::map([("name", "bob"), ("species", "giraffe")]),
//!     &Value::map([("name", "bob"), ("species", "tortoise")]),
//! );
//! assert!(diff.contains("-\"species\" => \"tortoise\","));
//! assert!(diff.contains("+\"species\" => \"giraffe\","));
//! ```

pub mod canonical;
pub mod config;
pub mod encoding;
pub mod error;
pub mod expectation;
pub mod hunk;
pub mod line_diff;
pub mod presenter;
pub mod render;
pub mod value;

#[cfg(test)]
mod properties;

pub use canonical::{canonicalize, inspect};
pub use config::PresenterConfig;
pub use encoding::{reconcile, EncodedText, Encoding, Reconciled, UnknownEncoding};
pub use error::{ConfigError, DiffError, EncodingError, EncodingResult, ExpectationNotMet};
pub use expectation::{eq, fail_with, EqualMatcher, ExpectationHandler, FailureMessage, Matcher};
pub use hunk::{build_hunks, Hunk};
pub use line_diff::{diff_lines, EditOp};
pub use presenter::DiffPresenter;
pub use render::render;
pub use value::{Inspect, Value};
