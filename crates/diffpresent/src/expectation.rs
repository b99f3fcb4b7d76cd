//! Expectation handling.
//!
//! A [`Matcher`] decides whether a value meets an expectation. The
//! [`ExpectationHandler`] runs it, and on failure builds the failure message,
//! attaching a diff of expected against actual when the matcher opts in.

use std::fmt;

use tracing::debug;

use crate::error::ExpectationNotMet;
use crate::presenter::DiffPresenter;
use crate::value::Value;

/// Decides whether an actual value meets an expectation.
pub trait Matcher {
    /// Whether `actual` matches.
    fn matches(&mut self, actual: &Value) -> bool;

    /// Whether `actual` does not match, for matchers whose negation is not
    /// simply `!matches`. `None` means "negate [`Matcher::matches`]".
    fn does_not_match(&mut self, _actual: &Value) -> Option<bool> {
        None
    }

    /// Message for a failed positive expectation.
    fn failure_message(&self) -> String;

    /// Message for a failed negative expectation.
    fn failure_message_when_negated(&self) -> String;

    /// Whether a failure should show a diff of expected against actual.
    fn diffable(&self) -> bool {
        false
    }

    /// The expected value shown in a diff, if the matcher has one.
    fn expected(&self) -> Option<Value> {
        None
    }

    /// The actual value last seen by [`Matcher::matches`], if recorded.
    fn actual(&self) -> Option<Value> {
        None
    }
}

/// A caller-supplied failure message overriding the matcher's own.
pub enum FailureMessage<'a> {
    Text(String),
    /// Built only when the expectation actually fails.
    Lazy(Box<dyn Fn() -> String + 'a>),
}

impl<'a> FailureMessage<'a> {
    pub fn lazy(build: impl Fn() -> String + 'a) -> Self {
        FailureMessage::Lazy(Box::new(build))
    }

    fn resolve(&self) -> String {
        match self {
            FailureMessage::Text(text) => text.clone(),
            FailureMessage::Lazy(build) => build(),
        }
    }
}

impl fmt::Debug for FailureMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureMessage::Text(text) => f.debug_tuple("Text").field(text).finish(),
            FailureMessage::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<&str> for FailureMessage<'_> {
    fn from(text: &str) -> Self {
        FailureMessage::Text(text.to_string())
    }
}

impl From<String> for FailureMessage<'_> {
    fn from(text: String) -> Self {
        FailureMessage::Text(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Polarity {
    Positive,
    Negative,
}

/// Runs matchers and turns failures into [`ExpectationNotMet`].
#[derive(Clone, Copy, Debug)]
pub struct ExpectationHandler<'p> {
    presenter: &'p DiffPresenter,
    polarity: Polarity,
}

impl<'p> ExpectationHandler<'p> {
    /// A handler for `expect(actual).to(matcher)`.
    pub fn positive(presenter: &'p DiffPresenter) -> Self {
        Self {
            presenter,
            polarity: Polarity::Positive,
        }
    }

    /// A handler for `expect(actual).not_to(matcher)`.
    pub fn negative(presenter: &'p DiffPresenter) -> Self {
        Self {
            presenter,
            polarity: Polarity::Negative,
        }
    }

    /// Run `matcher` against `actual`.
    ///
    /// On success returns what the matcher reported: `true` for a positive
    /// expectation, `false` for a negative one. On failure the `custom`
    /// message, if any, replaces the matcher's own.
    pub fn handle_matcher(
        &self,
        actual: &Value,
        matcher: &mut dyn Matcher,
        custom: Option<FailureMessage<'_>>,
    ) -> Result<bool, ExpectationNotMet> {
        let matched = match self.polarity {
            Polarity::Positive => matcher.matches(actual),
            Polarity::Negative => match matcher.does_not_match(actual) {
                Some(does_not_match) => !does_not_match,
                None => matcher.matches(actual),
            },
        };
        let met = match self.polarity {
            Polarity::Positive => matched,
            Polarity::Negative => !matched,
        };
        if met {
            return Ok(matched);
        }

        let message = match custom {
            Some(custom) => custom.resolve(),
            None => match self.polarity {
                Polarity::Positive => matcher.failure_message(),
                Polarity::Negative => matcher.failure_message_when_negated(),
            },
        };
        debug!(polarity = ?self.polarity, diffable = matcher.diffable(), "expectation not met");

        if matcher.diffable() {
            let expected = matcher.expected();
            let actual = matcher.actual();
            Err(fail_with(self.presenter, message, expected.as_ref(), actual.as_ref()))
        } else {
            Err(ExpectationNotMet { message })
        }
    }
}

/// Build the failure for `message`, appending a diff when one is useful.
///
/// A diff is attached only when both values are present and it would say
/// something: two strings are diffed line by line if at least one of them
/// spans several lines, numbers are never diffed, and any other pair is
/// diffed through its canonical representation.
pub fn fail_with(
    presenter: &DiffPresenter,
    message: impl Into<String>,
    expected: Option<&Value>,
    actual: Option<&Value>,
) -> ExpectationNotMet {
    let mut message = message.into();
    if let (Some(expected), Some(actual)) = (expected, actual) {
        let diff = match (expected.as_str(), actual.as_str()) {
            (Some(e), Some(a)) if is_multiline(e) || is_multiline(a) => {
                presenter.diff_as_string(a, e)
            }
            (Some(_), Some(_)) => String::new(),
            _ if expected.is_number() || actual.is_number() => String::new(),
            _ => presenter.diff_as_object(actual, expected),
        };
        if !diff.is_empty() {
            message.push_str("\nDiff:");
            message.push_str(&diff);
        }
    }
    ExpectationNotMet { message }
}

fn is_multiline(text: &str) -> bool {
    text.contains('\n')
}

/// Matcher comparing canonical representations. See [`eq`].
#[derive(Clone, Debug)]
pub struct EqualMatcher {
    expected: Value,
    actual: Option<Value>,
}

/// Expect a value equal to `expected`.
pub fn eq(expected: impl Into<Value>) -> EqualMatcher {
    EqualMatcher {
        expected: expected.into(),
        actual: None,
    }
}

impl EqualMatcher {
    fn actual_text(&self) -> String {
        self.actual
            .as_ref()
            .map_or_else(|| "nil".to_string(), Value::to_string)
    }
}

impl Matcher for EqualMatcher {
    fn matches(&mut self, actual: &Value) -> bool {
        self.actual = Some(actual.clone());
        *actual == self.expected
    }

    fn failure_message(&self) -> String {
        format!("expected: {}\n     got: {}", self.expected, self.actual_text())
    }

    fn failure_message_when_negated(&self) -> String {
        format!(
            "expected: value != {}\n     got: {}",
            self.expected,
            self.actual_text()
        )
    }

    fn diffable(&self) -> bool {
        true
    }

    fn expected(&self) -> Option<Value> {
        Some(self.expected.clone())
    }

    fn actual(&self) -> Option<Value> {
        self.actual.clone()
    }
}
