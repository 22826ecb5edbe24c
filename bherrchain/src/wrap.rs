// Copyright (C) 2020-2026  The Blockhouse Technology Limited (TBTL).
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public
// License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::panic::Location;

use crate::{traits::loggable::Warnable, trace, BoxError, ErrorChain};

/// Wraps `cause` with a context `message` and the trace of the call site.
///
/// Returns [`None`] if there is no `cause`, as wrapping nothing yields nothing.  The message is
/// used verbatim; use the [`wrap_message!`][crate::wrap_message!] macro to format it.
///
/// The wrapped error is logged as a warning.
///
/// The trace is empty when the binary carries no line tables, see the crate documentation.
///
/// # Examples
///
/// ```
/// let err = bherrchain::wrap_message(Some("connection refused"), "fetching status list").unwrap();
/// assert!(err.to_string().starts_with("fetching status list: connection refused"));
///
/// assert!(bherrchain::wrap_message(None::<&str>, "fetching status list").is_none());
/// ```
#[track_caller]
#[inline(never)]
pub fn wrap_message<E, M>(cause: Option<E>, message: M) -> Option<ErrorChain>
where
    E: Into<BoxError>,
    M: Into<String>,
{
    let location = Location::caller();
    let cause = cause?.into();
    Some(wrap_cause(cause, message.into(), location))
}

/// Builds the link and attaches the trace before it is handed out.
#[inline(never)]
pub(crate) fn wrap_cause(
    cause: BoxError,
    message: String,
    location: &'static Location<'static>,
) -> ErrorChain {
    let trace = trace::capture();
    ErrorChain::from_parts(Some(cause), message, trace).log_warn(*location)
}

/// Merges `errors` into a single chain, skipping absent ones.
///
/// Returns [`None`] if there is no error to merge.  Otherwise the errors are folded from left to
/// right: the first one becomes the cause of a link with no message, and every following one
/// becomes the cause of a new link whose message is the rendered accumulator.  The result renders
/// as `e1: e2: ...: en`.
///
/// Only the last error stays reachable as a structured cause; the earlier ones survive only as
/// text.  No trace is captured.
///
/// # Examples
///
/// ```
/// use bherrchain::{BoxError, ErrorChain};
///
/// let errors: [Option<BoxError>; 3] = [
///     Some(ErrorChain::new("err1").into()),
///     None,
///     Some("err2".into()),
/// ];
/// assert_eq!(bherrchain::wrap(errors).unwrap().to_string(), "err1: err2");
/// ```
pub fn wrap<I, E>(errors: I) -> Option<ErrorChain>
where
    I: IntoIterator<Item = Option<E>>,
    E: Into<BoxError>,
{
    errors
        .into_iter()
        .flatten()
        .fold(None, |accumulator: Option<ErrorChain>, error| {
            let message = accumulator
                .map(|accumulator| accumulator.to_string())
                .unwrap_or_default();
            Some(ErrorChain::from_parts(
                Some(error.into()),
                message,
                String::new(),
            ))
        })
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[derive(Debug)]
    struct PlainError(&'static str);

    impl std::fmt::Display for PlainError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for PlainError {}

    fn plain(message: &'static str) -> Option<BoxError> {
        Some(Box::new(PlainError(message)))
    }

    #[test]
    fn test_wrap_message_without_cause() {
        assert!(wrap_message(None::<PlainError>, "err context").is_none());
        assert!(crate::wrap_message!(None::<PlainError>, "bad ip {}", "127.0.0.1").is_none());
    }

    #[test]
    fn test_wrap_message() {
        let err = wrap_message(plain("err1"), "err context").unwrap();

        assert_eq!(err.message(), "err context");
        assert_eq!(err.cause().unwrap().to_string(), "err1");
        assert_eq!(err.to_string(), format!("err context: err1{}", err.trace()));
    }

    #[test]
    fn test_wrap_message_macro() {
        let err = crate::wrap_message!(plain("err1"), "bad ip {}", "127.0.0.1").unwrap();
        assert!(err.to_string().starts_with("bad ip 127.0.0.1: err1"));

        let ip = "10.0.0.1";
        let err = crate::wrap_message!(plain("err1"), "bad ip {ip}",).unwrap();
        assert!(err.to_string().starts_with("bad ip {ip}: err1"));

        let err = crate::wrap_message!(plain("err1"), "100% done").unwrap();
        assert!(err.to_string().starts_with("100% done: err1"));

        let err = crate::wrap_message!(plain("err1"), "bad ip {} port {}", ip, 80).unwrap();
        assert!(err.to_string().starts_with("bad ip 10.0.0.1 port 80: err1"));
    }

    #[test]
    fn test_wrap_message_empty_message() {
        let err = wrap_message(plain("err1"), "").unwrap();

        assert_eq!(err.to_string(), format!("err1{}", err.trace()));
    }

    #[cfg(feature = "trace")]
    #[test]
    fn test_wrap_message_trace() {
        let regex = regex::Regex::new(r"^(\n\t\[trace\] [^\n]+:\d+\n){1,2}$").unwrap();

        let err = wrap_message(plain("err1"), "err context").unwrap();
        let trace = err.trace();

        assert!(regex.is_match(trace), "unexpected trace: {trace:?}");
        assert!(
            trace.starts_with("\n\t[trace] bherrchain::wrap::tests::test_wrap_message_trace:"),
            "unexpected trace: {trace:?}"
        );
        assert!(err.to_string().starts_with("err context: err1\n\t[trace] "));
    }

    #[cfg(not(feature = "trace"))]
    #[test]
    fn test_wrap_message_without_trace() {
        let err = wrap_message(plain("err1"), "err context").unwrap();

        assert!(err.trace().is_empty());
        assert_eq!(err.to_string(), "err context: err1");
    }

    #[test]
    fn test_wrap_nothing() {
        assert!(wrap(Vec::<Option<BoxError>>::new()).is_none());
        assert!(wrap([None::<BoxError>, None, None]).is_none());
    }

    #[test]
    fn test_wrap() {
        let err = wrap([Some(ErrorChain::new("hello")), Some(ErrorChain::new("world"))]).unwrap();
        assert_eq!(err.to_string(), "hello: world");

        let errors: [Option<BoxError>; 4] = [
            Some(ErrorChain::new("err1").into()),
            plain("err2"),
            None,
            plain("err3"),
        ];
        let err = wrap(errors).unwrap();
        assert_eq!(err.to_string(), "err1: err2: err3");
        assert!(err.trace().is_empty());
    }

    #[test]
    fn test_wrap_single() {
        let err = wrap([None, plain("err1"), None]).unwrap();

        assert_eq!(err.message(), "");
        assert_eq!(err.to_string(), "err1");
    }

    #[test]
    fn test_wrap_keeps_only_last_cause() {
        let err = wrap([plain("err1"), plain("err2"), plain("err3")]).unwrap();

        assert_eq!(err.message(), "err1: err2");
        assert_eq!(err.cause().unwrap().to_string(), "err3");
        assert!(err.source().unwrap().source().is_none());
    }

    #[test]
    fn test_wrap_wrapped_messages() {
        let first = wrap_message(Some(ErrorChain::new("err1")), "err1 message");
        let second = wrap_message(plain("err2"), "err2 message");
        let third = wrap_message(plain("err3"), "err3 message");
        let expected = format!(
            "{}: {}: {}",
            first.as_ref().unwrap(),
            second.as_ref().unwrap(),
            third.as_ref().unwrap()
        );

        let err = wrap([first, second, third]).unwrap();

        assert_eq!(err.to_string(), expected);
        assert!(err.to_string().starts_with("err1 message: err1"));
        assert!(err.to_string().contains(": err2 message: err2"));
    }
}
