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

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! This crate provides a small error composition utility built around a single error type,
//! [`ErrorChain`].
//!
//! An [`ErrorChain`] is one link of contextual information layered on top of an underlying cause.
//! The cause may be any [`std::error::Error`], including another [`ErrorChain`].  A link renders
//! as `message: cause`, followed by the trace captured when the link was created, if any.
//!
//! # Details
//!
//! Constructing a bare error with no cause is done via [`ErrorChain::new`].  This also logs a
//! warning, the same way every wrapping constructor does.
//!
//! Wrapping a cause with a message is done via [`wrap_message`][fn@wrap_message], or the
//! [`wrap_message!`] macro when the message needs formatting.  Both capture a short trace of the
//! call site, at most two stack frames, which is appended to the rendered error.  Wrapping an
//! absent cause yields an absent result.
//!
//! Several errors can be merged into one via [`wrap`][fn@wrap], which renders them left to right
//! separated by `": "`.
//!
//! Chains are inspected with [`unwrap`], [`cause`], [`is`] and [`chain`].
//!
//! As a convenience, the [`WrapContext`][traits::WrapContext] trait extends [`Result`] with a
//! lazily evaluated wrapping method, and [`Loggable`][traits::Loggable] with a method for logging
//! errors at the error level.
//!
//! # Features
//!
//! * `trace` (enabled by default) enables capturing the call site trace.  Without it, traces are
//!   always empty.
//!
//! Traces need the line tables of the binary.  Builds without debug info, such as the default
//! `release` profile, produce empty traces; set `debug = "line-tables-only"` in the profile to
//! keep them.  An empty trace is expected there, and only a `trace` level log record notes it.
//!
//! # Examples
//!
//! ```
//! use bherrchain::{traits::WrapContext, ErrorChain};
//!
//! fn parse_port(s: &str) -> bherrchain::Result<u16> {
//!     let port: u16 = s.parse().wrap_ctx(|| format!("parsing port {s}"))?;
//!     if port == 0 {
//!         return Err(ErrorChain::new("port must not be zero"));
//!     }
//!     Ok(port)
//! }
//!
//! fn connect(addr: &str) -> bherrchain::Result<()> {
//!     let port = addr.rsplit(':').next().unwrap_or_default();
//!     let cause = parse_port(port).err();
//!     match bherrchain::wrap_message!(cause, "bad address {}", addr) {
//!         Some(err) => Err(err),
//!         None => Ok(()),
//!     }
//! }
//!
//! assert!(connect("127.0.0.1:8080").is_ok());
//!
//! let err = connect("127.0.0.1:0").unwrap_err();
//! assert!(err
//!     .to_string()
//!     .starts_with("bad address 127.0.0.1:0: port must not be zero"));
//!
//! let merged = bherrchain::wrap([
//!     Some(ErrorChain::new("first")),
//!     None,
//!     Some(ErrorChain::new("second")),
//! ]);
//! assert_eq!(merged.unwrap().to_string(), "first: second");
//! ```

use std::{panic::Location, sync::Arc};

use crate::traits::loggable::Warnable;

mod display;
mod inspect;
mod trace;
pub mod traits;
mod wrap;

pub use inspect::{cause, chain, is, unwrap, Chain};
pub use wrap::{wrap, wrap_message};

/// Type-erased error, used as the cause of an [`ErrorChain`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The [`std::result::Result`] wrapper that uses [`ErrorChain`] as its error type.
pub type Result<T> = std::result::Result<T, ErrorChain>;

/// Wraps a cause with a message, formatting the message when arguments are given.
///
/// With only a message the message is used verbatim, otherwise it is interpolated by
/// [`format!`].  Expands to a call of [`wrap_message`][fn@wrap_message], so an absent cause yields
/// [`None`] and a present one yields an [`ErrorChain`] carrying the call site trace.
///
/// ```
/// let cause: Option<std::io::Error> = Some(std::io::ErrorKind::AddrInUse.into());
/// let err = bherrchain::wrap_message!(cause, "bad ip {}", "127.0.0.1").unwrap();
/// assert!(err.to_string().starts_with("bad ip 127.0.0.1: address in use"));
/// ```
#[macro_export]
macro_rules! wrap_message {
    ($cause:expr, $message:expr $(,)?) => {
        $crate::wrap_message($cause, $message)
    };
    ($cause:expr, $fmt:literal, $($arg:tt)+) => {
        $crate::wrap_message($cause, ::std::format!($fmt, $($arg)+))
    };
}

/// One link of an error chain.
///
/// A link holds an optional cause, an optional context message and an optional trace of the
/// place where the link was created.  It is immutable once constructed.
///
/// Cloning is cheap and yields the *same* link, which is what [`is`][fn@is] compares against.
/// Two links built separately are never the same, even if they render identically.
#[derive(Clone)]
pub struct ErrorChain {
    node: Arc<Node>,
}

struct Node {
    /// The error beneath this link.
    cause: Option<BoxError>,
    /// The context added at this link, empty if none.
    message: String,
    /// The rendered call site trace, empty if none.
    trace: String,
}

impl ErrorChain {
    /// Create an error with no cause and no trace and log a warning.
    #[track_caller]
    pub fn new<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Self::from_parts(None, message.into(), String::new()).log_warn(*Location::caller())
    }

    /// Assembles a link.  The trace, if any, must be captured before this call.
    fn from_parts(cause: Option<BoxError>, message: String, trace: String) -> Self {
        Self {
            node: Arc::new(Node {
                cause,
                message,
                trace,
            }),
        }
    }

    /// Returns the error one level beneath this link, if any.
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.node.cause.as_deref()
    }

    /// Returns the error one level beneath this link, if any.
    ///
    /// Same as [`ErrorChain::cause`].
    pub fn unwrap_one_level(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause()
    }

    /// Returns the context message added at this link.  Empty if none was added.
    pub fn message(&self) -> &str {
        &self.node.message
    }

    /// Returns the rendered trace captured when this link was created.  Empty if none.
    pub fn trace(&self) -> &str {
        &self.node.trace
    }

    /// Returns `true` if both values are the same link.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl std::error::Error for ErrorChain {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        // Cast from (Error + Send + Sync) to (Error + 'static).
        self.node.cause.as_ref().map(|cause| cause.as_ref() as _)
    }
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

    #[test]
    fn test_new() {
        let error = ErrorChain::new("hello");

        assert_eq!(error.message(), "hello");
        assert!(error.cause().is_none());
        assert!(error.trace().is_empty());
        assert_eq!(error.to_string(), "hello");
    }

    #[test]
    fn test_cause_and_unwrap_one_level() {
        let error = ErrorChain::from_parts(
            Some(Box::new(PlainError("err1"))),
            "context".to_owned(),
            String::new(),
        );

        assert_eq!(error.cause().unwrap().to_string(), "err1");
        assert_eq!(error.unwrap_one_level().unwrap().to_string(), "err1");

        let error = ErrorChain::from_parts(None, "context".to_owned(), String::new());

        assert!(error.cause().is_none());
        assert!(error.unwrap_one_level().is_none());
    }

    #[test]
    fn test_source() {
        let error = ErrorChain::new("root");
        assert!(error.source().is_none());

        let error = ErrorChain::from_parts(Some(Box::new(error)), String::new(), String::new());
        let source = error.source().unwrap();
        assert!(source.downcast_ref::<ErrorChain>().is_some());
        assert_eq!(source.to_string(), "root");
    }

    #[test]
    fn test_ptr_eq() {
        let error = ErrorChain::new("same");
        let clone = error.clone();

        assert!(error.ptr_eq(&clone));
        assert!(!error.ptr_eq(&ErrorChain::new("same")));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}

        assert_send_sync::<ErrorChain>();
    }
}
