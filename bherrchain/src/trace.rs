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

//! Capturing of the call site trace attached to wrapped errors.

/// The maximum number of frames rendered into a trace.
#[cfg_attr(not(feature = "trace"), allow(dead_code))]
pub(crate) const MAX_FRAMES: usize = 2;

/// Functions of this crate which sit between the stack walker and the caller.
///
/// Their frames, and the frames of their closures, are never rendered.
#[cfg(feature = "trace")]
const INTERNAL_FUNCTIONS: &[&str] = &[
    concat!(env!("CARGO_CRATE_NAME"), "::trace::capture"),
    concat!(env!("CARGO_CRATE_NAME"), "::wrap::wrap_message"),
    concat!(env!("CARGO_CRATE_NAME"), "::wrap::wrap_cause"),
];

/// Trait implementations of this crate which call into [`INTERNAL_FUNCTIONS`].
#[cfg(feature = "trace")]
const INTERNAL_IMPLS: &[&str] = &[concat!(
    env!("CARGO_CRATE_NAME"),
    "::traits::wrap_context::WrapContext"
)];

/// Renders one frame of the trace.
#[cfg_attr(not(feature = "trace"), allow(dead_code))]
pub(crate) fn render_frame(function: &str, line: u32) -> String {
    format!("\n\t[trace] {function}:{line}\n")
}

/// Captures the trace of the caller of this crate's wrapping functions.
///
/// The frames of the stack walker and of this crate are skipped, after which at most
/// [`MAX_FRAMES`] frames are rendered, innermost first.  Frames without a resolvable function
/// name or line number are left out.  If nothing remains, the trace is empty.  That is the normal
/// outcome in builds without line tables, so it is only logged at the trace level.
#[cfg(feature = "trace")]
#[inline(never)]
pub(crate) fn capture() -> String {
    let mut frames: Vec<(String, u32)> = Vec::with_capacity(MAX_FRAMES);
    let mut reached_crate = false;

    backtrace::trace(|frame| {
        // One frame can resolve to several symbols when functions were inlined into it.
        backtrace::resolve_frame(frame, |symbol| {
            if frames.len() == MAX_FRAMES {
                return;
            }
            let Some(name) = symbol.name() else {
                return;
            };
            // The alternate form omits the trailing hash of the mangled name.
            let name = format!("{name:#}");

            if is_internal(&name) {
                reached_crate |= !name.starts_with("backtrace::");
                return;
            }
            if !reached_crate {
                return;
            }
            if let Some(line) = symbol.lineno() {
                frames.push((name, line));
            }
        });

        frames.len() < MAX_FRAMES
    });

    if frames.is_empty() {
        log::trace!("no stack frames available for the error trace");
    }

    frames
        .iter()
        .map(|(function, line)| render_frame(function, *line))
        .collect()
}

/// Captures the trace of the caller of this crate's wrapping functions.
///
/// Stack capture is disabled, so the trace is always empty.
#[cfg(not(feature = "trace"))]
pub(crate) fn capture() -> String {
    String::new()
}

#[cfg(feature = "trace")]
fn is_internal(name: &str) -> bool {
    name.starts_with("backtrace::")
        || INTERNAL_FUNCTIONS.iter().any(|function| {
            name.strip_prefix(function)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
        })
        || INTERNAL_IMPLS
            .iter()
            .any(|trait_path| name.contains(&format!(" as {trait_path}")))
}
