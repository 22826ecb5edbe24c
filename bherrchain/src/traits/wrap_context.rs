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

use crate::{wrap::wrap_cause, BoxError};

/// Extends [`Result`] with wrapping of its error.
pub trait WrapContext<T> {
    /// Maps a `Result<T, E>` to `Result<T, ErrorChain>`.
    ///
    /// The [Ok] variant is left untouched.  The [Err] value is wrapped with the message returned
    /// by `f`, along with the trace of the call site, the same way
    /// [`wrap_message`][crate::wrap_message()] does.
    ///
    /// The message is lazily evaluated.
    fn wrap_ctx<M, F>(self, f: F) -> crate::Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, E> WrapContext<T> for std::result::Result<T, E>
where
    E: Into<BoxError>,
{
    #[track_caller]
    #[inline(never)]
    fn wrap_ctx<M, F>(self, f: F) -> crate::Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        let location = Location::caller();

        match self {
            Ok(value) => Ok(value),
            Err(cause) => Err(wrap_cause(cause.into(), f().into(), location)),
        }
    }
}
