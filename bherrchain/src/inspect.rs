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

//! Functions for looking into error chains.
//!
//! The chain is walked through [`std::error::Error::source`], which any error type may implement
//! to expose the error beneath it.  Types that don't implement it end the chain.

use std::error::Error;

use crate::ErrorChain;

/// Returns the error one level beneath `err`, if any.
pub fn unwrap<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a (dyn Error + 'static)> {
    err.source()
}

/// Walks down the chain of `err` until an error without a further cause is reached.
///
/// The terminal error is not returned: the walk always ends in [`None`].  Use [`chain`] to reach
/// the deepest error.
///
/// ```
/// let err = bherrchain::wrap_message(Some("root"), "context").unwrap();
///
/// assert!(bherrchain::cause(&err).is_none());
/// assert_eq!(bherrchain::chain(&err).last().unwrap().to_string(), "root");
/// ```
pub fn cause<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a (dyn Error + 'static)> {
    let mut current = unwrap(err);
    while let Some(err) = current {
        current = unwrap(err);
    }
    current
}

/// Returns `true` if `target` is `err` itself or any error beneath it.
///
/// Links are compared by identity, see [`ErrorChain::ptr_eq`].  Returns `false` if either
/// argument is absent.
///
/// Only an [`ErrorChain`] can be the target.  Wrapping moves a cause into a box, so a foreign
/// error keeps no identity the caller could still hold.  Cloning an [`ErrorChain`] shares its
/// link, so a clone kept before wrapping is found in the chain afterwards.
///
/// ```
/// use bherrchain::ErrorChain;
///
/// let err = ErrorChain::new("not found");
/// let wrapped = bherrchain::wrap_message(Some(err.clone()), "loading config").unwrap();
///
/// assert!(bherrchain::is(Some(&wrapped), Some(&err)));
/// assert!(!bherrchain::is(Some(&wrapped), Some(&ErrorChain::new("not found"))));
/// ```
pub fn is(err: Option<&(dyn Error + 'static)>, target: Option<&ErrorChain>) -> bool {
    let (Some(err), Some(target)) = (err, target) else {
        return false;
    };

    chain(err).any(|link| {
        link.downcast_ref::<ErrorChain>()
            .is_some_and(|link| link.ptr_eq(target))
    })
}

/// Returns an iterator over `err` and every error beneath it, outermost first.
pub fn chain<'a>(err: &'a (dyn Error + 'static)) -> Chain<'a> {
    Chain { next: Some(err) }
}

/// Iterator over an error chain, created by [`chain`].
#[derive(Clone, Debug)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}
