//! Trimmed `Debug` output for large per-frame arrays.
//!
//! Decoded models carry vertex blocks with tens of thousands of entries.
//! These helpers are meant for `#[debug(with = ...)]` attributes so that
//! `{:#?}` on a model prints a preview instead of every element.

use std::fmt;

/// Number of leading elements printed before the remainder is summarised.
pub const PREVIEW_LEN: usize = 3;

/// Collections whose leading elements can be previewed.
pub trait Preview {
    type Item: fmt::Debug;

    fn total(&self) -> usize;
    fn head(&self, n: usize) -> &[Self::Item];
}

impl<T: fmt::Debug> Preview for [T] {
    type Item = T;

    fn total(&self) -> usize {
        self.len()
    }

    fn head(&self, n: usize) -> &[T] {
        &self[..n.min(self.len())]
    }
}

impl<T: fmt::Debug> Preview for Vec<T> {
    type Item = T;

    fn total(&self) -> usize {
        self.len()
    }

    fn head(&self, n: usize) -> &[T] {
        self.as_slice().head(n)
    }
}

/// Print the first [`PREVIEW_LEN`] elements followed by a count of the rest.
#[cfg(not(feature = "debug-print-all"))]
pub fn trimmed_collection_fmt<C: Preview + ?Sized>(
    items: &C,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let head = items.head(PREVIEW_LEN);
    let rest = items.total() - head.len();

    if rest == 0 {
        write!(f, "{:#?}", head)
    } else {
        write!(f, "{:#?} + {} elements", head, rest)
    }
}

#[cfg(feature = "debug-print-all")]
pub fn trimmed_collection_fmt<C: Preview + ?Sized>(
    items: &C,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    write!(f, "{:#?}", items.head(items.total()))
}
