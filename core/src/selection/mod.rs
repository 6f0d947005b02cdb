//! Pure projections over a snapshot: filter with a [`Predicate`], order with a [`Comparator`].

mod criteria;
mod filter;
mod sort;

pub use criteria::*;
pub use filter::*;
pub use sort::*;

use crate::model::Record;

/// Filter then stable-sort. The input is never modified.
pub fn project<M, P, C>(records: &[Record<M>], predicate: &P, comparator: &C) -> Vec<Record<M>>
where
    M: Clone,
    P: Predicate<M> + ?Sized,
    C: Comparator<M> + ?Sized,
{
    let mut selected: Vec<Record<M>> = records.iter().filter(|r| predicate.matches(r)).cloned().collect();
    selected.sort_by(|a, b| comparator.compare(a, b));
    selected
}
