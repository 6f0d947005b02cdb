use std::cmp::Ordering;

use crate::model::Record;

/// A total order over records
pub trait Comparator<M> {
    fn compare(&self, a: &Record<M>, b: &Record<M>) -> Ordering;

    /// Break ties with `next`
    fn then<C>(self, next: C) -> Then<Self, C>
    where Self: Sized {
        Then(self, next)
    }
}

impl<M, F> Comparator<M> for F
where F: Fn(&Record<M>, &Record<M>) -> Ordering
{
    fn compare(&self, a: &Record<M>, b: &Record<M>) -> Ordering { self(a, b) }
}

#[derive(Debug, Clone)]
pub struct Then<A, B>(pub A, pub B);

impl<M, A: Comparator<M>, B: Comparator<M>> Comparator<M> for Then<A, B> {
    fn compare(&self, a: &Record<M>, b: &Record<M>) -> Ordering { self.0.compare(a, b).then_with(|| self.1.compare(a, b)) }
}

/// Newest first. Equal timestamps compare equal, so a stable sort keeps store order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recency;

impl<M> Comparator<M> for Recency {
    fn compare(&self, a: &Record<M>, b: &Record<M>) -> Ordering { b.created_at.cmp(&a.created_at) }
}

/// Fields read by the non-recency sort orders. Absent fields fall back to recency.
pub trait Sortable {
    fn likes(&self) -> Option<i64> { None }

    fn judges_pick(&self) -> bool { false }

    fn title(&self) -> Option<&str> { None }
}

/// The sort orders offered by list views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum SortOrder {
    #[default]
    #[strum(serialize = "recent")]
    Recent,
    #[strum(serialize = "liked")]
    MostLiked,
    #[strum(serialize = "judges")]
    JudgesPick,
    #[strum(serialize = "alpha")]
    Alphabetical,
}

impl<M: Sortable> Comparator<M> for SortOrder {
    fn compare(&self, a: &Record<M>, b: &Record<M>) -> Ordering {
        let primary = match self {
            SortOrder::Recent => Ordering::Equal,
            SortOrder::MostLiked => b.likes().cmp(&a.likes()),
            SortOrder::JudgesPick => b.judges_pick().cmp(&a.judges_pick()),
            SortOrder::Alphabetical => compare_titles(a.title(), b.title()),
        };
        primary.then_with(|| Recency.compare(a, b))
    }
}

// untitled records sort last
fn compare_titles(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
