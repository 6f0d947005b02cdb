use crate::model::Record;

/// Decides whether a record belongs in a view
pub trait Predicate<M> {
    fn matches(&self, record: &Record<M>) -> bool;

    fn and<P>(self, other: P) -> And<Self, P>
    where Self: Sized {
        And(self, other)
    }

    fn or<P>(self, other: P) -> Or<Self, P>
    where Self: Sized {
        Or(self, other)
    }

    fn not(self) -> Not<Self>
    where Self: Sized {
        Not(self)
    }
}

impl<M, F> Predicate<M> for F
where F: Fn(&Record<M>) -> bool
{
    fn matches(&self, record: &Record<M>) -> bool { self(record) }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl<M> Predicate<M> for MatchAll {
    fn matches(&self, _record: &Record<M>) -> bool { true }
}

#[derive(Debug, Clone)]
pub struct And<A, B>(pub A, pub B);

impl<M, A: Predicate<M>, B: Predicate<M>> Predicate<M> for And<A, B> {
    fn matches(&self, record: &Record<M>) -> bool { self.0.matches(record) && self.1.matches(record) }
}

#[derive(Debug, Clone)]
pub struct Or<A, B>(pub A, pub B);

impl<M, A: Predicate<M>, B: Predicate<M>> Predicate<M> for Or<A, B> {
    fn matches(&self, record: &Record<M>) -> bool { self.0.matches(record) || self.1.matches(record) }
}

#[derive(Debug, Clone)]
pub struct Not<P>(pub P);

impl<M, P: Predicate<M>> Predicate<M> for Not<P> {
    fn matches(&self, record: &Record<M>) -> bool { !self.0.matches(record) }
}

/// Fields covered by free-text search
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// Case-insensitive substring search. An empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Search {
    needle: String,
}

impl Search {
    pub fn new(query: &str) -> Self { Self { needle: query.trim().to_lowercase() } }

    pub fn is_empty(&self) -> bool { self.needle.is_empty() }

    pub fn query(&self) -> &str { &self.needle }
}

impl<M: Searchable> Predicate<M> for Search {
    fn matches(&self, record: &Record<M>) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        record.search_fields().iter().any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// A fixed enumerated category a record can fall into
pub trait Faceted {
    type Facet: Clone + PartialEq + std::fmt::Debug + Send + Sync;

    fn matches_facet(&self, facet: &Self::Facet) -> bool;
}

/// Selected facets. Nothing selected means "all".
#[derive(Debug, Clone, PartialEq)]
pub struct FacetFilter<F> {
    selected: Vec<F>,
}

impl<F> Default for FacetFilter<F> {
    fn default() -> Self { Self { selected: Vec::new() } }
}

impl<F: PartialEq> FacetFilter<F> {
    pub fn all() -> Self { Self::default() }

    pub fn only(facet: F) -> Self { Self { selected: vec![facet] } }

    pub fn any_of(facets: impl IntoIterator<Item = F>) -> Self {
        let mut filter = Self::default();
        for facet in facets {
            if !filter.selected.contains(&facet) {
                filter.selected.push(facet);
            }
        }
        filter
    }

    /// Select the facet, or deselect it if it was already selected
    pub fn toggle(&mut self, facet: F) {
        match self.selected.iter().position(|f| *f == facet) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(facet),
        }
    }

    pub fn clear(&mut self) { self.selected.clear() }

    pub fn is_all(&self) -> bool { self.selected.is_empty() }

    pub fn selected(&self) -> &[F] { &self.selected }
}

impl<M: Faceted> Predicate<M> for FacetFilter<M::Facet> {
    fn matches(&self, record: &Record<M>) -> bool { self.selected.is_empty() || self.selected.iter().any(|f| record.matches_facet(f)) }
}
