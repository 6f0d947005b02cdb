use super::{FacetFilter, Faceted, Predicate, Search, Searchable, SortOrder, Sortable};
use crate::model::Record;

/// Everything a list view's controls select: search box, facet chips and sort dropdown
pub struct Criteria<M: Faceted> {
    pub search: Search,
    pub facets: FacetFilter<M::Facet>,
    pub sort: SortOrder,
}

impl<M: Faceted> Default for Criteria<M> {
    fn default() -> Self { Self { search: Search::default(), facets: FacetFilter::default(), sort: SortOrder::default() } }
}

impl<M: Faceted> Clone for Criteria<M> {
    fn clone(&self) -> Self { Self { search: self.search.clone(), facets: self.facets.clone(), sort: self.sort } }
}

impl<M: Faceted> std::fmt::Debug for Criteria<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Criteria").field("search", &self.search).field("facets", &self.facets).field("sort", &self.sort).finish()
    }
}

impl<M: Faceted> Criteria<M> {
    pub fn new() -> Self { Self::default() }

    pub fn search(mut self, query: &str) -> Self {
        self.search = Search::new(query);
        self
    }

    pub fn facet(mut self, facet: M::Facet) -> Self {
        self.facets.toggle(facet);
        self
    }

    pub fn facets(mut self, facets: FacetFilter<M::Facet>) -> Self {
        self.facets = facets;
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

impl<M: Searchable + Faceted + Sortable> Criteria<M> {
    pub fn matches(&self, record: &Record<M>) -> bool { self.search.matches(record) && self.facets.matches(record) }

    pub fn apply(&self, records: &[Record<M>]) -> Vec<Record<M>>
    where M: Clone {
        super::project(records, &|r: &Record<M>| self.matches(r), &self.sort)
    }
}
