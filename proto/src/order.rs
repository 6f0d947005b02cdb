use serde::{Deserialize, Serialize};

pub const CREATED_AT: &str = "created_at";
pub const ID: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// Ordering requested from `select_all`. Ties on `field` are broken by id in the same direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: OrderDirection,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self { Self { field: field.into(), direction: OrderDirection::Asc } }

    pub fn desc(field: impl Into<String>) -> Self { Self { field: field.into(), direction: OrderDirection::Desc } }

    /// `created_at` descending: the one ordering every list view uses
    pub fn newest_first() -> Self { Self::desc(CREATED_AT) }
}

impl Default for OrderBy {
    fn default() -> Self { Self::newest_first() }
}

impl std::fmt::Display for OrderBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dir = match self.direction {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        };
        write!(f, "{} {}", self.field, dir)
    }
}
