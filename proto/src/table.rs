use serde::{Deserialize, Serialize};

/// Name of a logical table in the record store
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableId(String);

impl TableId {
    pub fn new(name: impl Into<String>) -> Self { TableId(name.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for TableId {
    fn from(val: &str) -> Self { TableId(val.to_string()) }
}

impl From<String> for TableId {
    fn from(val: String) -> Self { TableId(val) }
}

impl PartialEq<str> for TableId {
    fn eq(&self, other: &str) -> bool { self.0 == other }
}

impl From<TableId> for String {
    fn from(table: TableId) -> Self { table.0 }
}

impl AsRef<str> for TableId {
    fn as_ref(&self) -> &str { &self.0 }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}
