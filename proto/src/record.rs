use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{OrderBy, OrderDirection, RecordId, CREATED_AT, ID};

/// A row as it crosses the store boundary: store-assigned metadata plus untyped fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub fields: serde_json::Value,
}

impl RawRecord {
    pub fn new(fields: serde_json::Value) -> Self { Self { id: RecordId::new(), created_at: Utc::now(), fields } }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn field(&self, name: &str) -> Option<&serde_json::Value> { self.fields.get(name) }

    /// Compare two rows under `order`, falling back to id so the result is a total order
    pub fn compare(&self, other: &RawRecord, order: &OrderBy) -> Ordering {
        let primary = match order.field.as_str() {
            CREATED_AT => self.created_at.cmp(&other.created_at),
            ID => Ordering::Equal,
            name => compare_json(self.field(name), other.field(name)),
        };
        let cmp = primary.then_with(|| self.id.cmp(&other.id));
        match order.direction {
            OrderDirection::Asc => cmp,
            OrderDirection::Desc => cmp.reverse(),
        }
    }
}

/// Missing and null sort first; numbers before strings before everything else
fn compare_json(a: Option<&serde_json::Value>, b: Option<&serde_json::Value>) -> Ordering {
    use serde_json::Value;
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            x.as_f64().unwrap_or_default().partial_cmp(&y.as_f64().unwrap_or_default()).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
