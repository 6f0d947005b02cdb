use chrono::{DateTime, Utc};
use gather_proto::{RawRecord, RecordId, TableId};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{DecodeError, ValidationError};

/// The schema of one table
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: &'static str;

    fn table() -> TableId { TableId::from(Self::TABLE) }

    /// Checked before every insert and after every read
    fn validate(&self) -> Result<(), ValidationError> { Ok(()) }
}

/// A typed row
#[derive(Debug, Clone, PartialEq)]
pub struct Record<M> {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub fields: M,
}

impl<M> std::ops::Deref for Record<M> {
    type Target = M;
    fn deref(&self) -> &Self::Target { &self.fields }
}

impl<M: Model> TryFrom<RawRecord> for Record<M> {
    type Error = DecodeError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let fields: M = serde_json::from_value(raw.fields)?;
        fields.validate()?;
        Ok(Record { id: raw.id, created_at: raw.created_at, fields })
    }
}

/// Fails with `Required(field)` when `value` is empty or only whitespace
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

pub fn require_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require(field, value)?;
    if !value.contains('@') {
        return Err(ValidationError::Invalid { field, reason: format!("{value:?} is not an email address") });
    }
    Ok(())
}
