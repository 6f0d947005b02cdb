use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

use crate::error::DecodeError;

/// Store-assigned identifier of a row. ULIDs are never reused, so a deleted row's id stays retired.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RecordId(pub(crate) Ulid);

impl RecordId {
    pub fn new() -> Self { RecordId(Ulid::new()) }

    pub fn from_ulid(ulid: Ulid) -> Self { RecordId(ulid) }

    pub fn from_bytes(bytes: [u8; 16]) -> Self { RecordId(Ulid::from_bytes(bytes)) }

    pub fn to_bytes(&self) -> [u8; 16] { self.0.to_bytes() }

    pub fn from_base64<T: AsRef<[u8]>>(input: T) -> Result<Self, DecodeError> {
        let decoded = general_purpose::URL_SAFE_NO_PAD.decode(input)?;
        let bytes: [u8; 16] = decoded[..].try_into().map_err(|_| DecodeError::InvalidLength)?;

        Ok(RecordId(Ulid::from_bytes(bytes)))
    }

    pub fn to_base64(&self) -> String { general_purpose::URL_SAFE_NO_PAD.encode(self.0.to_bytes()) }

    pub fn to_base64_short(&self) -> String {
        // last 6 characters are the most random part of the ulid
        let value = self.to_base64();
        value[value.len() - 6..].to_string()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if f.alternate() {
            write!(f, "{}", self.to_base64_short())
        } else {
            write!(f, "{}", self.to_base64())
        }
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "RecordId({})", self.to_base64_short()) }
}

impl TryFrom<&str> for RecordId {
    type Error = DecodeError;
    fn try_from(id: &str) -> Result<Self, Self::Error> { Self::from_base64(id) }
}

impl TryFrom<String> for RecordId {
    type Error = DecodeError;
    fn try_from(id: String) -> Result<Self, Self::Error> { Self::try_from(id.as_str()) }
}

impl TryFrom<&[u8]> for RecordId {
    type Error = DecodeError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; 16] = bytes.try_into().map_err(|_| DecodeError::InvalidLength)?;
        Ok(RecordId::from_bytes(bytes))
    }
}

impl From<RecordId> for Ulid {
    fn from(id: RecordId) -> Self { id.0 }
}

impl Default for RecordId {
    fn default() -> Self { Self::new() }
}
