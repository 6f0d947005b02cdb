use gather_core::error::StoreError;

pub fn sled_error(err: sled::Error) -> StoreError { StoreError::Backend(Box::new(err)) }
