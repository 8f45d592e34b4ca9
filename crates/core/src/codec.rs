//! Encoding helpers for db and wire forms
//!
//! - Db form: MessagePack with named fields, so records stay readable by
//!   loaders built against a newer struct layout.
//! - Wire form: JSON, the format network consumers expect.
//!
//! Entity types are free to produce their forms some other way; these are
//! the defaults the bundled collaborators are tested against.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;
use crate::types::{DbForm, WireForm};

/// Encode a value into its backing-store form
pub fn to_db_form<S: Serialize + ?Sized>(value: &S) -> Result<DbForm, CodecError> {
    Ok(rmp_serde::to_vec_named(value)?)
}

/// Decode a value from its backing-store form
pub fn from_db_form<D: DeserializeOwned>(bytes: &[u8]) -> Result<D, CodecError> {
    Ok(rmp_serde::from_slice(bytes)?)
}

/// Encode a value into its network form
pub fn to_wire_form<S: Serialize + ?Sized>(value: &S) -> Result<WireForm, CodecError> {
    serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a value from its network form
pub fn from_wire_form<D: DeserializeOwned>(bytes: &[u8]) -> Result<D, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}
