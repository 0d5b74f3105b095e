//! Storage abstractions for the service layer.
//!
//! The catalog persists as whole serialized collections under fixed keys;
//! backends only need `get`/`set` of text values.

pub mod file_kv;
pub mod kv;
