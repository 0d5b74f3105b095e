//! The service catalog store: create/update/delete over an ordered record
//! set, mirrored in full to the key-value backend after every mutation.

pub mod api;
pub mod filter;
pub mod store;
