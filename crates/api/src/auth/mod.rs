//! Token handling for the optional session stage.
//!
//! Password hashing lives in `aset_core::password`, shared with the user
//! resource that stores the hashes.

pub mod jwt;
