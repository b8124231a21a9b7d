//! Domain logic shared by the asset administration crates.
//!
//! Nothing in here performs I/O: the datastore lives in `aset-db`, the HTTP
//! surface in `aset-api` and the admin console in `aset-console`.

pub mod audit;
pub mod error;
pub mod password;
pub mod resource;
pub mod search;
pub mod types;
pub mod validation;
