//! Headless admin console for the asset administration API.
//!
//! Holds everything a front end needs to drive the resource list pages
//! without owning any rendering:
//!
//! - [`client`] -- typed HTTP client for `/api/<resource>` and `/api/login`.
//! - [`cache`] -- list results keyed per resource, invalidated after writes.
//! - [`toast`] -- notification queue driven by push/update/dismiss commands.
//! - [`debounce`] -- settles the search box before filtering.
//! - [`page`] -- the resource list page state machine.
//! - [`pages`] -- per-resource page configuration.
//! - [`table`] -- render-agnostic table view model.
//! - [`shell`] -- wires the above together.

pub mod cache;
pub mod client;
pub mod config;
pub mod debounce;
pub mod page;
pub mod pages;
pub mod shell;
pub mod table;
pub mod toast;
