//! Request pipeline stages.
//!
//! - [`session::require_session`] -- Optional bearer-token gate in front of
//!   resource mutations.
//! - [`session::MaybeSession`] -- Reads the session attached by that gate.

pub mod session;
