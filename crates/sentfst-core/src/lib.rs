//! Shared types for sentence-to-FST conversion.
//!
//! - [`arc`] -- Labels, state ids and acceptor arcs
//! - [`markers`] -- Validated disambiguation / BOS / EOS symbol configuration

pub mod arc;
pub mod markers;

pub use arc::{Arc, Label, StateId};
pub use markers::{ConfigError, MarkerIds};
