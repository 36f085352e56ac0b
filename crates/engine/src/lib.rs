//! Stoa selection engine.
//!
//! The [`Orchestrator`] walks the three tiers in priority order
//! (retrieval, provider, local) and remembers, per [`SessionState`], which
//! remote tiers have already failed.

pub mod orchestrator;
pub mod session;

pub use orchestrator::{Orchestrator, bound_candidates};
pub use session::SessionState;
