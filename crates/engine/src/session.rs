//! Per-session tier availability.
//!
//! Flags are set on the first failure of a remote tier and read before every
//! later attempt. Cloning a `SessionState` shares the flags; build a new one
//! (or call [`SessionState::reset`]) to start a fresh session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use stoa_core::selector::Tier;

#[derive(Debug, Default)]
struct Flags {
    retrieval_unavailable: AtomicBool,
    provider_unavailable: AtomicBool,
    retrieval_probed: AtomicBool,
}

/// Shared, lock-free session flags.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    flags: Arc<Flags>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The local tier is never unavailable.
    pub fn is_unavailable(&self, tier: Tier) -> bool {
        match tier {
            Tier::Retrieval => self.flags.retrieval_unavailable.load(Ordering::Relaxed),
            Tier::Provider => self.flags.provider_unavailable.load(Ordering::Relaxed),
            Tier::Local => false,
        }
    }

    /// No-op for [`Tier::Local`].
    pub fn mark_unavailable(&self, tier: Tier) {
        match tier {
            Tier::Retrieval => self.flags.retrieval_unavailable.store(true, Ordering::Relaxed),
            Tier::Provider => self.flags.provider_unavailable.store(true, Ordering::Relaxed),
            Tier::Local => {}
        }
    }

    pub fn retrieval_unavailable(&self) -> bool {
        self.is_unavailable(Tier::Retrieval)
    }

    pub fn provider_unavailable(&self) -> bool {
        self.is_unavailable(Tier::Provider)
    }

    /// Whether the retrieval health probe has already passed this session.
    pub fn retrieval_probed(&self) -> bool {
        self.flags.retrieval_probed.load(Ordering::Relaxed)
    }

    pub(crate) fn mark_retrieval_probed(&self) {
        self.flags.retrieval_probed.store(true, Ordering::Relaxed);
    }

    /// Clear every flag, as on app restart.
    pub fn reset(&self) {
        self.flags.retrieval_unavailable.store(false, Ordering::Relaxed);
        self.flags.provider_unavailable.store(false, Ordering::Relaxed);
        self.flags.retrieval_probed.store(false, Ordering::Relaxed);
    }
}
