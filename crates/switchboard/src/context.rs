//! Dispatch context.
//!
//! One [`InteractionContext`] is created per inbound interaction and shared
//! as an `Arc` with every handler the matched feature runs. It carries the
//! interaction itself and the session handle for responding.

use std::sync::Arc;

use switchboard_core::{BoxedSession, Interaction};

/// The context handed to handlers during dispatch.
pub struct InteractionContext {
    interaction: Interaction,
    session: BoxedSession,
}

impl InteractionContext {
    /// Creates a new context for one dispatch cycle.
    pub fn new(interaction: Interaction, session: BoxedSession) -> Self {
        Self {
            interaction,
            session,
        }
    }

    /// Returns the interaction being dispatched.
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Returns a reference to the session handle.
    pub fn session(&self) -> &BoxedSession {
        &self.session
    }

    /// Returns a clone of the session `Arc`.
    pub fn session_arc(&self) -> BoxedSession {
        Arc::clone(&self.session)
    }
}

impl std::fmt::Debug for InteractionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionContext")
            .field("interaction", &self.interaction)
            .finish_non_exhaustive()
    }
}
