//! Extractor system.
//!
//! This module provides the [`FromContext`] trait, which defines how handler
//! parameters are produced from an [`InteractionContext`]. Handlers declare
//! what they need by their signature; a parameter that cannot be extracted
//! skips the handler.

use std::sync::Arc;

use switchboard_core::{
    BoxedSession, CommandData, ComponentData, Interaction, ModalData, Session, downcast_session,
};

use crate::context::InteractionContext;
use crate::error::ExtractError;

/// A trait for types that can be extracted from an [`InteractionContext`].
///
/// # Example
///
/// ```rust,ignore
/// struct InvokerId(String);
///
/// impl FromContext for InvokerId {
///     fn from_context(ctx: &InteractionContext) -> Result<Self, ExtractError> {
///         Ok(InvokerId(ctx.interaction().id.clone()))
///     }
/// }
/// ```
pub trait FromContext: Sized {
    /// Attempts to extract this type from the given context.
    fn from_context(ctx: &InteractionContext) -> Result<Self, ExtractError>;
}

/// Extracts a clone of the full interaction.
impl FromContext for Interaction {
    fn from_context(ctx: &InteractionContext) -> Result<Self, ExtractError> {
        Ok(ctx.interaction().clone())
    }
}

/// Extracts the type-erased session handle.
impl FromContext for BoxedSession {
    fn from_context(ctx: &InteractionContext) -> Result<Self, ExtractError> {
        Ok(ctx.session_arc())
    }
}

/// Extracts a concrete session type via downcast.
///
/// This lets handlers reach client-specific APIs the [`Session`] trait does
/// not expose:
///
/// ```rust,ignore
/// async fn handler(session: Arc<MyClientSession>, ctx: Interaction) {
///     session.edit_original_response(&ctx, "done").await.ok();
/// }
/// ```
impl<T: Session + 'static> FromContext for Arc<T> {
    fn from_context(ctx: &InteractionContext) -> Result<Self, ExtractError> {
        downcast_session::<T>(ctx.session_arc()).ok_or_else(|| ExtractError::SessionTypeMismatch {
            expected: std::any::type_name::<T>(),
        })
    }
}

/// Extracts the command payload of a command or autocomplete interaction.
impl FromContext for CommandData {
    fn from_context(ctx: &InteractionContext) -> Result<Self, ExtractError> {
        ctx.interaction()
            .command_data()
            .cloned()
            .ok_or(ExtractError::PayloadMismatch {
                expected: "command data",
            })
    }
}

/// Extracts the payload of a message component interaction.
impl FromContext for ComponentData {
    fn from_context(ctx: &InteractionContext) -> Result<Self, ExtractError> {
        ctx.interaction()
            .component_data()
            .cloned()
            .ok_or(ExtractError::PayloadMismatch {
                expected: "component data",
            })
    }
}

/// Extracts the payload of a modal submission.
impl FromContext for ModalData {
    fn from_context(ctx: &InteractionContext) -> Result<Self, ExtractError> {
        ctx.interaction()
            .modal_data()
            .cloned()
            .ok_or(ExtractError::PayloadMismatch {
                expected: "modal data",
            })
    }
}

/// Makes any extractor optional instead of skipping the handler.
impl<T: FromContext> FromContext for Option<T> {
    fn from_context(ctx: &InteractionContext) -> Result<Self, ExtractError> {
        Ok(T::from_context(ctx).ok())
    }
}
