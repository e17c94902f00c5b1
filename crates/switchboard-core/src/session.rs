//! The client seam.
//!
//! The gateway connection, event decoding, REST transport, retries, and
//! rate-limiting are all owned by an external client library. The router
//! reaches it through the object-safe [`Session`] trait, which exposes the
//! three things the routing layer actually needs: the authenticated
//! application identity, the command registration endpoints, and a way to
//! respond to an interaction.
//!
//! Keeping the seam this narrow also makes the router trivially testable —
//! the test suites drive it with in-memory sessions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;

use crate::command::{CommandSpec, CreatedCommand};
use crate::error::ApiResult;
use crate::interaction::Interaction;

// ============================================================================
// Interaction Responses
// ============================================================================

/// Response type codes, mirroring the platform's numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ResponseKind {
    /// Acknowledge a ping.
    Pong,
    /// Reply with a channel message.
    ChannelMessage,
    /// Acknowledge now, edit a reply in later.
    DeferredChannelMessage,
    /// Acknowledge a component action without changing the message.
    DeferredUpdate,
    /// Edit the message the component is attached to.
    UpdateMessage,
    /// Present a modal.
    Modal,
}

impl From<ResponseKind> for u8 {
    fn from(kind: ResponseKind) -> u8 {
        match kind {
            ResponseKind::Pong => 1,
            ResponseKind::ChannelMessage => 4,
            ResponseKind::DeferredChannelMessage => 5,
            ResponseKind::DeferredUpdate => 6,
            ResponseKind::UpdateMessage => 7,
            ResponseKind::Modal => 9,
        }
    }
}

impl TryFrom<u8> for ResponseKind {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            1 => ResponseKind::Pong,
            4 => ResponseKind::ChannelMessage,
            5 => ResponseKind::DeferredChannelMessage,
            6 => ResponseKind::DeferredUpdate,
            7 => ResponseKind::UpdateMessage,
            9 => ResponseKind::Modal,
            other => return Err(format!("unknown response type code {other}")),
        })
    }
}

/// Message body of an interaction response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    /// Text content of the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A reply to an interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionResponse {
    /// Response classification.
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    /// Response body, when the kind carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl InteractionResponse {
    /// Acknowledges a ping.
    pub fn pong() -> Self {
        Self {
            kind: ResponseKind::Pong,
            data: None,
        }
    }

    /// Replies with a plain text message.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::ChannelMessage,
            data: Some(ResponseData {
                content: Some(content.into()),
            }),
        }
    }

    /// Acknowledges the interaction, deferring the visible reply.
    pub fn deferred() -> Self {
        Self {
            kind: ResponseKind::DeferredChannelMessage,
            data: None,
        }
    }
}

// ============================================================================
// Session Trait
// ============================================================================

/// The router's view of the external gateway client.
///
/// Implementations wrap a concrete client library's session object. All
/// transport concerns (connection lifecycle, retries, rate limits) stay on
/// the implementation side; the router only forwards errors.
#[async_trait]
pub trait Session: Send + Sync {
    /// Returns the application identity the gateway authenticated.
    ///
    /// The client must already be connected; command registration is keyed
    /// by this identity.
    fn application_id(&self) -> &str;

    /// Atomically replaces the registered command set.
    ///
    /// `guild_id` scopes the commands to one guild; `None` registers them
    /// globally. Returns the created commands with their assigned ids.
    async fn bulk_set_commands(
        &self,
        guild_id: Option<&str>,
        specs: &[CommandSpec],
    ) -> ApiResult<Vec<CreatedCommand>>;

    /// Deletes a single registered command by id.
    async fn delete_command(&self, guild_id: Option<&str>, command_id: &str) -> ApiResult<()>;

    /// Sends a response to an interaction.
    async fn respond(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> ApiResult<()>;

    /// Returns self as an `Arc<dyn Any>` for safe downcasting.
    ///
    /// Implementors should simply return `self`.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A shared, type-erased session handle.
pub type BoxedSession = Arc<dyn Session>;

/// Attempts to downcast a [`BoxedSession`] to a concrete session type.
///
/// Handlers use this (through the extractor system) to reach
/// client-specific APIs that the [`Session`] trait does not expose.
pub fn downcast_session<T: Session + 'static>(session: BoxedSession) -> Option<Arc<T>> {
    Arc::downcast::<T>(session.as_any()).ok()
}
