//! # Switchboard
//!
//! A routing layer for inbound interaction events from a chat-platform
//! gateway. Incoming interactions are matched against registered
//! [`Feature`]s — each a rule over the event's kind, command name, or a
//! glob-matched custom id, plus the handlers to run — and the first match
//! wins.
//!
//! The gateway connection and REST transport belong to an external client
//! library, reached through the [`Session`] trait from `switchboard-core`.
//! On top of that seam this crate adds:
//!
//! - the [`Feature`] record and its matching rules,
//! - Axum-style handler functions with [`FromContext`] parameter injection,
//! - the [`FeatureSet`] registry: linear-scan dispatch plus the command
//!   registration lifecycle ([`sync_commands`](FeatureSet::sync_commands) /
//!   [`clear_commands`](FeatureSet::clear_commands)).
//!
//! # Example
//!
//! ```rust,ignore
//! use switchboard::prelude::*;
//!
//! async fn ping(ctx: Interaction, session: BoxedSession) {
//!     let reply = InteractionResponse::message("pong!");
//!     session.respond(&ctx, reply).await.ok();
//! }
//!
//! let features = FeatureSet::new()
//!     .with(on_command(CommandSpec::new("ping", "Check latency")).handler(ping))
//!     .with(on_component("confirm:*").handler(confirm));
//!
//! features.sync_commands(session.clone(), None).await?;
//! features.dispatch(session, interaction).await;
//! ```
//!
//! [`Session`]: switchboard_core::Session

pub mod builders;
pub mod context;
pub mod error;
pub mod extractor;
pub mod feature;
pub mod handler;
pub mod pattern;
pub mod registry;

pub use builders::{on_autocomplete, on_command, on_component, on_modal, on_ping};
pub use context::InteractionContext;
pub use error::{ExtractError, ExtractResult};
pub use extractor::FromContext;
pub use feature::{Feature, FeatureResponse};
pub use handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler, HandlerFn, into_handler};
pub use pattern::IdPattern;
pub use registry::FeatureSet;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::builders::{on_autocomplete, on_command, on_component, on_modal, on_ping};
    pub use crate::context::InteractionContext;
    pub use crate::feature::Feature;
    pub use crate::pattern::IdPattern;
    pub use crate::registry::FeatureSet;
    pub use switchboard_core::{
        ApiError, ApiResult, BoxedSession, CommandData, CommandOptionSpec, CommandSpec,
        ComponentData, Interaction, InteractionKind, InteractionResponse, ModalData,
        RegistryError, Session,
    };
}
