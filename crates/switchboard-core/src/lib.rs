//! # Switchboard Core
//!
//! Platform-facing building blocks for the Switchboard interaction router.
//!
//! This crate defines the data model for inbound interaction events, the
//! application-command definitions pushed to the platform, and the
//! [`Session`] trait — the seam through which the router talks to whatever
//! client library owns the actual gateway connection and REST transport.
//!
//! The routing logic itself (features, pattern matching, dispatch) lives in
//! the `switchboard` crate; this crate is deliberately free of it so that
//! session implementations only depend on the model.

pub mod command;
pub mod error;
pub mod interaction;
pub mod session;

pub use command::{CommandOptionSpec, CommandSpec, CreatedCommand, OptionChoice};
pub use error::{ApiError, ApiResult, RegistryError, RegistryResult};
pub use interaction::{
    CommandData, CommandOption, ComponentData, Interaction, InteractionData, InteractionKind,
    ModalData,
};
pub use session::{
    BoxedSession, InteractionResponse, ResponseData, ResponseKind, Session, downcast_session,
};
