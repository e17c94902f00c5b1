//! Inbound interaction events.
//!
//! An [`Interaction`] is the gateway's notification that a user invoked an
//! application command, clicked a message component, submitted a modal, or
//! that the platform is probing with a ping. The router only needs the
//! attributes that drive matching — the kind, the command name, and the
//! custom id — but the full payload is kept so handlers can inspect options
//! and submitted values.
//!
//! All types deserialize directly from the gateway's JSON. Unknown
//! interaction type codes are preserved as [`InteractionKind::Unknown`]
//! rather than failing the whole event.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Interaction Kind
// ============================================================================

/// Classification of an interaction, mirroring the platform's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Liveness probe from the platform.
    Ping,
    /// A slash-command invocation.
    ApplicationCommand,
    /// A message component action (button, select menu, ...).
    MessageComponent,
    /// An autocomplete request for a command option.
    Autocomplete,
    /// A modal submission.
    ModalSubmit,
    /// A type code this crate does not know about.
    Unknown(u8),
}

impl InteractionKind {
    /// Returns the platform's numeric code for this kind.
    pub fn code(self) -> u8 {
        match self {
            InteractionKind::Ping => 1,
            InteractionKind::ApplicationCommand => 2,
            InteractionKind::MessageComponent => 3,
            InteractionKind::Autocomplete => 4,
            InteractionKind::ModalSubmit => 5,
            InteractionKind::Unknown(code) => code,
        }
    }
}

impl From<u8> for InteractionKind {
    fn from(code: u8) -> Self {
        match code {
            1 => InteractionKind::Ping,
            2 => InteractionKind::ApplicationCommand,
            3 => InteractionKind::MessageComponent,
            4 => InteractionKind::Autocomplete,
            5 => InteractionKind::ModalSubmit,
            other => InteractionKind::Unknown(other),
        }
    }
}

impl Serialize for InteractionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for InteractionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Ok(InteractionKind::from(code))
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Payload of a command or autocomplete interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandData {
    /// The registered command's id.
    pub id: String,
    /// The command name the user invoked.
    pub name: String,
    /// Options supplied by the user (possibly nested for subcommands).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

/// A single command option value, possibly carrying nested options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOption {
    /// Option name.
    pub name: String,
    /// The value the user supplied, left as raw JSON.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    /// Nested options for subcommands and groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

/// Payload of a message component interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentData {
    /// The developer-chosen identifier of the component.
    pub custom_id: String,
    /// The platform's component type code.
    pub component_type: u8,
    /// Selected values, for select-menu components.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Payload of a modal submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModalData {
    /// The developer-chosen identifier of the modal.
    pub custom_id: String,
    /// The submitted component tree, left as raw JSON.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub components: Value,
}

/// Kind-specific interaction payload.
///
/// The gateway does not tag the payload, so deserialization is structural:
/// command payloads carry `name`, component payloads carry `component_type`,
/// and modal payloads carry only `custom_id` plus the component tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InteractionData {
    /// Command or autocomplete payload.
    Command(CommandData),
    /// Message component payload.
    Component(ComponentData),
    /// Modal submission payload.
    Modal(ModalData),
}

// ============================================================================
// Interaction
// ============================================================================

/// An inbound interaction event, as delivered by the gateway client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Unique id of this interaction.
    pub id: String,
    /// The application the interaction targets.
    pub application_id: String,
    /// Interaction classification.
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    /// Continuation token for responding.
    pub token: String,
    /// Guild the interaction originated in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    /// Channel the interaction originated in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Kind-specific payload. Absent for pings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionData>,
}

impl Interaction {
    /// Returns the invoked command name, for command and autocomplete
    /// interactions.
    pub fn command_name(&self) -> Option<&str> {
        match &self.data {
            Some(InteractionData::Command(data)) => Some(&data.name),
            _ => None,
        }
    }

    /// Returns the custom id, for component and modal interactions.
    pub fn custom_id(&self) -> Option<&str> {
        match &self.data {
            Some(InteractionData::Component(data)) => Some(&data.custom_id),
            Some(InteractionData::Modal(data)) => Some(&data.custom_id),
            _ => None,
        }
    }

    /// Returns the command payload, if this is a command or autocomplete
    /// interaction.
    pub fn command_data(&self) -> Option<&CommandData> {
        match &self.data {
            Some(InteractionData::Command(data)) => Some(data),
            _ => None,
        }
    }

    /// Returns the component payload, if present.
    pub fn component_data(&self) -> Option<&ComponentData> {
        match &self.data {
            Some(InteractionData::Component(data)) => Some(data),
            _ => None,
        }
    }

    /// Returns the modal payload, if present.
    pub fn modal_data(&self) -> Option<&ModalData> {
        match &self.data {
            Some(InteractionData::Modal(data)) => Some(data),
            _ => None,
        }
    }
}
