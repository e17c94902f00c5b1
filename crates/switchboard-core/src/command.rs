//! Application command definitions.
//!
//! A [`CommandSpec`] is the server-side definition a feature wants the
//! platform to expose: the name users type, a description, and the option
//! schema. Specs serialize to the REST body shape expected by the bulk
//! registration endpoint; the response comes back as [`CreatedCommand`]
//! records carrying the ids needed for later deletion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A server-side application command definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    /// The command name exposed to users.
    pub name: String,
    /// Short description shown in the command picker.
    pub description: String,
    /// Option schema, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOptionSpec>,
}

impl CommandSpec {
    /// Creates a command definition with no options.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Appends an option to this command (builder pattern).
    pub fn option(mut self, option: CommandOptionSpec) -> Self {
        self.options.push(option);
        self
    }
}

/// One option in a command's schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOptionSpec {
    /// The platform's option type code.
    #[serde(rename = "type")]
    pub kind: u8,
    /// Option name.
    pub name: String,
    /// Option description.
    pub description: String,
    /// Whether the user must supply this option.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Fixed choices, if the option is an enumeration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<OptionChoice>,
}

impl CommandOptionSpec {
    /// Option type code for string options.
    pub const STRING: u8 = 3;
    /// Option type code for integer options.
    pub const INTEGER: u8 = 4;
    /// Option type code for boolean options.
    pub const BOOLEAN: u8 = 5;

    /// Creates an option with an explicit type code.
    pub fn new(kind: u8, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            choices: Vec::new(),
        }
    }

    /// Creates a string option.
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Self::STRING, name, description)
    }

    /// Creates an integer option.
    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Self::INTEGER, name, description)
    }

    /// Creates a boolean option.
    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Self::BOOLEAN, name, description)
    }

    /// Marks this option as required (builder pattern).
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Appends a fixed choice (builder pattern).
    pub fn choice(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.choices.push(OptionChoice {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

/// A fixed choice for an enumerated option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChoice {
    /// Display name of the choice.
    pub name: String,
    /// The value delivered when the choice is picked.
    pub value: Value,
}

/// A command as returned by the registration endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedCommand {
    /// The platform-assigned command id.
    pub id: String,
    /// The command name.
    pub name: String,
}
