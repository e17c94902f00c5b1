//! Feature builder functions for common interaction kinds.
//!
//! Thin conveniences over the [`Feature`] constructors, pre-setting a
//! diagnostic name.
//!
//! # Example
//!
//! ```rust,ignore
//! let features = FeatureSet::new()
//!     .with(on_command(ping_spec()).handler(ping))
//!     .with(on_component("confirm:*").handler(confirm))
//!     .with(on_modal("feedback").handler(feedback));
//! ```

use switchboard_core::CommandSpec;

use crate::feature::Feature;
use crate::pattern::IdPattern;

/// Creates a feature matching invocations of the given command, named after
/// the command.
pub fn on_command(spec: CommandSpec) -> Feature {
    let name = spec.name.clone();
    Feature::command(spec).name(name)
}

/// Creates a feature matching autocomplete requests for the given command.
pub fn on_autocomplete(spec: CommandSpec) -> Feature {
    let name = format!("{}:autocomplete", spec.name);
    Feature::autocomplete(spec).name(name)
}

/// Creates a feature matching component actions whose custom id fits
/// `pattern`.
pub fn on_component(pattern: impl Into<IdPattern>) -> Feature {
    let pattern = pattern.into();
    let name = pattern.to_string();
    Feature::component(pattern).name(name)
}

/// Creates a feature matching modal submissions whose custom id fits
/// `pattern`.
pub fn on_modal(pattern: impl Into<IdPattern>) -> Feature {
    let pattern = pattern.into();
    let name = pattern.to_string();
    Feature::modal(pattern).name(name)
}

/// Creates a feature matching platform pings.
pub fn on_ping() -> Feature {
    Feature::ping().name("ping")
}
