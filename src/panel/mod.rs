//! Everything the host automation panel sees
//!
//! The panel itself is external. [`Player`](crate::Player) talks to it through
//! the [`Host`] trait and describes its actions, feedbacks, presets and
//! variables with the declarative types in [`schema`].

pub mod schema;

mod actions;
mod feedbacks;
mod presets;
mod variables;

pub use self::feedbacks::{Feedback, Scope, PLAYBACK_STATUSES};
pub use self::presets::{CLIP_PRESET_CLIPS, CLIP_PRESET_PLAYLISTS};
pub use self::variables::{render_time, Variables};

pub(crate) use self::actions::definitions as action_definitions;
pub(crate) use self::feedbacks::definitions as feedback_definitions;
pub(crate) use self::presets::definitions as preset_definitions;
pub(crate) use self::variables::{
    definitions as variable_definitions, playlist_values, status_values, system_values,
};

use self::schema::{ActionDefinition, FeedbackDefinition, PresetDefinition, VariableDefinition};
use crate::constants::DEFAULT_LABEL;

use std::fmt;

/// Connection indicator shown by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    Connecting,
    Ok,
    Error,
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connecting => "connecting",
            Self::Ok => "ok",
            Self::Error => "error",
        })
    }
}

/// The panel runtime hosting a [`Player`](crate::Player)
///
/// Calls arrive on the player's thread, in the order state changes.
pub trait Host {
    /// Instance label used in variable references, e.g. `$(label:playbackStatus)`
    fn label(&self) -> &str {
        DEFAULT_LABEL
    }

    fn set_status(&self, health: Health, message: Option<&str>);

    /// Replaces every variable definition
    fn set_variable_definitions(&self, definitions: Vec<VariableDefinition>);

    /// Updates the given variables, leaving others untouched
    fn set_variable_values(&self, values: Variables);

    fn set_action_definitions(&self, definitions: Vec<ActionDefinition>);

    fn set_feedback_definitions(&self, definitions: Vec<FeedbackDefinition>);

    fn set_preset_definitions(&self, definitions: Vec<PresetDefinition>);

    /// Ask the panel to re-evaluate every configured feedback
    fn check_feedbacks(&self);
}
