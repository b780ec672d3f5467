use super::schema::{ActionDefinition, Choice, OptionField};
use crate::player::Choices;

use serde_json::Value;

/// Client side check for position fields; the dispatcher validates again
const POSITION_REGEX: &str =
    r"/^([0-9]+(\.[0-9]+)?|([01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9][:;][0-6][0-9])$/";

fn position_types() -> Vec<Choice> {
    vec![
        Choice::new("relativeTimecode", "Relative Timecode"),
        Choice::new("mediaTimecode", "Media Timecode"),
        Choice::new("relativeSeconds", "Relative Seconds"),
    ]
}

fn optional_playlist() -> OptionField {
    OptionField::text("playlist", "Playlist (optional, name/index)")
        .with_tooltip("Enter an index (zero based) or name of a playlist")
}

fn optional_clip_index() -> OptionField {
    OptionField::number("clip", "Clip Index (optional)", Value::from(""), 0.0, 10000.0)
        .with_tooltip("Enter an index (zero based) for a clip")
        .required(false)
}

fn positioned(id: &'static str, name: &'static str) -> ActionDefinition {
    ActionDefinition {
        id,
        name,
        options: vec![
            OptionField::text("playlist", "Playlist")
                .with_default("0")
                .with_tooltip("Enter an index (zero based) or name of a playlist")
                .required(true),
            OptionField::number("clip", "Clip Index", Value::from(0), 0.0, 10000.0)
                .with_tooltip("Enter an index (zero based) for a clip"),
            OptionField::dropdown("type", "Position type", position_types()),
            OptionField::text("position", "Time (timecode or seconds)")
                .with_regex(POSITION_REGEX)
                .required(true),
        ],
    }
}

fn playlist_only(id: &'static str, name: &'static str) -> ActionDefinition {
    ActionDefinition {
        id,
        name,
        options: vec![optional_playlist()],
    }
}

fn cg_project(id: &'static str, name: &'static str, projects: &[Choice]) -> ActionDefinition {
    ActionDefinition {
        id,
        name,
        options: vec![OptionField::dropdown("project", "CG Project", projects.to_vec())
            .with_tooltip("Select a CG project")],
    }
}

fn bare(id: &'static str, name: &'static str) -> ActionDefinition {
    ActionDefinition {
        id,
        name,
        options: Vec::new(),
    }
}

/// All actions, with dropdowns filled from the current `choices`
pub fn definitions(choices: &Choices) -> Vec<ActionDefinition> {
    vec![
        ActionDefinition {
            id: "play",
            name: "Play",
            options: vec![optional_playlist(), optional_clip_index()],
        },
        positioned("playPosition", "Play clip at position"),
        ActionDefinition {
            id: "pause",
            name: "Pause",
            options: vec![optional_playlist(), optional_clip_index()],
        },
        positioned("pausePosition", "Pause clip at position"),
        playlist_only("resume", "Resume"),
        playlist_only("stop", "Stop"),
        playlist_only("skipNext", "Skip to next clip"),
        playlist_only("skipPrevious", "Skip to previous clip"),
        ActionDefinition {
            id: "gotoEndMinus",
            name: "Goto (end minus)",
            options: vec![OptionField::number(
                "tMinus",
                "Time to end of clip (seconds)",
                Value::from(30),
                0.0,
                86400.0,
            )],
        },
        bare("updatePlaylists", "Update playlist info"),
        ActionDefinition {
            id: "joinInProgress",
            name: "Join In Progress",
            options: vec![
                optional_playlist(),
                OptionField::text("clip", "Clip (optional, index/UID)")
                    .with_tooltip("Enter an index (zero based) or UID for a clip"),
            ],
        },
        ActionDefinition {
            id: "gpiTrigger",
            name: "Toggle Virtual GPI",
            options: vec![
                OptionField::number("input", "GPI Input", Value::from(1), 1.0, 25.0)
                    .with_tooltip("GPI input number (1-25)"),
            ],
        },
        bare("cueTrigger", "Cue Trigger (Space Bar)"),
        cg_project("cgPlay", "CG Project - Play", &choices.cg_projects),
        cg_project("cgPause", "CG Project - Pause", &choices.cg_projects),
        cg_project("cgStop", "CG Project - Stop", &choices.cg_projects),
        bare("updateCGProjects", "Update CG projects info"),
        ActionDefinition {
            id: "runAction",
            name: "Run Action (AppleScript)",
            options: vec![
                OptionField::dropdown("action", "Action", choices.actions.clone())
                    .with_tooltip("Select an available action to run"),
                OptionField::text("parameter", "Parameter (optional)")
                    .with_tooltip("Optional parameter to pass to the action"),
            ],
        },
    ]
}
