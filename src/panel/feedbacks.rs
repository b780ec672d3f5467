use super::schema::{
    Choice, FeedbackDefinition, FeedbackKind, OptionField, Rgb, Style,
};
use crate::error::{Error, Result};
use crate::player::PlaybackStatus;

use serde_json::{Map, Value};

pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const PLAYING: Rgb = Rgb::new(0, 204, 0);
pub const PAUSED: Rgb = Rgb::new(255, 255, 0);
pub const STOPPED: Rgb = Rgb::new(255, 0, 0);
pub const ACTIVE: Rgb = Rgb::new(0, 51, 204);
pub const REMAINING: Rgb = Rgb::new(255, 128, 0);

pub const PLAYBACK_STATUSES: [&str; 4] = ["Playing", "Paused", "Stopped", "Hold First Frame"];

/// Whether a remaining-time check looks at the clip or the whole playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Clip,
    Playlist,
}

/// A feedback instance configured on a panel button
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    PlaybackStatus {
        status: String,
    },
    ClipActive {
        playlist: String,
        clip: String,
    },
    ClipStatus {
        playlist: String,
        clip: String,
        status: String,
    },
    TimeRemaining {
        scope: Scope,
        seconds: f64,
    },
}

impl Feedback {
    /// Parse a feedback from its id and the host's option bag
    pub fn from_options(id: &str, options: &Map<String, Value>) -> Result<Self> {
        let text = |key: &str| -> Result<String> {
            match options.get(key) {
                Some(Value::String(s)) => Ok(s.trim().to_string()),
                Some(Value::Number(n)) => Ok(n.to_string()),
                Some(other) => Err(Error::bad_option(id, key, other)),
                None => Err(Error::missing_option(id, key)),
            }
        };

        Ok(match id {
            "playbackStatus" => Feedback::PlaybackStatus {
                status: text("status")?,
            },
            "clipActive" => Feedback::ClipActive {
                playlist: text("playlist")?,
                clip: text("clip")?,
            },
            "clipStatus" => Feedback::ClipStatus {
                playlist: text("playlist")?,
                clip: text("clip")?,
                status: text("status")?,
            },
            "timeRemaining" => {
                let scope = match text("type")?.as_str() {
                    "clip" => Scope::Clip,
                    "playlist" => Scope::Playlist,
                    _ => return Err(Error::bad_option(id, "type", &options["type"])),
                };
                let raw = text("time")?;
                let seconds = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|s| s.is_finite() && *s >= 0.0)
                    .ok_or_else(|| Error::bad_option(id, "time", &Value::String(raw.clone())))?;
                Feedback::TimeRemaining { scope, seconds }
            }
            other => return Err(Error::unknown_command(other)),
        })
    }

    /// Evaluate against the current snapshot; false when nothing is known yet
    pub fn evaluate(&self, status: Option<&PlaybackStatus>) -> bool {
        let status = match status {
            Some(status) => status,
            None => return false,
        };

        match self {
            Self::PlaybackStatus { status: wanted } => {
                status.playback_status.as_deref() == Some(wanted.as_str())
            }
            Self::ClipActive { playlist, clip } => clip_matches(status, playlist, clip),
            Self::ClipStatus {
                playlist,
                clip,
                status: wanted,
            } => {
                clip_matches(status, playlist, clip)
                    && status.playback_status.as_deref() == Some(wanted.as_str())
            }
            Self::TimeRemaining { scope, seconds } => {
                if !status.item_is_playing() {
                    return false;
                }
                let remaining = match scope {
                    Scope::Clip => status.item_remaining,
                    Scope::Playlist => status.playlist_remaining,
                };
                matches!(remaining, Some(r) if r.floor() <= *seconds)
            }
        }
    }
}

/// Playlist and clip may each be given as index or display name
fn clip_matches(status: &PlaybackStatus, playlist: &str, clip: &str) -> bool {
    let is = |wanted: &str, index: &Option<String>, name: &Option<String>| {
        index.as_deref() == Some(wanted) || name.as_deref() == Some(wanted)
    };
    is(playlist, &status.playlist_index, &status.playlist_display_name)
        && is(clip, &status.item_index, &status.item_display_name)
}

fn status_choices() -> Vec<Choice> {
    PLAYBACK_STATUSES
        .iter()
        .map(|s| Choice::new(*s, *s))
        .collect()
}

fn playlist_field() -> OptionField {
    OptionField::text("playlist", "Playlist")
        .with_default("0")
        .with_tooltip("Enter an index (zero based) or name of a playlist")
        .required(true)
}

fn clip_field() -> OptionField {
    OptionField::text("clip", "Clip")
        .with_default("0")
        .with_tooltip("Enter an index (zero based) or name of a clip")
        .required(true)
}

fn highlight(color: Rgb, bgcolor: Rgb) -> Style {
    Style {
        color: Some(color),
        bgcolor: Some(bgcolor),
        ..Style::default()
    }
}

pub fn definitions() -> Vec<FeedbackDefinition> {
    vec![
        FeedbackDefinition {
            id: "playbackStatus",
            name: "Playback status",
            description: "Set colour based on status (playing, paused, stopped)",
            kind: FeedbackKind::Boolean,
            options: vec![OptionField::dropdown("status", "Status", status_choices())],
            style: highlight(WHITE, PLAYING),
        },
        FeedbackDefinition {
            id: "clipActive",
            name: "Active clip",
            description: "Set colour when a specific clip is active",
            kind: FeedbackKind::Boolean,
            options: vec![playlist_field(), clip_field()],
            style: highlight(WHITE, ACTIVE),
        },
        FeedbackDefinition {
            id: "clipStatus",
            name: "Active clip, with status",
            description: "Set colour based on status of a specific clip",
            kind: FeedbackKind::Boolean,
            options: vec![
                playlist_field(),
                clip_field(),
                OptionField::dropdown("status", "Status", status_choices()),
            ],
            style: highlight(WHITE, ACTIVE),
        },
        FeedbackDefinition {
            id: "timeRemaining",
            name: "Time remaining",
            description: "Set feedback when a specified amount of time remains in the clip/playlist",
            kind: FeedbackKind::Boolean,
            options: vec![
                OptionField::dropdown(
                    "type",
                    "Clip/Playlist",
                    vec![Choice::new("clip", "Clip"), Choice::new("playlist", "Playlist")],
                ),
                OptionField::number("time", "Time (seconds)", Value::from(30), 0.0, 1000.0)
                    .with_tooltip("The number of seconds remaining when the feedback should trigger"),
            ],
            style: Style {
                bgcolor: Some(REMAINING),
                ..Style::default()
            },
        },
    ]
}
