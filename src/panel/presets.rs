use super::feedbacks::{ACTIVE, BLACK, PAUSED, PLAYING, STOPPED, WHITE};
use super::schema::{PresetAction, PresetDefinition, PresetFeedback, Rgb, Style};

use serde_json::{json, Value};

const TRANSPORT: &str = "Transport";
const PREV_NEXT: Rgb = ACTIVE;

/// Clip buttons are offered for this many playlists and clips per playlist
pub const CLIP_PRESET_PLAYLISTS: usize = 2;
pub const CLIP_PRESET_CLIPS: usize = 20;

fn style(text: &str, size: &str, color: Rgb) -> Style {
    Style {
        text: Some(text.into()),
        size: Some(size.into()),
        color: Some(color),
        bgcolor: Some(BLACK),
    }
}

fn colors(color: Rgb, bgcolor: Rgb) -> Style {
    Style {
        color: Some(color),
        bgcolor: Some(bgcolor),
        ..Style::default()
    }
}

fn press(action_id: &'static str, options: Value) -> Vec<PresetAction> {
    vec![PresetAction { action_id, options }]
}

fn status_feedback(status: &str, color: Rgb, bgcolor: Rgb) -> PresetFeedback {
    PresetFeedback {
        feedback_id: "playbackStatus",
        options: json!({ "status": status }),
        style: colors(color, bgcolor),
    }
}

fn transport(
    id: &str,
    name: &str,
    style: Style,
    down: Vec<PresetAction>,
    feedbacks: Vec<PresetFeedback>,
) -> PresetDefinition {
    PresetDefinition {
        id: id.into(),
        category: TRANSPORT.into(),
        name: name.into(),
        style,
        down,
        feedbacks,
    }
}

/// Ready made buttons. `label` is the host's instance label, used in
/// variable references such as `$(label:playbackStatus)`.
pub fn definitions(label: &str) -> Vec<PresetDefinition> {
    let mut presets = vec![
        transport(
            "play",
            "Play",
            style("\u{23f5}", "44", PLAYING),
            press("play", json!({ "playlist": "", "clip": "" })),
            vec![status_feedback("Playing", WHITE, PLAYING)],
        ),
        transport(
            "pause",
            "Pause",
            style("\u{23ef}", "44", PAUSED),
            press("pause", json!({ "playlist": "", "clip": "" })),
            vec![status_feedback("Paused", BLACK, PAUSED)],
        ),
        transport(
            "stop",
            "Stop",
            style("\u{23f9}", "44", STOPPED),
            press("stop", json!({ "playlist": "" })),
            vec![status_feedback("Stopped", WHITE, STOPPED)],
        ),
        transport(
            "resume",
            "Resume",
            style("Resume", "18", PLAYING),
            press("resume", json!({ "playlist": "" })),
            vec![status_feedback("Playing", WHITE, PLAYING)],
        ),
        transport(
            "previous",
            "Previous",
            style("\u{23ee}", "44", PREV_NEXT),
            press("skipPrevious", json!({ "playlist": "" })),
            Vec::new(),
        ),
        transport(
            "next",
            "Next",
            style("\u{23ed}", "44", PREV_NEXT),
            press("skipNext", json!({ "playlist": "" })),
            Vec::new(),
        ),
        transport(
            "cue",
            "Cue Trigger",
            style("Cue", "18", WHITE),
            press("cueTrigger", json!({})),
            Vec::new(),
        ),
        transport(
            "status",
            "Status",
            style(&format!("$({}:playbackStatus)", label), "14", WHITE),
            Vec::new(),
            vec![
                status_feedback("Playing", WHITE, PLAYING),
                status_feedback("Paused", BLACK, PAUSED),
                status_feedback("Stopped", WHITE, STOPPED),
                status_feedback("Hold First Frame", WHITE, ACTIVE),
            ],
        ),
        transport(
            "update",
            "Update",
            style("Update", "18", WHITE),
            press("updatePlaylists", json!({})),
            Vec::new(),
        ),
    ];

    for playlist in 0..CLIP_PRESET_PLAYLISTS {
        for clip in 0..CLIP_PRESET_CLIPS {
            let clip_status = |status: &str, color: Rgb, bgcolor: Rgb| PresetFeedback {
                feedback_id: "clipStatus",
                options: json!({
                    "playlist": playlist.to_string(),
                    "clip": clip.to_string(),
                    "status": status,
                }),
                style: colors(color, bgcolor),
            };

            presets.push(PresetDefinition {
                id: format!("clip_{}_{}", playlist, clip),
                category: format!("Clips (playlist {})", playlist),
                name: format!("Clip {}", clip),
                style: style(
                    &format!("$({}:clip_{}_{})", label, playlist, clip),
                    "auto",
                    WHITE,
                ),
                down: press(
                    "pause",
                    json!({ "playlist": playlist.to_string(), "clip": clip.to_string() }),
                ),
                feedbacks: vec![
                    clip_status("Hold First Frame", WHITE, ACTIVE),
                    clip_status("Playing", WHITE, PLAYING),
                    clip_status("Paused", BLACK, PAUSED),
                ],
            });
        }
    }

    presets
}
