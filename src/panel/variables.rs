use super::schema::VariableDefinition;
use crate::player::{PlaybackStatus, StateCache};

use std::collections::BTreeMap;

/// Variable id -> rendered value
pub type Variables = BTreeMap<String, String>;

const MISSING: &str = "-";

const STATUS_VARIABLES: [(&str, &str); 11] = [
    ("playbackStatus", "Playback status"),
    ("activePlaylist", "Active playlist index"),
    ("activePlaylistName", "Active playlist name"),
    ("playlistDuration", "Active playlist duration"),
    ("playlistElapsed", "Active playlist elapsed"),
    ("playlistRemaining", "Active playlist remaining"),
    ("activeClip", "Active clip index"),
    ("activeClipName", "Active clip name"),
    ("clipDuration", "Clip duration"),
    ("clipElapsed", "Clip elapsed"),
    ("clipRemaining", "Clip remaining"),
];

/// Render seconds as `M:SS`, or `H:MM:SS` from one hour up
///
/// ```
/// # use ontheair::panel::render_time;
/// assert_eq!(render_time(Some(125.0)), "2:05");
/// assert_eq!(render_time(Some(3725.0)), "1:02:05");
/// assert_eq!(render_time(None), "0:00");
/// ```
pub fn render_time(seconds: Option<f64>) -> String {
    let total = match seconds {
        Some(s) if s.is_finite() && s > 0.0 => s as u64,
        _ => 0,
    };
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Every variable the current cache can fill
pub fn definitions(cache: &StateCache) -> Vec<VariableDefinition> {
    let mut defs: Vec<VariableDefinition> = STATUS_VARIABLES
        .iter()
        .map(|(id, name)| VariableDefinition::new(*id, *name))
        .collect();

    for (p, playlist) in cache.playlists().iter().enumerate() {
        defs.push(VariableDefinition::new(
            format!("playlist_{}", p),
            format!("Playlist {}", p),
        ));
        for c in 0..playlist.clips.len() {
            defs.push(VariableDefinition::new(
                format!("clip_{}_{}", p, c),
                format!("Playlist {} Clip {}", p, c),
            ));
            defs.push(VariableDefinition::new(
                format!("clipDuration_{}_{}", p, c),
                format!("Playlist {} Clip {} duration", p, c),
            ));
        }
    }

    if let Some(info) = cache.system_info() {
        for (key, _) in info.scalars() {
            defs.push(VariableDefinition::new(
                format!("info_{}", key),
                format!("System info: {}", key.replace('_', " ")),
            ));
        }
    }

    defs
}

/// Values of the fixed status variables
pub fn status_values(status: &PlaybackStatus) -> Variables {
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING.into());
    let time = |value: Option<f64>| match value {
        Some(_) => render_time(value),
        None => MISSING.into(),
    };

    let mut values = Variables::new();
    values.insert("playbackStatus".into(), text(&status.playback_status));
    values.insert("activePlaylist".into(), text(&status.playlist_index));
    values.insert("activePlaylistName".into(), text(&status.playlist_display_name));
    values.insert("activeClip".into(), text(&status.item_index));
    values.insert("activeClipName".into(), text(&status.item_display_name));
    values.insert("playlistDuration".into(), time(status.playlist_duration));
    values.insert("playlistElapsed".into(), time(status.playlist_elapsed));
    values.insert("playlistRemaining".into(), time(status.playlist_remaining));
    values.insert("clipDuration".into(), time(status.item_duration));
    values.insert("clipElapsed".into(), time(status.item_elapsed));
    values.insert("clipRemaining".into(), time(status.item_remaining));
    values
}

/// Values of the per playlist and per clip variables
pub fn playlist_values(cache: &StateCache) -> Variables {
    let mut values = Variables::new();
    for (p, playlist) in cache.playlists().iter().enumerate() {
        values.insert(format!("playlist_{}", p), playlist.label.clone());
        for (c, clip) in playlist.clips.iter().enumerate() {
            values.insert(format!("clip_{}_{}", p, c), clip.name.clone());
            values.insert(format!("clipDuration_{}_{}", p, c), render_time(clip.duration));
        }
    }
    values
}

pub fn system_values(cache: &StateCache) -> Variables {
    cache
        .system_info()
        .map(|info| {
            info.scalars()
                .map(|(key, value)| (format!("info_{}", key), value))
                .collect()
        })
        .unwrap_or_default()
}
