/// `playback/playing` body while nothing is on air
#[macro_use]
macro_rules! stopped {
    () => {
        serde_json::from_str::<serde_json::Value>(indoc::indoc! {r#"
            {
                "playback_status": "Stopped",
                "playlist_index": null,
                "item_index": null
            }"#
        })
        .unwrap()
    };
}

/// `playback/playing` body with one clip rolling
#[macro_use]
macro_rules! playing {
    ($playlist:expr, $item:expr, $duration:expr, $remaining:expr) => {
        serde_json::from_str::<serde_json::Value>(&format!(
            indoc::indoc! {r#"
                {{
                    "playback_status": "Playing",
                    "playlist_index": {},
                    "playlist_display_name": "Playlist {}",
                    "item_index": {},
                    "item_display_name": "Clip {}",
                    "item_playback_status": "playing",
                    "item_duration": {},
                    "item_elapsed": {},
                    "item_remaining": {},
                    "playlist_duration": 3725,
                    "playlist_remaining": 3000,
                    "item_unique_id": "C-{}-{}"
                }}"#
            },
            $playlist,
            $playlist,
            $item,
            $item,
            $duration,
            $duration - $remaining,
            $remaining,
            $playlist,
            $item
        ))
        .unwrap()
    };
}

/// `info` body
#[macro_use]
macro_rules! system_info {
    ($($action:expr),*) => {
        serde_json::from_str::<serde_json::Value>(&format!(
            indoc::indoc! {r#"
                {{
                    "application_name": "OnTheAir Video",
                    "version": "4.2.1",
                    "channels": 1,
                    "available_actions": {}
                }}"#
            },
            serde_json::json!([$($action),*])
        ))
        .unwrap()
    };
}
