use super::SimulatedServer;

use serde_json::{json, Value};
use http::StatusCode;
use warp::reply::Response;
use warp::Reply;

use std::sync::RwLock;

const PLAYBACK_VERBS: [&str; 7] = [
    "play",
    "pause",
    "resume",
    "stop",
    "skip_next",
    "skip_previous",
    "join_in_progress",
];

fn json_reply(status: u16, value: &Value) -> Response {
    warp::reply::with_status(
        warp::reply::json(value),
        StatusCode::from_u16(status).unwrap(),
    )
    .into_response()
}

fn error(status: u16, message: &str) -> Response {
    json_reply(status, &json!({ "error": message }))
}

fn accepted() -> Response {
    json_reply(202, &json!({}))
}

/// Clone out of the lock so no guard is held by the reply future
fn snapshot(value: &RwLock<Value>) -> Value {
    value.read().unwrap().clone()
}

fn decode(text: &str) -> String {
    url::form_urlencoded::parse(format!("v={}", text).as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

fn query_param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Playlists are addressed by unique id, name or index
fn find_playlist(server: &SimulatedServer, key: &str) -> Option<usize> {
    let key = decode(key);
    let playlists = server.inner.playlists.read().unwrap();
    playlists
        .iter()
        .position(|p| p.id == key || p.name == key)
        .or_else(|| key.parse::<usize>().ok().filter(|i| *i < playlists.len()))
}

fn apply_verb(server: &SimulatedServer, verb: &str) {
    let (status, item) = match verb {
        "play" | "resume" | "join_in_progress" => ("Playing", "playing"),
        "pause" => ("Paused", "paused"),
        "stop" => ("Stopped", "stopped"),
        _ => return,
    };
    let mut playing = server.inner.playing.write().unwrap();
    playing["playback_status"] = json!(status);
    playing["item_playback_status"] = json!(item);
}

pub async fn respond(server: SimulatedServer, path: String, query: String) -> Response {
    server.record(&path, &query);

    let forced = *server.inner.forced_status.read().unwrap();
    if let Some(status) = forced {
        return error(status, "forced");
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match segments.as_slice() {
        ["playback", "playing"] => json_reply(200, &snapshot(&server.inner.playing)),

        ["playback", "thumbnail"] => warp::reply::with_header(
            vec![0x89u8, b'P', b'N', b'G'],
            "Content-Type",
            "image/png",
        )
        .into_response(),

        ["playback", "cg_projects"] => json_reply(200, &snapshot(&server.inner.cg_projects)),

        ["playback", "cg_projects", id, verb] => {
            let known = server
                .inner
                .cg_projects
                .read()
                .unwrap()
                .as_array()
                .map(|list| list.iter().any(|p| p["unique_id"] == json!(decode(id))))
                .unwrap_or(false);
            match (known, ["play", "pause", "stop"].contains(verb)) {
                (true, true) => accepted(),
                (false, _) => error(404, "CG project not found"),
                (_, false) => error(400, "Unknown CG command"),
            }
        }

        ["playback", "gpi_trigger"] => match query_param(&query, "input").and_then(|i| i.parse::<u8>().ok()) {
            Some(input) if (1..=25).contains(&input) => accepted(),
            _ => error(400, "Invalid GPI input"),
        },

        ["playback", "cue_trigger"] => accepted(),

        ["playback", verb] if PLAYBACK_VERBS.contains(verb) => {
            apply_verb(&server, verb);
            accepted()
        }

        ["playlists"] => {
            let list: Vec<Value> = server
                .inner
                .playlists
                .read()
                .unwrap()
                .iter()
                .map(|p| json!({ "unique_id": p.id, "name": p.name }))
                .collect();
            json_reply(200, &Value::Array(list))
        }

        ["playlists", id, "items"] => {
            let found = find_playlist(&server, id).map(|i| {
                let playlists = server.inner.playlists.read().unwrap();
                (playlists[i].delay, playlists[i].clips.clone())
            });
            match found {
                Some((delay, clips)) => {
                    tokio::time::sleep(delay).await;
                    json_reply(200, &Value::Array(clips))
                }
                None => error(404, "Playlist not found"),
            }
        }

        ["playlists", id, verb] | ["playlists", id, "items", _, verb] => {
            if find_playlist(&server, id).is_none() {
                return error(404, "Playlist not found");
            }
            if !PLAYBACK_VERBS.contains(verb) {
                return error(400, "Unknown playlist command");
            }
            apply_verb(&server, verb);
            accepted()
        }

        ["info"] => json_reply(200, &snapshot(&server.inner.info)),

        ["actions", name, "run"] => {
            let name = decode(name);
            let known = server.inner.info.read().unwrap()["available_actions"]
                .as_array()
                .map(|list| list.iter().any(|a| a == &json!(name)))
                .unwrap_or(false);
            if known {
                accepted()
            } else {
                error(404, "Action not found")
            }
        }

        _ => error(404, "Not found"),
    }
}
