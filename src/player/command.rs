use super::info::PlaybackStatus;
use super::{ClientError, Error, Result};

use regex::Regex;
use serde_json::{Map, Value};

use std::fmt;

/// Which part of the running order a transport command addresses
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Whatever is currently on air
    Current,
    Playlist(String),
    Clip { playlist: String, clip: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionKind {
    RelativeTimecode,
    MediaTimecode,
    RelativeSeconds,
}

impl PositionKind {
    fn from_id(id: &str) -> Option<Self> {
        match id {
            "relativeTimecode" => Some(Self::RelativeTimecode),
            "mediaTimecode" => Some(Self::MediaTimecode),
            "relativeSeconds" => Some(Self::RelativeSeconds),
            _ => None,
        }
    }

    fn query_key(&self) -> &'static str {
        match self {
            Self::RelativeTimecode => "position_relative_timecode",
            Self::MediaTimecode => "position_media_timecode",
            Self::RelativeSeconds => "position_relative_seconds",
        }
    }
}

/// A validated cue point inside a clip
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    kind: PositionKind,
    value: String,
}

impl Position {
    /// Timecode kinds take `HH:MM:SS:FF` (or `;FF` for drop frame),
    /// `RelativeSeconds` takes decimal seconds.
    pub fn parse(kind: PositionKind, value: &str) -> Result<Self> {
        let value = value.trim();
        let pattern = match kind {
            PositionKind::RelativeTimecode | PositionKind::MediaTimecode => {
                r"^([01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9][:;][0-6][0-9]$"
            }
            PositionKind::RelativeSeconds => r"^[0-9]+(\.[0-9]+)?$",
        };

        let valid = Regex::new(pattern)
            .map_err(|e| Error::Other(e.to_string()))?
            .is_match(value);
        if !valid {
            return Err(Error::malformed_position(value));
        }

        Ok(Self {
            kind,
            value: value.to_string(),
        })
    }

    pub fn seconds(seconds: f64) -> Self {
        Self {
            kind: PositionKind::RelativeSeconds,
            value: format_seconds(seconds),
        }
    }

    pub fn kind(&self) -> PositionKind {
        self.kind
    }

    fn query(&self) -> String {
        format!("{}={}", self.kind.query_key(), self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgVerb {
    Play,
    Pause,
    Stop,
}

impl fmt::Display for CgVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
        })
    }
}

/// Cached collections a command can ask to have refetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Playlists,
    CgProjects,
    SystemInfo,
}

/// What dispatching a [`Command`] amounts to
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// One GET of this path, relative to the server root
    Request(String),
    Refresh(Collection),
}

/// Every action the panel can invoke, with its validated options
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play(Target),
    PlayPosition {
        playlist: String,
        clip: String,
        position: Position,
    },
    Pause(Target),
    PausePosition {
        playlist: String,
        clip: String,
        position: Position,
    },
    Resume(Option<String>),
    Stop(Option<String>),
    SkipNext(Option<String>),
    SkipPrevious(Option<String>),
    /// Jump to `seconds` before the end of the active clip, keeping its
    /// play/pause state
    GotoEndMinus {
        seconds: f64,
    },
    UpdatePlaylists,
    JoinInProgress(Target),
    GpiTrigger(u8),
    CueTrigger,
    Cg(CgVerb, String),
    UpdateCgProjects,
    RunAction {
        action: String,
        parameter: String,
    },
}

/// Typed access to the host's option bag for one action
struct Options<'a> {
    command: &'a str,
    map: &'a Map<String, Value>,
}

impl<'a> Options<'a> {
    /// Text or number as a trimmed string; missing and null read as empty
    fn text(&self, key: &str) -> Result<String> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.trim().to_string()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(other) => Err(Error::bad_option(self.command, key, other)),
        }
    }

    fn optional(&self, key: &str) -> Result<Option<String>> {
        let text = self.text(key)?;
        Ok(if text.is_empty() { None } else { Some(text) })
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)?
            .ok_or_else(|| Error::missing_option(self.command, key))
    }

    fn number(&self, key: &str) -> Result<f64> {
        let text = self.required(key)?;
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| Error::bad_option(self.command, key, &Value::String(text)))
    }

    fn target(&self) -> Result<Target> {
        Ok(match (self.optional("playlist")?, self.optional("clip")?) {
            (None, _) => Target::Current,
            (Some(playlist), None) => Target::Playlist(playlist),
            (Some(playlist), Some(clip)) => Target::Clip { playlist, clip },
        })
    }

    fn position(&self) -> Result<Position> {
        let kind_id = self.required("type")?;
        let kind = PositionKind::from_id(&kind_id)
            .ok_or_else(|| Error::bad_option(self.command, "type", &Value::String(kind_id)))?;
        Position::parse(kind, &self.required("position")?)
    }
}

impl Command {
    /// Parse a command from the action id and option values the panel sends
    ///
    /// ```
    /// # use ontheair::{Command, Route};
    /// let options = serde_json::json!({
    ///     "playlist": "2", "clip": "5", "type": "relativeSeconds", "position": "30"
    /// });
    /// let command = Command::from_options("playPosition", options.as_object().unwrap()).unwrap();
    /// assert_eq!(
    ///     command.route(None).unwrap(),
    ///     Route::Request("playlists/2/items/5/play?position_relative_seconds=30".into())
    /// );
    /// ```
    pub fn from_options(id: &str, options: &Map<String, Value>) -> Result<Self> {
        let opt = Options {
            command: id,
            map: options,
        };

        Ok(match id {
            "play" => Command::Play(opt.target()?),
            "playPosition" => Command::PlayPosition {
                playlist: opt.required("playlist")?,
                clip: opt.required("clip")?,
                position: opt.position()?,
            },
            "pause" => Command::Pause(opt.target()?),
            "pausePosition" => Command::PausePosition {
                playlist: opt.required("playlist")?,
                clip: opt.required("clip")?,
                position: opt.position()?,
            },
            "resume" => Command::Resume(opt.optional("playlist")?),
            "stop" => Command::Stop(opt.optional("playlist")?),
            "skipNext" => Command::SkipNext(opt.optional("playlist")?),
            "skipPrevious" => Command::SkipPrevious(opt.optional("playlist")?),
            "gotoEndMinus" => {
                let seconds = opt.number("tMinus")?;
                if seconds < 0.0 {
                    return Err(Error::bad_option(id, "tMinus", &Value::from(seconds)));
                }
                Command::GotoEndMinus { seconds }
            }
            "updatePlaylists" => Command::UpdatePlaylists,
            "joinInProgress" => Command::JoinInProgress(opt.target()?),
            "gpiTrigger" => {
                let input = opt.number("input")?;
                if input.fract() != 0.0 || !(1.0..=25.0).contains(&input) {
                    return Err(Error::bad_option(id, "input", &Value::from(input)));
                }
                Command::GpiTrigger(input as u8)
            }
            "cueTrigger" => Command::CueTrigger,
            "cgPlay" => Command::Cg(CgVerb::Play, opt.required("project")?),
            "cgPause" => Command::Cg(CgVerb::Pause, opt.required("project")?),
            "cgStop" => Command::Cg(CgVerb::Stop, opt.required("project")?),
            "updateCGProjects" => Command::UpdateCgProjects,
            "runAction" => Command::RunAction {
                action: opt.required("action")?,
                parameter: opt.text("parameter")?,
            },
            other => return Err(Error::unknown_command(other)),
        })
    }

    /// The panel's action id
    pub fn id(&self) -> &'static str {
        match self {
            Self::Play(_) => "play",
            Self::PlayPosition { .. } => "playPosition",
            Self::Pause(_) => "pause",
            Self::PausePosition { .. } => "pausePosition",
            Self::Resume(_) => "resume",
            Self::Stop(_) => "stop",
            Self::SkipNext(_) => "skipNext",
            Self::SkipPrevious(_) => "skipPrevious",
            Self::GotoEndMinus { .. } => "gotoEndMinus",
            Self::UpdatePlaylists => "updatePlaylists",
            Self::JoinInProgress(_) => "joinInProgress",
            Self::GpiTrigger(_) => "gpiTrigger",
            Self::CueTrigger => "cueTrigger",
            Self::Cg(CgVerb::Play, _) => "cgPlay",
            Self::Cg(CgVerb::Pause, _) => "cgPause",
            Self::Cg(CgVerb::Stop, _) => "cgStop",
            Self::UpdateCgProjects => "updateCGProjects",
            Self::RunAction { .. } => "runAction",
        }
    }

    /// Resolve the request this command makes. `playing` is only consulted by
    /// [`GotoEndMinus`](Command::GotoEndMinus).
    pub fn route(&self, playing: Option<&PlaybackStatus>) -> Result<Route> {
        let path = match self {
            Self::Play(target) => target_path(target, "play"),
            Self::Pause(target) => target_path(target, "pause"),
            Self::JoinInProgress(target) => target_path(target, "join_in_progress"),
            Self::PlayPosition {
                playlist,
                clip,
                position,
            } => positioned_path(playlist, clip, "play", position),
            Self::PausePosition {
                playlist,
                clip,
                position,
            } => positioned_path(playlist, clip, "pause", position),
            Self::Resume(playlist) => playlist_path(playlist, "resume"),
            Self::Stop(playlist) => playlist_path(playlist, "stop"),
            Self::SkipNext(playlist) => playlist_path(playlist, "skip_next"),
            Self::SkipPrevious(playlist) => playlist_path(playlist, "skip_previous"),
            Self::GotoEndMinus { seconds } => goto_end_minus(playing, *seconds)?,
            Self::GpiTrigger(input) => format!("playback/gpi_trigger?input={}", input),
            Self::CueTrigger => "playback/cue_trigger".to_string(),
            Self::Cg(verb, project) => format!("playback/cg_projects/{}/{}", segment(project), verb),
            Self::RunAction { action, parameter } => format!(
                "actions/{}/run?parameter={}",
                segment(action),
                encode(parameter)
            ),
            Self::UpdatePlaylists => return Ok(Route::Refresh(Collection::Playlists)),
            Self::UpdateCgProjects => return Ok(Route::Refresh(Collection::CgProjects)),
        };
        Ok(Route::Request(path))
    }
}

fn target_path(target: &Target, verb: &str) -> String {
    match target {
        Target::Current => format!("playback/{}", verb),
        Target::Playlist(playlist) => format!("playlists/{}/{}", segment(playlist), verb),
        Target::Clip { playlist, clip } => format!(
            "playlists/{}/items/{}/{}",
            segment(playlist),
            segment(clip),
            verb
        ),
    }
}

fn playlist_path(playlist: &Option<String>, verb: &str) -> String {
    match playlist {
        None => format!("playback/{}", verb),
        Some(playlist) => format!("playlists/{}/{}", segment(playlist), verb),
    }
}

fn positioned_path(playlist: &str, clip: &str, verb: &str, position: &Position) -> String {
    format!(
        "playlists/{}/items/{}/{}?{}",
        segment(playlist),
        segment(clip),
        verb,
        position.query()
    )
}

fn goto_end_minus(playing: Option<&PlaybackStatus>, seconds: f64) -> Result<String> {
    let status = playing.ok_or(ClientError::NothingPlaying)?;
    let verb = if status.item_is_playing() {
        "play"
    } else if status.item_is_paused() {
        "pause"
    } else {
        return Err(ClientError::NothingPlaying.into());
    };

    match (&status.playlist_index, &status.item_index, status.item_duration) {
        (Some(playlist), Some(clip), Some(duration)) => Ok(positioned_path(
            playlist,
            clip,
            verb,
            &Position::seconds((duration - seconds).max(0.0)),
        )),
        _ => Err(ClientError::NothingPlaying.into()),
    }
}

/// Percent-encode one path segment or query value, spaces as `%20`
fn encode(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Names may contain `/`, `?` or `#`, so they are encoded as one path segment
pub(super) fn segment(text: &str) -> String {
    encode(text)
}

fn format_seconds(seconds: f64) -> String {
    if seconds.fract() == 0.0 {
        format!("{}", seconds as i64)
    } else {
        format!("{}", seconds)
    }
}
