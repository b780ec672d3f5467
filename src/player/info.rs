use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Snapshot of `playback/playing`
///
/// Every field is optional; the server omits playlist and item details while
/// stopped. Fields this crate does not model are kept in `extra`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PlaybackStatus {
    #[serde(default)]
    pub playback_status: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub playlist_index: Option<String>,
    #[serde(default)]
    pub playlist_display_name: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub item_index: Option<String>,
    #[serde(default)]
    pub item_display_name: Option<String>,
    #[serde(default)]
    pub item_playback_status: Option<String>,
    #[serde(default)]
    pub playlist_duration: Option<f64>,
    #[serde(default)]
    pub playlist_elapsed: Option<f64>,
    #[serde(default)]
    pub playlist_remaining: Option<f64>,
    #[serde(default)]
    pub item_duration: Option<f64>,
    #[serde(default)]
    pub item_elapsed: Option<f64>,
    #[serde(default)]
    pub item_remaining: Option<f64>,
    #[serde(default)]
    pub story: Option<Value>,
    #[serde(default)]
    pub file: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlaybackStatus {
    /// Whether the active item is rolling
    pub fn item_is_playing(&self) -> bool {
        matches!(self.item_playback_status.as_deref(), Some(s) if s.eq_ignore_ascii_case("playing"))
    }

    /// Whether the active item is cued but held
    pub fn item_is_paused(&self) -> bool {
        matches!(self.item_playback_status.as_deref(), Some(s) if s.eq_ignore_ascii_case("paused"))
    }
}

/// Playlist identity as listed by `playlists`, before its items are known
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlaylistStub {
    #[serde(alias = "id", deserialize_with = "string_or_number")]
    pub unique_id: String,
    #[serde(default)]
    pub name: String,
}

/// One item of a playlist, from `playlists/{id}/items`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Clip {
    #[serde(default, alias = "display_name")]
    pub name: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(flatten)]
    pub raw: Map<String, Value>,
}

/// A playlist and the clips it holds
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub label: String,
    pub clips: Vec<Clip>,
}

impl From<PlaylistStub> for Playlist {
    fn from(stub: PlaylistStub) -> Self {
        Playlist {
            id: stub.unique_id,
            label: stub.name,
            clips: Vec::new(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
/// Character generator project listed by `playback/cg_projects`
pub struct CgProject {
    #[serde(alias = "unique_id", alias = "uid", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, alias = "display_name")]
    pub name: String,
}

/// Server details from `info`
///
/// Scalar fields are exposed as panel variables. `available_actions` lists the
/// scripts `actions/{name}/run` accepts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemInfo {
    pub available_actions: Vec<String>,
    pub fields: Map<String, Value>,
}

impl SystemInfo {
    /// Scalar fields rendered as text, in key order
    pub fn scalars(&self) -> impl Iterator<Item = (&str, String)> {
        self.fields.iter().filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.as_str(), text))
        })
    }
}

impl<'de> Deserialize<'de> for SystemInfo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;

        // Actions come either as plain names or as objects with a name
        let available_actions = match fields
            .remove("available_actions")
            .or_else(|| fields.remove("actions"))
        {
            Some(Value::Array(list)) => list
                .into_iter()
                .filter_map(|action| match action {
                    Value::String(name) => Some(name),
                    Value::Object(mut obj) => match obj.remove("name") {
                        Some(Value::String(name)) => Some(name),
                        _ => None,
                    },
                    _ => None,
                })
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(_) => return Err(de::Error::custom("available_actions is not a list")),
        };

        Ok(SystemInfo {
            available_actions,
            fields,
        })
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(de::Error::custom("expected a string or number")),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(de::Error::custom("expected a string or number")),
    }
}
