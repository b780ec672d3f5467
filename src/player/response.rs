use super::client::Reply;
use super::info::{CgProject, Clip, PlaybackStatus, PlaylistStub, SystemInfo};
use super::{ApiError, Result};

use serde_json::Value;

/// Body of an accepted reply
#[derive(Debug)]
pub struct Response {
    pub value: Value,
}

impl Response {
    pub fn playback_status(&self) -> Result<PlaybackStatus> {
        Ok(serde_json::from_value(self.value.clone())?)
    }
    pub fn playlists(&self) -> Result<Vec<PlaylistStub>> {
        Ok(serde_json::from_value(list(&self.value, "playlists"))?)
    }
    pub fn clips(&self) -> Result<Vec<Clip>> {
        Ok(serde_json::from_value(list(&self.value, "items"))?)
    }
    pub fn cg_projects(&self) -> Result<Vec<CgProject>> {
        Ok(serde_json::from_value(list(&self.value, "cg_projects"))?)
    }
    pub fn system_info(&self) -> Result<SystemInfo> {
        Ok(serde_json::from_value(self.value.clone())?)
    }
}

// Collections come back either as a bare array or wrapped in an object
fn list(value: &Value, key: &str) -> Value {
    match value {
        Value::Array(_) => value.clone(),
        Value::Object(map) => map
            .get(key)
            .filter(|v| v.is_array())
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    }
}

/// Map a reply's status code onto the accepted body or an [`ApiError`]
pub fn process(reply: Reply) -> Result<Response> {
    let message = reply.error_message();

    match reply.status {
        200 | 201 | 202 => {}
        400 => return Err(ApiError::BadRequest(message).into()),
        404 => return Err(ApiError::NotFound(message).into()),
        422 => return Err(ApiError::UnprocessableEntity(message).into()),
        code => return Err(ApiError::UnexpectedStatus(code, message).into()),
    }

    Ok(Response { value: reply.body })
}
