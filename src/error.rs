use std::fmt::Display;

use serde_json::Value;

/// Result for API calls from [`Player`](super::Player)
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Errors reported by the OnTheAir server
    Api(ApiError),
    /// Errors from [`Player`](super::Player) and its inputs
    Client(ClientError),
    /// Error from http client
    Reqwest(reqwest::Error),
    /// Error processing json
    Json(serde_json::Error),
    #[doc(hidden)]
    Other(String),
}

impl Error {
    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api(_))
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Error::Client(_))
    }

    pub fn is_reqwest(&self) -> bool {
        matches!(self, Error::Reqwest(_))
    }

    pub fn is_serde(&self) -> bool {
        matches!(self, Error::Json(_))
    }

    pub fn unknown_command(id: &str) -> Error {
        ClientError::UnknownCommand(id.into()).into()
    }

    pub fn missing_option(command: &str, option: &str) -> Error {
        ClientError::MissingOption(command.into(), option.into()).into()
    }

    pub fn bad_option(command: &str, option: &str, value: &Value) -> Error {
        ClientError::BadOption(command.into(), option.into(), value.clone()).into()
    }

    pub fn malformed_position(position: &str) -> Error {
        ClientError::MalformedPosition(position.into()).into()
    }
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        Error::Api(e)
    }
}

impl From<ClientError> for Error {
    fn from(e: ClientError) -> Self {
        Error::Client(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Reqwest(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Json(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        ClientError::BadUrl(e.to_string()).into()
    }
}

impl From<String> for Error {
    fn from(e: String) -> Error {
        Error::Other(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Api(e) => write!(f, "{}", e),
            Self::Client(e) => write!(f, "{}", e),
            Self::Reqwest(e) => write!(f, "{}", e),
            Self::Json(e) => write!(f, "{}", e),
            Self::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

/// HTTP outcomes from the OnTheAir server other than 200, 201 and 202
///
/// The `String` is the `error` message from the response body, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 400 - malformed command
    BadRequest(String),
    /// 404 - unknown playlist, clip or resource
    NotFound(String),
    /// 422 - command understood but refused in the current state
    UnprocessableEntity(String),
    /// Any status code outside the known set
    UnexpectedStatus(u16, String),
}

impl ApiError {
    /// Status codes the server uses to reject a single command. These never
    /// affect connection health.
    pub fn is_bad_status(&self) -> bool {
        !matches!(self, Self::UnexpectedStatus(..))
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad request: 400 - {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: 404 - {}", msg),
            Self::UnprocessableEntity(msg) => write!(f, "Unprocessable entity: 422 - {}", msg),
            Self::UnexpectedStatus(code, msg) => {
                write!(f, "Unexpected HTTP status code: {} - {}", code, msg)
            }
        }
    }
}

#[derive(Debug)]
pub enum ClientError {
    /// Configured host is not an IPv4 address
    BadHost(String),
    /// Configured port is outside 1-65535
    BadPort(i64),
    /// Base url could not be built
    BadUrl(String),
    /// Action id the dispatcher does not know
    UnknownCommand(String),
    /// Required action option was not supplied
    MissingOption(String, String),
    /// Action option has the wrong type or is out of range
    BadOption(String, String, Value),
    /// Position is neither `HH:MM:SS[:;]FF` nor decimal seconds
    MalformedPosition(String),
    /// Command needs an active clip but nothing is playing or paused
    NothingPlaying,
    #[doc(hidden)]
    Message(String),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::BadHost(host) => write!(f, "Host is not a valid IPv4 address: '{}'", host),

            Self::BadPort(port) => write!(f, "Port outside [1 <= x <= 65535]: {}", port),

            Self::BadUrl(e) => write!(f, "Could not build request url: {}", e),

            Self::UnknownCommand(id) => write!(f, "Unknown command: '{}'", id),

            Self::MissingOption(command, option) => {
                write!(f, "Command '{}' requires option '{}'", command, option)
            }

            Self::BadOption(command, option, value) => write!(
                f,
                "Command '{}' got a bad value for option '{}': {:?}",
                command, option, value
            ),

            Self::MalformedPosition(pos) => write!(
                f,
                "Position must be a timecode (HH:MM:SS:FF) or seconds, got '{}'",
                pos
            ),

            Self::NothingPlaying => write!(f, "No clip is currently playing or paused"),

            Self::Message(msg) => write!(f, "{}", msg),
        }
    }
}
