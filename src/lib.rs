//! # ontheair
//!
//! Monitor and control a Softron OnTheAir Video playout server from a button
//! panel.
//!
//! A [`Player`] probes the server's REST API until it answers, then polls the
//! playback status every second, mirrors playlists, CG projects and system
//! info, and republishes variables and feedbacks to its [`Host`](panel::Host).
//! Panel actions are parsed into [`Command`]s and sent as single requests.
//!
//! ```no_run
//! # use ontheair::{Command, Player};
//! # async fn skip(player: &Player) -> Result<(), ontheair::Error> {
//! let options = serde_json::json!({ "playlist": "1" });
//! let command = Command::from_options("skipNext", options.as_object().unwrap())?;
//! player.dispatch(&command).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod constants;
mod error;
mod player;

pub mod panel;

pub use config::Config;
pub use constants::{DEFAULT_PORT, MAX_ERRORS, POLL_INTERVAL, PROBE_INTERVAL};
pub use error::{ApiError, ClientError, Error, Result};
pub use player::{
    CgProject, CgVerb, Choices, Client, Clip, Collection, Command, ConnectionState, Generation,
    Monitor, PlaybackStatus, Player, Playlist, PlaylistStub, Position, PositionKind, Reply, Route,
    StateCache, SystemInfo, Target, Transition, Transport,
};
