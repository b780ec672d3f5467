use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_TIMEOUT: u64 = 3;

pub const PROBE_INTERVAL: Duration = Duration::from_secs(10);
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const MAX_ERRORS: u32 = 10;

pub const POLL_PATH: &str = "playback/playing";
pub const PLAYLISTS_PATH: &str = "playlists";
pub const CG_PROJECTS_PATH: &str = "playback/cg_projects";
pub const INFO_PATH: &str = "info";
pub const THUMBNAIL_PATH: &str = "playback/thumbnail";

/// Instance label for hosts that do not name their instances
pub const DEFAULT_LABEL: &str = "ontheair";
