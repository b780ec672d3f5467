use super::info::{CgProject, Clip, PlaybackStatus, Playlist, PlaylistStub, SystemInfo};
use crate::panel::schema::Choice;

/// Tag of one playlist rebuild; fetches from an older rebuild are dropped
pub type Generation = u64;

/// In-memory mirror of the server
#[derive(Debug, Default)]
pub struct StateCache {
    playing: Option<PlaybackStatus>,
    playlists: Vec<Playlist>,
    generation: Generation,
    cg_projects: Vec<CgProject>,
    system_info: Option<SystemInfo>,
}

/// Dropdown choices derived from the fetched collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choices {
    pub cg_projects: Vec<Choice>,
    pub actions: Vec<Choice>,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playing(&self) -> Option<&PlaybackStatus> {
        self.playing.as_ref()
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn cg_projects(&self) -> &[CgProject] {
        &self.cg_projects
    }

    pub fn system_info(&self) -> Option<&SystemInfo> {
        self.system_info.as_ref()
    }

    pub fn available_actions(&self) -> &[String] {
        self.system_info
            .as_ref()
            .map(|info| info.available_actions.as_slice())
            .unwrap_or_default()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Replace the status snapshot wholesale
    pub fn apply_status_snapshot(&mut self, status: PlaybackStatus) {
        self.playing = Some(status);
    }

    /// Drop the playlist tree and start a new rebuild
    pub fn begin_playlist_rebuild(&mut self) -> Generation {
        self.playlists.clear();
        self.generation += 1;
        log::debug!("Playlist rebuild {} started", self.generation);
        self.generation
    }

    /// Invalidate in-flight rebuild fetches without touching the tree
    pub fn abandon_rebuilds(&mut self) {
        self.generation += 1;
    }

    /// Install the stub list of rebuild `generation`. Returns false if a newer
    /// rebuild has started since.
    pub fn apply_playlist_stubs(&mut self, generation: Generation, stubs: Vec<PlaylistStub>) -> bool {
        if generation != self.generation {
            log::debug!(
                "Dropping playlist list from rebuild {} (current {})",
                generation,
                self.generation
            );
            return false;
        }
        self.playlists = stubs.into_iter().map(Playlist::from).collect();
        true
    }

    /// Merge the clips of one playlist by id. Returns false when the fetch is
    /// stale or the playlist is unknown.
    pub fn apply_clips(&mut self, generation: Generation, playlist_id: &str, clips: Vec<Clip>) -> bool {
        if generation != self.generation {
            log::debug!(
                "Dropping clips of '{}' from rebuild {} (current {})",
                playlist_id,
                generation,
                self.generation
            );
            return false;
        }

        match self.playlists.iter_mut().find(|p| p.id == playlist_id) {
            Some(playlist) => {
                playlist.clips.extend(clips);
                true
            }
            None => {
                log::warn!("Clips for unknown playlist '{}'", playlist_id);
                false
            }
        }
    }

    pub fn replace_cg_projects(&mut self, projects: Vec<CgProject>) {
        self.cg_projects = projects;
    }

    pub fn replace_system_info(&mut self, info: SystemInfo) {
        self.system_info = Some(info);
    }

    /// Recomputed from the backing collections on every call
    pub fn choices(&self) -> Choices {
        Choices {
            cg_projects: self
                .cg_projects
                .iter()
                .map(|project| Choice::new(project.id.clone(), project.name.clone()))
                .collect(),
            actions: self
                .available_actions()
                .iter()
                .map(|action| Choice::new(action.clone(), action.clone()))
                .collect(),
        }
    }
}
