use super::config::Config;
use super::constants;
use super::constants::{
    CG_PROJECTS_PATH, INFO_PATH, MAX_ERRORS, PLAYLISTS_PATH, POLL_PATH, THUMBNAIL_PATH,
};
use super::error::{ApiError, ClientError, Error, Result};
use super::panel::{self, Feedback, Health, Host};

mod cache;
mod client;
mod command;
mod info;
mod monitor;
mod response;

pub use self::cache::{Choices, Generation, StateCache};
pub use self::client::{Client, Reply, Transport};
pub use self::command::{CgVerb, Collection, Command, Position, PositionKind, Route, Target};
pub use self::info::{CgProject, Clip, PlaybackStatus, Playlist, PlaylistStub, SystemInfo};
pub use self::monitor::{ConnectionState, Monitor, Transition};

use self::response::Response;
use reqwest::Method;
use serde_json::{Map, Value};
use tokio::sync::Notify;
use tokio::task::{self, JoinHandle};
use tokio::time;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// An OnTheAir Video server, as seen from one panel instance
///
/// Owns the connection monitor, the state cache and the single poll timer, and
/// pushes everything the panel shows through its [`Host`].
///
/// Cloning `Player` is zero-cost but not thread safe. [`start()`](Self::start)
/// and the refresh methods spawn local tasks, so the player must be driven from
/// inside a [`tokio::task::LocalSet`].
#[derive(Clone)]
pub struct Player {
    inner: Rc<PlayerRef>,
}

impl Player {
    /// Create a player talking HTTP to the server in `config`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use ontheair::{Config, Player};
    /// # use ontheair::panel::{schema::*, Health, Host, Variables};
    /// # use std::rc::Rc;
    /// # struct Panel;
    /// # impl Host for Panel {
    /// #     fn set_status(&self, _: Health, _: Option<&str>) {}
    /// #     fn set_variable_definitions(&self, _: Vec<VariableDefinition>) {}
    /// #     fn set_variable_values(&self, _: Variables) {}
    /// #     fn set_action_definitions(&self, _: Vec<ActionDefinition>) {}
    /// #     fn set_feedback_definitions(&self, _: Vec<FeedbackDefinition>) {}
    /// #     fn set_preset_definitions(&self, _: Vec<PresetDefinition>) {}
    /// #     fn check_feedbacks(&self) {}
    /// # }
    /// # async fn run() -> Result<(), ontheair::Error> {
    /// let config = Config::from_value(serde_json::json!({ "host": "192.168.0.40", "port": 8081 }))?;
    /// let player = Player::new(config, Rc::new(Panel))?;
    /// player.start();
    ///
    /// player.run_action("play", serde_json::json!({ "playlist": "0" }).as_object().unwrap()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: Config, host: Rc<dyn Host>) -> Result<Self> {
        let transport = Rc::new(Client::new(config)?);
        Ok(Self::with_transport(config, transport, host))
    }

    /// Create a player over any [`Transport`]
    pub fn with_transport(config: Config, transport: Rc<dyn Transport>, host: Rc<dyn Host>) -> Self {
        Self {
            inner: Rc::new(PlayerRef {
                config: Cell::new(config),
                transport,
                host,
                monitor: RefCell::new(Monitor::new()),
                cache: RefCell::new(StateCache::new()),
                rearm: Rc::new(Notify::new()),
                timer: RefCell::new(None),
            }),
        }
    }

    /// Publish every definition and start probing the server
    ///
    /// # Panics
    ///
    /// Panics when called outside a [`LocalSet`](tokio::task::LocalSet).
    pub fn start(&self) {
        log::info!("Starting player for {}", self.config().base_url());
        self.set_status(Health::Connecting, Some("Waiting"));

        self.publish_actions();
        self.publish_variable_definitions();
        self.inner
            .host
            .set_feedback_definitions(panel::feedback_definitions());
        self.inner
            .host
            .set_preset_definitions(panel::preset_definitions(self.inner.host.label()));

        self.inner.monitor.borrow_mut().start();

        let handle = task::spawn_local(run_timer(
            Rc::downgrade(&self.inner),
            self.inner.rearm.clone(),
        ));
        if let Some(old) = self.inner.timer.replace(Some(handle)) {
            old.abort();
        }
    }

    /// Stop the timer and drop in-flight rebuild results
    pub fn shutdown(&self) {
        log::debug!("Shutting down player for {}", self.config().base_url());
        if let Some(handle) = self.inner.timer.take() {
            handle.abort();
        }
        self.inner.cache.borrow_mut().abandon_rebuilds();
    }

    /// Apply a new configuration
    ///
    /// The connection is only restarted when host or port changed.
    pub fn reconfigure(&self, config: Config) {
        let old = self.inner.config.replace(config);
        if old == config {
            log::debug!("Config unchanged, keeping connection");
            return;
        }

        log::info!("Reconfigured: {} -> {}", old.base_url(), config.base_url());
        self.inner.transport.set_config(config);
        self.inner.cache.borrow_mut().abandon_rebuilds();
        self.set_status(Health::Connecting, Some("Waiting..."));
        self.restart_monitor();
    }

    pub fn config(&self) -> Config {
        self.inner.config.get()
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.monitor.borrow().state()
    }

    pub fn error_count(&self) -> u32 {
        self.inner.monitor.borrow().error_count()
    }

    /// Latest `playback/playing` snapshot
    pub fn playing(&self) -> Option<PlaybackStatus> {
        self.inner.cache.borrow().playing().cloned()
    }

    pub fn playlists(&self) -> Vec<Playlist> {
        self.inner.cache.borrow().playlists().to_vec()
    }

    pub fn cg_projects(&self) -> Vec<CgProject> {
        self.inner.cache.borrow().cg_projects().to_vec()
    }

    pub fn system_info(&self) -> Option<SystemInfo> {
        self.inner.cache.borrow().system_info().cloned()
    }

    pub fn choices(&self) -> Choices {
        self.inner.cache.borrow().choices()
    }

    /// Request `playback/playing` once and publish the snapshot if it changed
    pub async fn poll(&self) -> Result<()> {
        let result = self.request(POLL_PATH).await;
        let res = match self.process(result)? {
            Some(res) => res,
            None => return Ok(()),
        };
        let status = res.playback_status()?;

        let changed = self.inner.cache.borrow().playing() != Some(&status);
        if changed {
            let values = panel::status_values(&status);
            self.inner.cache.borrow_mut().apply_status_snapshot(status);
            self.inner.host.set_variable_values(values);
            self.inner.host.check_feedbacks();
        }
        Ok(())
    }

    /// Run the panel action `id` with the options the panel sent
    pub async fn run_action(&self, id: &str, options: &Map<String, Value>) -> Result<()> {
        let command = Command::from_options(id, options).map_err(|e| {
            log::warn!("Rejected action '{}': {}", id, e);
            e
        })?;
        self.dispatch(&command).await
    }

    /// Send one command, then poll so feedbacks catch up
    pub async fn dispatch(&self, command: &Command) -> Result<()> {
        let route = {
            let cache = self.inner.cache.borrow();
            command.route(cache.playing())?
        };

        let path = match route {
            Route::Refresh(collection) => return self.refresh(collection).await,
            Route::Request(path) => path,
        };

        log::debug!("Action {} -> {}", command.id(), path);
        let result = self.request(&path).await;
        let unreachable = result.is_err();
        let outcome = self.process(result);

        if !unreachable {
            if let Err(e) = self.poll().await {
                log::debug!("Follow-up poll failed: {}", e);
            }
        }
        outcome.map(|_| ())
    }

    /// Whether feedback `id` with `options` is currently true
    pub fn evaluate_feedback(&self, id: &str, options: &Map<String, Value>) -> Result<bool> {
        let feedback = Feedback::from_options(id, options)?;
        Ok(feedback.evaluate(self.inner.cache.borrow().playing()))
    }

    /// Current output frame as an encoded image
    pub async fn thumbnail(&self) -> Result<Vec<u8>> {
        self.inner.transport.download(THUMBNAIL_PATH).await
    }

    pub async fn refresh(&self, collection: Collection) -> Result<()> {
        match collection {
            Collection::Playlists => self.refresh_playlists().await,
            Collection::CgProjects => self.refresh_cg_projects().await,
            Collection::SystemInfo => self.refresh_system_info().await,
        }
    }

    /// Refetch every collection concurrently
    pub async fn refresh_all(&self) -> Result<()> {
        let handles: Vec<JoinHandle<Result<()>>> = [
            Collection::Playlists,
            Collection::CgProjects,
            Collection::SystemInfo,
        ]
        .iter()
        .map(|collection| {
            let player = self.clone();
            let collection = *collection;
            task::spawn_local(async move { player.refresh(collection).await })
        })
        .collect();

        let mut first_error = None;
        for handle in handles {
            let res = handle
                .await
                .map_err(|e| Error::Other(e.to_string()))
                .and_then(|res| res);
            if let Err(e) = res {
                log::warn!("Refresh failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Rebuild the playlist tree
    ///
    /// Lists the playlists, then fetches every playlist's clips concurrently.
    /// Clip lists are merged by playlist id in whatever order they arrive; a
    /// newer rebuild discards anything still in flight from this one.
    pub async fn refresh_playlists(&self) -> Result<()> {
        let generation = self.inner.cache.borrow_mut().begin_playlist_rebuild();
        self.publish_playlists();

        let stubs = self.fetch(PLAYLISTS_PATH).await?.playlists()?;
        let ids: Vec<String> = stubs.iter().map(|stub| stub.unique_id.clone()).collect();
        if !self
            .inner
            .cache
            .borrow_mut()
            .apply_playlist_stubs(generation, stubs)
        {
            return Ok(());
        }
        log::info!("Found {} playlists", ids.len());
        self.publish_playlists();

        let handles: Vec<JoinHandle<()>> = ids
            .into_iter()
            .map(|id| {
                let player = self.clone();
                task::spawn_local(async move {
                    if let Err(e) = player.refresh_clips(generation, &id).await {
                        log::warn!("Could not fetch clips of playlist '{}': {}", id, e);
                    }
                })
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                log::error!("Clip fetch task failed: {}", e);
            }
        }
        Ok(())
    }

    async fn refresh_clips(&self, generation: Generation, playlist_id: &str) -> Result<()> {
        let path = format!("{}/{}/items", PLAYLISTS_PATH, command::segment(playlist_id));
        let clips = self.fetch(&path).await?.clips()?;
        log::debug!("{} clips in playlist '{}'", clips.len(), playlist_id);

        let merged = self
            .inner
            .cache
            .borrow_mut()
            .apply_clips(generation, playlist_id, clips);
        if merged {
            self.publish_playlists();
        }
        Ok(())
    }

    pub async fn refresh_cg_projects(&self) -> Result<()> {
        let projects = self.fetch(CG_PROJECTS_PATH).await?.cg_projects()?;
        log::info!("Found {} CG projects", projects.len());
        self.inner.cache.borrow_mut().replace_cg_projects(projects);
        self.publish_actions();
        Ok(())
    }

    pub async fn refresh_system_info(&self) -> Result<()> {
        let info = self.fetch(INFO_PATH).await?.system_info()?;
        log::info!("Server lists {} actions", info.available_actions.len());
        self.inner.cache.borrow_mut().replace_system_info(info);

        self.publish_variable_definitions();
        let values = panel::system_values(&self.inner.cache.borrow());
        self.inner.host.set_variable_values(values);
        self.publish_actions();
        Ok(())
    }

    async fn request(&self, path: &str) -> Result<Reply> {
        log::trace!("Sending request: {}{}", self.config().base_url(), path);
        self.inner.transport.request(Method::GET, path, None).await
    }

    /// GET `path`, insisting on a 200 body
    async fn fetch(&self, path: &str) -> Result<Response> {
        let result = self.request(path).await;
        self.process(result)?
            .ok_or_else(|| ClientError::Message(format!("No data returned for '{}'", path)).into())
    }

    /// Classify one result and drive health and the monitor from it
    ///
    /// Returns the body of a 200, `None` for 201 and 202. Rejections (400,
    /// 404, 422) only log; transport errors and unexpected codes count toward
    /// the disconnect threshold.
    fn process(&self, result: Result<Reply>) -> Result<Option<Response>> {
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Connection failed ({})", e);
                self.set_status(Health::Error, Some("NOT CONNECTED"));
                self.failure();
                return Err(e);
            }
        };

        let status = reply.status;
        let path = reply.path.clone();

        match response::process(reply) {
            Ok(res) => {
                self.set_status(Health::Ok, None);
                let transition = self.inner.monitor.borrow_mut().on_success();
                if transition == Transition::Connected {
                    self.on_connected();
                }

                match status {
                    200 => Ok(Some(res)),
                    201 => {
                        log::debug!("Created: {}", path);
                        Ok(None)
                    }
                    _ => {
                        log::debug!("Accepted: {}", path);
                        Ok(None)
                    }
                }
            }
            Err(Error::Api(e)) if e.is_bad_status() => {
                log::warn!("{} ({})", e, path);
                Err(e.into())
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("{} ({})", message, path);
                self.set_status(Health::Error, Some(&message));
                self.failure();
                Err(e)
            }
        }
    }

    fn failure(&self) {
        let transition = self.inner.monitor.borrow_mut().on_failure();
        if transition == Transition::Lost {
            log::warn!("{} errors in a row, probing for the server again", MAX_ERRORS);
            self.restart_monitor();
        }
    }

    fn on_connected(&self) {
        log::info!("Connected to {}", self.config().base_url());
        self.inner.rearm.notify_one();

        let player = self.clone();
        task::spawn_local(async move {
            let _ = player.refresh_all().await;
        });
    }

    fn restart_monitor(&self) {
        self.inner.monitor.borrow_mut().start();
        self.inner.rearm.notify_one();
    }

    fn set_status(&self, health: Health, message: Option<&str>) {
        self.inner.host.set_status(health, message);
    }

    fn publish_actions(&self) {
        let choices = self.inner.cache.borrow().choices();
        self.inner
            .host
            .set_action_definitions(panel::action_definitions(&choices));
    }

    fn publish_variable_definitions(&self) {
        let definitions = panel::variable_definitions(&self.inner.cache.borrow());
        self.inner.host.set_variable_definitions(definitions);
    }

    fn publish_playlists(&self) {
        self.publish_variable_definitions();
        let values = panel::playlist_values(&self.inner.cache.borrow());
        self.inner.host.set_variable_values(values);
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("config", &self.inner.config.get())
            .field("monitor", &self.inner.monitor.borrow())
            .field("generation", &self.inner.cache.borrow().generation())
            .finish()
    }
}

struct PlayerRef {
    config: Cell<Config>,
    transport: Rc<dyn Transport>,
    host: Rc<dyn Host>,
    monitor: RefCell<Monitor>,
    cache: RefCell<StateCache>,
    rearm: Rc<Notify>,
    timer: RefCell<Option<JoinHandle<()>>>,
}

impl Drop for PlayerRef {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}

/// The one probe/poll timer
///
/// Each tick spawns a poll, so a slow server never delays the next tick.
/// A `rearm` notification rebuilds the interval with the monitor's current
/// period. Exits once the player is dropped.
async fn run_timer(player: Weak<PlayerRef>, rearm: Rc<Notify>) {
    loop {
        let period = match player.upgrade() {
            Some(inner) => inner.monitor.borrow().period(),
            None => return,
        };
        log::debug!("Timer armed every {:?}", period);
        let mut interval = time::interval(period);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let inner = match player.upgrade() {
                        Some(inner) => inner,
                        None => return,
                    };
                    let player = Player { inner };
                    task::spawn_local(async move {
                        if let Err(e) = player.poll().await {
                            log::trace!("Poll failed: {}", e);
                        }
                    });
                }
                _ = rearm.notified() => break,
            }
        }
    }
}

