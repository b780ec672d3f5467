mod routes;

use serde_json::{json, Value};
use warp::{filters::BoxedFilter, Filter, Reply};

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

/// Playlist held by the simulated server
#[derive(Debug, Clone)]
pub struct SimulatedPlaylist {
    pub id: String,
    pub name: String,
    pub clips: Vec<Value>,
    /// How long `playlists/{id}/items` takes to answer
    pub delay: Duration,
}

impl SimulatedPlaylist {
    pub fn new(id: &str, name: &str, clips: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            clips: clips
                .iter()
                .enumerate()
                .map(|(i, clip)| json!({ "name": clip, "duration": 30 + i * 5, "unique_id": format!("{}-{}", id, i) }))
                .collect(),
            delay: Duration::from_millis(0),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// OnTheAir Video REST API the tests connect to
#[derive(Debug, Clone)]
pub struct SimulatedServer {
    inner: Arc<SimulatedServerRef>,
}

impl SimulatedServer {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SimulatedServerRef {
                requests: Mutex::new(Vec::new()),
                playing: RwLock::new(stopped!()),
                playlists: RwLock::new(vec![
                    SimulatedPlaylist::new("A1", "Morning", &["Opener", "Weather"]),
                    SimulatedPlaylist::new("B2", "Evening", &["News", "Sports", "Sign off"]),
                ]),
                cg_projects: RwLock::new(json!([
                    { "unique_id": "P1", "name": "Lower third" },
                    { "unique_id": "P2", "name": "Scoreboard" },
                ])),
                info: RwLock::new(system_info!("Start Recording", "Stop Recording")),
                forced_status: RwLock::new(None),
            }),
        }
    }

    pub fn with_playlists(self, playlists: Vec<SimulatedPlaylist>) -> Self {
        *self.inner.playlists.write().unwrap() = playlists;
        self
    }

    pub fn set_playing(&self, playing: Value) {
        *self.inner.playing.write().unwrap() = playing;
    }

    pub fn set_cg_projects(&self, projects: Value) {
        *self.inner.cg_projects.write().unwrap() = projects;
    }

    pub fn set_info(&self, info: Value) {
        *self.inner.info.write().unwrap() = info;
    }

    /// Answer every request with `status` until cleared
    pub fn force_status(&self, status: Option<u16>) {
        *self.inner.forced_status.write().unwrap() = status;
    }

    /// Path and query of every request so far, without the leading `/`
    pub fn requests(&self) -> Vec<String> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn count(&self, request: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == request).count()
    }

    pub fn clear_requests(&self) {
        self.inner.requests.lock().unwrap().clear();
    }

    /// Start serving on an ephemeral port
    pub fn serve(&self) -> SocketAddr {
        let (addr, server) = warp::serve(self.api()).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        log::info!(target: "test::simulated_server::serve", "Serving API on {}", addr);
        addr
    }

    fn api(&self) -> BoxedFilter<(impl Reply,)> {
        let query = warp::query::raw()
            .or(warp::any().map(String::new))
            .unify();

        warp::get()
            .and(warp::path::full())
            .and(query)
            .and_then({
                let server = self.clone();
                move |path: warp::path::FullPath, query: String| {
                    let server = server.clone();
                    async move {
                        Ok::<_, std::convert::Infallible>(
                            routes::respond(server, path.as_str().to_string(), query).await,
                        )
                    }
                }
            })
            .with(warp::log("test::simulated_server::api"))
            .boxed()
    }

    fn record(&self, path: &str, query: &str) {
        let mut request = path.trim_start_matches('/').to_string();
        if !query.is_empty() {
            request.push('?');
            request.push_str(query);
        }
        self.inner.requests.lock().unwrap().push(request);
    }
}

#[derive(Debug)]
struct SimulatedServerRef {
    requests: Mutex<Vec<String>>,
    playing: RwLock<Value>,
    playlists: RwLock<Vec<SimulatedPlaylist>>,
    cg_projects: RwLock<Value>,
    info: RwLock<Value>,
    forced_status: RwLock<Option<u16>>,
}
