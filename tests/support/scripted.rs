use ontheair::{Config, Error, Reply, Result, Transport};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};

use std::cell::{Cell, RefCell};

/// How the scripted server behaves for the next requests
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Up,
    /// Every request fails below HTTP
    Down,
    /// Every request gets this status code
    Status(u16),
}

/// In-process [`Transport`] with scripted answers
#[derive(Debug)]
pub struct ScriptedTransport {
    mode: Cell<Mode>,
    config: Cell<Option<Config>>,
    requests: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode: Cell::new(mode),
            config: Cell::new(None),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn set_mode(&self, mode: Mode) {
        self.mode.set(mode);
    }

    pub fn config(&self) -> Option<Config> {
        self.config.get()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests.borrow().iter().filter(|p| p.as_str() == path).count()
    }

    fn body(path: &str) -> Value {
        match path {
            "playback/playing" => json!({ "playback_status": "Stopped" }),
            "playlists" => json!([]),
            "playback/cg_projects" => json!([]),
            "info" => json!({ "version": "4.2.1" }),
            _ => json!({}),
        }
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn request(&self, _method: Method, path: &str, _body: Option<Value>) -> Result<Reply> {
        self.requests.borrow_mut().push(path.to_string());
        tokio::task::yield_now().await;

        match self.mode.get() {
            Mode::Up => Ok(Reply::new(200, path, Self::body(path))),
            Mode::Down => Err(Error::Other("connection refused".into())),
            Mode::Status(status) => Ok(Reply::new(status, path, json!({ "error": "scripted" }))),
        }
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        self.requests.borrow_mut().push(path.to_string());
        Ok(vec![0xff, 0xd8, 0xff])
    }

    fn set_config(&self, config: Config) {
        self.config.set(Some(config));
    }
}
