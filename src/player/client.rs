use super::constants::DEFAULT_TIMEOUT;
use super::response;
use super::{ApiError, Config, Result};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use url::Url;

use std::cell::RefCell;
use std::time::Duration;

/// What came back from the server, whatever the status code
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub path: String,
    /// Parsed json body, `Null` when the body is empty or not json
    pub body: Value,
}

impl Reply {
    pub fn new<S: Into<String>>(status: u16, path: S, body: Value) -> Self {
        Self {
            status,
            path: path.into(),
            body,
        }
    }

    /// The server's `error` message, if it sent one
    pub fn error_message(&self) -> String {
        match &self.body["error"] {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Request layer under [`Player`](super::Player)
///
/// Non-2xx status codes are valid replies. Only network level failures
/// (refused, DNS, timeout) are errors.
#[async_trait(?Send)]
pub trait Transport {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Reply>;

    /// Raw body of a GET, for binary resources such as thumbnails
    ///
    /// Error status codes come back as [`ApiError`]s, the same as for
    /// [`request`](Transport::request) replies.
    async fn download(&self, path: &str) -> Result<Vec<u8>>;

    /// Point subsequent requests at a new server
    fn set_config(&self, config: Config);
}

/// reqwest backed [`Transport`]
#[derive(Debug)]
pub struct Client {
    base: RefCell<Url>,
    http: reqwest::Client,
}

impl Client {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            base: RefCell::new(Url::parse(&config.base_url())?),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT))
                .pool_idle_timeout(Some(Duration::from_secs(5)))
                .build()?,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base.borrow().join(path.trim_start_matches('/'))?)
    }
}

#[async_trait(?Send)]
impl Transport for Client {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Reply> {
        let url = self.url(path)?;
        log::debug!("Sending request: {} {}", method, url);

        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }

        let res = req.send().await?;
        let status = res.status().as_u16();
        let text = res.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        Ok(Reply::new(status, path, body))
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url(path)?;
        log::debug!("Downloading: {}", url);
        let res = self.http.get(url).send().await?;
        let status = res.status().as_u16();
        if res.status().is_success() {
            return Ok(res.bytes().await?.to_vec());
        }

        let text = res.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        response::process(Reply::new(status, path, body))
            .and_then(|_| Err(ApiError::UnexpectedStatus(status, String::new()).into()))
    }

    fn set_config(&self, config: Config) {
        match Url::parse(&config.base_url()) {
            Ok(url) => {
                self.base.replace(url);
            }
            Err(e) => log::error!("Ignoring config {:?}: {}", config, e),
        }
    }
}
