use super::constants::DEFAULT_PORT;
use super::error::{ClientError, Result};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use std::convert::TryFrom;
use std::net::Ipv4Addr;

/// Connection settings for one OnTheAir Video server
///
/// Deserializes from the host panel's config object:
///
/// ```
/// # use ontheair::Config;
/// let config: Config = serde_json::from_str(r#"{ "host": "10.0.0.20" }"#).unwrap();
/// assert_eq!(config.port(), 8081);
/// assert_eq!(config.base_url(), "http://10.0.0.20:8081/");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    host: Ipv4Addr,
    port: u16,
}

impl Config {
    pub fn new(host: Ipv4Addr, port: u16) -> Result<Self> {
        if port == 0 {
            return Err(ClientError::BadPort(0).into());
        }
        Ok(Self { host, port })
    }

    /// Build a config from the raw json the host hands over
    ///
    /// Any invalid field is a [`ClientError`].
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ClientError::Message(e.to_string()).into())
    }

    pub fn host(&self) -> Ipv4Addr {
        self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `http://host:port/`, every request path is relative to this
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            host: String,
            #[serde(default)]
            port: Option<Value>,
        }

        let raw = Raw::deserialize(deserializer)?;

        let host: Ipv4Addr = raw
            .host
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(ClientError::BadHost(raw.host.clone())))?;

        // Panels hand numbers over as either json numbers or strings
        let port = match raw.port {
            None | Some(Value::Null) => i64::from(DEFAULT_PORT),
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| D::Error::custom(ClientError::Message(n.to_string())))?,
            Some(Value::String(s)) if s.trim().is_empty() => i64::from(DEFAULT_PORT),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| D::Error::custom(ClientError::Message(format!("Bad port '{}'", s))))?,
            Some(other) => {
                return Err(D::Error::custom(ClientError::Message(format!(
                    "Bad port {}",
                    other
                ))))
            }
        };

        let port = u16::try_from(port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| D::Error::custom(ClientError::BadPort(port)))?;

        Ok(Config { host, port })
    }
}
