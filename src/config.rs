use crate::error::{config_error, env_error, PicSyncResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default location of the optional settings file
pub const DEFAULT_CONFIG_PATH: &str = "config/picsync.toml";
/// Public Google Cloud Vision annotate endpoint
pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";
/// Gemini model used when none is configured
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
/// Upload limit for images (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Main configuration structure for the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Interface to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory served under /static
    pub static_dir: String,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
    /// Google Cloud Vision API key; OCR is unavailable without it
    pub vision_api_key: Option<String>,
    /// Vision annotate endpoint
    pub vision_endpoint: String,
    /// Gemini API key; the AI refiner is disabled without it
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// IANA zone the refiner falls back to
    pub default_timezone: String,
    /// Timeout for each OCR or model call
    pub upstream_timeout_secs: u64,
}

/// Settings that may come from `config/picsync.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<String>,
    pub max_upload_bytes: Option<usize>,
    pub vision_endpoint: Option<String>,
    pub gemini_model: Option<String>,
    pub default_timezone: Option<String>,
    pub upstream_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Read the settings file, treating a missing file as empty
    pub fn read(path: impl AsRef<Path>) -> PicSyncResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl Config {
    /// Load configuration from `.env`, the environment and the settings file
    pub fn load() -> PicSyncResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let path = env::var("PICSYNC_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = FileConfig::read(&path)?;

        Self::from_lookup(file, |key| env::var(key).ok())
    }

    /// Build a configuration from file settings and an environment lookup.
    /// Environment values win over the file, the file wins over defaults.
    pub fn from_lookup<F>(file: FileConfig, lookup: F) -> PicSyncResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("HOST")
            .or(file.host)
            .unwrap_or_else(|| "127.0.0.1".to_string());

        let port = match var("PORT") {
            Some(p) => p.parse::<u16>().map_err(|_| env_error("PORT"))?,
            None => file.port.unwrap_or(8000),
        };

        let static_dir = var("STATIC_DIR")
            .or(file.static_dir)
            .unwrap_or_else(|| "static".to_string());

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(v) => v.parse::<usize>().map_err(|_| env_error("MAX_UPLOAD_BYTES"))?,
            None => file.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        let vision_endpoint = var("GOOGLE_VISION_ENDPOINT")
            .or(file.vision_endpoint)
            .unwrap_or_else(|| DEFAULT_VISION_ENDPOINT.to_string());
        Url::parse(&vision_endpoint)
            .map_err(|e| config_error(&format!("Invalid Vision endpoint {}: {}", vision_endpoint, e)))?;

        let gemini_model = var("GEMINI_MODEL")
            .or(file.gemini_model)
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let default_timezone = var("DEFAULT_TIMEZONE")
            .or(file.default_timezone)
            .unwrap_or_else(|| "UTC".to_string());
        default_timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown time zone: {}", default_timezone)))?;

        let upstream_timeout_secs = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(v) => v.parse::<u64>().map_err(|_| env_error("UPSTREAM_TIMEOUT_SECS"))?,
            None => file.upstream_timeout_secs.unwrap_or(30),
        };

        Ok(Config {
            host,
            port,
            static_dir,
            max_upload_bytes,
            vision_api_key: var("GOOGLE_VISION_API_KEY"),
            vision_endpoint,
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model,
            default_timezone,
            upstream_timeout_secs,
        })
    }

    /// Address the server binds to
    pub fn socket_addr(&self) -> PicSyncResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| config_error(&format!("Invalid listen address {}:{}", self.host, self.port)))
    }

    /// Timeout applied to each upstream call
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
