use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::error::CatalogError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub remote: RemoteSettings,
    pub listing: ListingSettings,
    pub images: ImageSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub base_url: String,
    /// Unset means requests may wait forever.
    pub timeout_seconds: Option<u64>,
}

impl RemoteSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://fakestoreapi.com".to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    pub page_size: usize,
    pub load_more_delay_ms: u64,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            page_size: 12,
            load_more_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CompressionPass {
    pub max_dimension: u32,
    /// JPEG quality in `(0, 1]`.
    pub quality: f32,
}

impl CompressionPass {
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub max_upload_bytes: usize,
    pub size_budget_bytes: usize,
    pub first_pass: CompressionPass,
    pub second_pass: CompressionPass,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: 5 * 1024 * 1024,
            size_budget_bytes: 500 * 1024,
            first_pass: CompressionPass {
                max_dimension: 600,
                quality: 0.6,
            },
            second_pass: CompressionPass {
                max_dimension: 500,
                quality: 0.5,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then `appsettings.*` if present, then `CATALOG__*` env vars.
    pub fn load() -> Result<Self, CatalogError> {
        Self::load_from("appsettings")
    }

    pub fn load_from(file: &str) -> Result<Self, CatalogError> {
        let settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("CATALOG")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}
