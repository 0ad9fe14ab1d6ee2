//! Server configuration.

use serde::{Deserialize, Serialize};

use topup_core::{AssetCatalog, AssetSpec, TopupResult};

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Location of the JSON data file
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Login credentials. Without them the API is open.
    #[serde(default)]
    pub auth: Option<AuthSettings>,

    /// Asset catalog; the built-in catalog when absent
    #[serde(default)]
    pub assets: Option<Vec<AssetSpec>>,
}

/// Credentials of the single user allowed to log in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Login email
    pub email: String,
    /// Argon2 password hash in PHC string format
    pub password_hash: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_path() -> String {
    "./data/user-data.json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_path: default_data_path(),
            auth: None,
            assets: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, std::io::Error> {
        toml::from_str(content).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Override the port from the `PORT` environment variable, if set.
    pub fn apply_env(mut self) -> Self {
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        self
    }

    /// The validated asset catalog.
    pub fn catalog(&self) -> TopupResult<AssetCatalog> {
        match &self.assets {
            Some(assets) => AssetCatalog::new(assets.clone()),
            None => Ok(AssetCatalog::default()),
        }
    }
}
