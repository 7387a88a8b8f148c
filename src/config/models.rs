use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Bearer token that unlocks drafts and writes (loaded from environment, not from config file)
    #[serde(skip)]
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            data_path: default_data_path(),
            max_body_bytes: default_max_body_bytes(),
            admin_token: None,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/blog")
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1 MB
}

/// Public addressing of the site
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Absolute base URL, e.g. `https://blog.example`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix of single-entry pages; the identifier follows it
    #[serde(default = "default_entry_path_prefix")]
    pub entry_path_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            entry_path_prefix: default_entry_path_prefix(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_entry_path_prefix() -> String {
    "/post/".to_string()
}
