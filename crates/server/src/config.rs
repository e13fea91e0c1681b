use serde::Deserialize;

/// Top-level configuration for the Cubby server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct CubbyConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Key-value state backend configuration.
    #[serde(default)]
    pub state: StateConfig,
    /// Blob backend configuration.
    #[serde(default)]
    pub blob: BlobConfig,
    /// Token lifetime configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// HTTP surface tuning (CORS, upload limits).
    #[serde(default)]
    pub http: HttpConfig,
}

/// Bind address and public URL configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Host to bind. Defaults to `127.0.0.1`.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind. Defaults to `8080`.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Public base URL used when constructing share links (e.g. behind a
    /// reverse proxy). When unset, share links derive from the request's
    /// `Host` header.
    pub external_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            external_url: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8080
}

/// Configuration for the key-value state backend.
#[derive(Debug, Deserialize)]
pub struct StateConfig {
    /// Which backend to use. Only `"memory"` ships in-tree; hosted stores
    /// plug in behind the `StateStore` trait.
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

/// Configuration for the blob backend.
#[derive(Debug, Deserialize)]
pub struct BlobConfig {
    /// Which backend to use. Only `"memory"` ships in-tree.
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}

/// Token lifetimes, in seconds.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Session token TTL. Defaults to 24 hours.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,

    /// Share token TTL. Defaults to 7 days.
    #[serde(default = "default_share_ttl")]
    pub share_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: default_session_ttl(),
            share_ttl_seconds: default_share_ttl(),
        }
    }
}

fn default_session_ttl() -> u64 {
    24 * 60 * 60
}

fn default_share_ttl() -> u64 {
    7 * 24 * 60 * 60
}

/// HTTP surface tuning.
#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    /// Value for `Access-Control-Allow-Origin`. Defaults to `"*"`.
    #[serde(default = "default_cors_origin")]
    pub cors_allow_origin: String,

    /// Maximum accepted upload size in bytes. Defaults to 50 MiB.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_allow_origin: default_cors_origin(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_cors_origin() -> String {
    "*".to_owned()
}

fn default_max_upload_bytes() -> u64 {
    50 * 1024 * 1024
}
