use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "reelhub.toml",
    "config/reelhub.toml",
    "crates/config/reelhub.toml",
    "../reelhub.toml",
    "../config/reelhub.toml",
    "../crates/config/reelhub.toml",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub chat: ChatConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            database: DatabaseConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://reelhub.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Tuning knobs for the community chat hub.
///
/// ```
/// use reelhub_config::ChatConfig;
///
/// let chat = ChatConfig::default();
/// assert_eq!(chat.history_limit, 50);
/// assert_eq!(chat.client_queue_capacity, 256);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of messages replayed to a freshly connected client.
    #[serde(default = "ChatConfig::default_history_limit")]
    pub history_limit: u32,
    /// Capacity of each client's outbound frame queue.
    #[serde(default = "ChatConfig::default_client_queue_capacity")]
    pub client_queue_capacity: usize,
    /// Interval between WebSocket pings sent by the write loop.
    #[serde(default = "ChatConfig::default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
    /// A connection with no inbound activity for this long is closed.
    #[serde(default = "ChatConfig::default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    /// Consecutive broadcast drops after which a client is force-unregistered.
    #[serde(default = "ChatConfig::default_max_consecutive_drops")]
    pub max_consecutive_drops: u32,
    /// Minimum spacing between typing indicators accepted per client.
    #[serde(default = "ChatConfig::default_typing_min_interval_ms")]
    pub typing_min_interval_ms: u64,
}

impl ChatConfig {
    const fn default_history_limit() -> u32 {
        50
    }

    const fn default_client_queue_capacity() -> usize {
        256
    }

    const fn default_heartbeat_interval_secs() -> u64 {
        30
    }

    const fn default_idle_timeout_secs() -> u64 {
        90
    }

    const fn default_max_consecutive_drops() -> u32 {
        8
    }

    const fn default_typing_min_interval_ms() -> u64 {
        1_000
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_limit: Self::default_history_limit(),
            client_queue_capacity: Self::default_client_queue_capacity(),
            heartbeat_interval_secs: Self::default_heartbeat_interval_secs(),
            idle_timeout_secs: Self::default_idle_timeout_secs(),
            max_consecutive_drops: Self::default_max_consecutive_drops(),
            typing_min_interval_ms: Self::default_typing_min_interval_ms(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use reelhub_config::load;
///
/// std::env::remove_var("REELHUB_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder();
    builder = builder
        .set_default("http.address", defaults.http.address.clone())
        .unwrap()
        .set_default("http.port", i64::from(defaults.http.port))
        .unwrap()
        .set_default("database.url", defaults.database.url.clone())
        .unwrap()
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )
        .unwrap()
        .set_default(
            "chat.history_limit",
            i64::from(defaults.chat.history_limit),
        )
        .unwrap()
        .set_default(
            "chat.client_queue_capacity",
            defaults.chat.client_queue_capacity as i64,
        )
        .unwrap()
        .set_default(
            "chat.heartbeat_interval_secs",
            i64::try_from(defaults.chat.heartbeat_interval_secs).unwrap_or(i64::MAX),
        )
        .unwrap()
        .set_default(
            "chat.idle_timeout_secs",
            i64::try_from(defaults.chat.idle_timeout_secs).unwrap_or(i64::MAX),
        )
        .unwrap()
        .set_default(
            "chat.max_consecutive_drops",
            i64::from(defaults.chat.max_consecutive_drops),
        )
        .unwrap()
        .set_default(
            "chat.typing_min_interval_ms",
            i64::try_from(defaults.chat.typing_min_interval_ms).unwrap_or(i64::MAX),
        )
        .unwrap();

    let environment_overrides = config::Environment::with_prefix("REELHUB").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("REELHUB_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via REELHUB_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
