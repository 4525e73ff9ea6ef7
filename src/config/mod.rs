// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

/// Default config file, extension resolved by the `config` crate
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest priority first: built-in defaults, the config file
    /// (optional), `WIKI_*` environment variables (e.g. `WIKI_SERVER__PORT`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("WIKI")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "wikid")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("http.restrict_save_method", false)?
            .set_default("wiki.content_dir", "content")?
            .set_default("wiki.template_dir", "templates")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
