//! Runtime configuration for the server and client binaries.
//!
//! Defaults reproduce the fixed deployment: server on port 10000, monitor
//! link on port 10001, 8 KiB frame bound, 80 ms per simulated layer pair.

use std::time::Duration;

pub const DEFAULT_SERVER_BIND: &str = "0.0.0.0:10000";
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:10000";
pub const DEFAULT_MONITOR_BIND: &str = "0.0.0.0:10001";

/// Largest frame body accepted is `MAX_FRAME_SIZE - 1` bytes.
pub const MAX_FRAME_SIZE: usize = 8192;

pub const DEFAULT_STAGE_DELAY: Duration = Duration::from_millis(80);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_frame_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_SERVER_BIND.to_string(),
            max_frame_size: MAX_FRAME_SIZE,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_addr: String,
    pub monitor_bind: String,
    pub max_frame_size: usize,
    /// Simulated processing time per layer pair, both directions.
    pub stage_delay: Duration,
    /// Forward the server's reply packet to the monitor after decapsulation.
    pub echo_reply: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            monitor_bind: DEFAULT_MONITOR_BIND.to_string(),
            max_frame_size: MAX_FRAME_SIZE,
            stage_delay: DEFAULT_STAGE_DELAY,
            echo_reply: false,
        }
    }
}

/// Install env_logger. `RUST_LOG` wins; otherwise `info`, or `debug` for
/// this crate when `verbose`.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info,osilink=debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let server = ServerConfig::default();
        let client = ClientConfig::default();

        assert_eq!(server.bind_addr, "0.0.0.0:10000");
        assert_eq!(client.server_addr, "127.0.0.1:10000");
        assert_eq!(client.monitor_bind, "0.0.0.0:10001");
        assert_eq!(server.max_frame_size, client.max_frame_size);
    }

    #[test]
    fn test_default_stage_delay() {
        let config = ClientConfig::default();
        assert_eq!(config.stage_delay, Duration::from_millis(80));
        assert!(!config.echo_reply);
    }
}
