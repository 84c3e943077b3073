use std::time::Duration;

use clap::Parser;

pub const DEFAULT_API_URL: &str = "http://localhost:44317/api";

/// Runtime settings, from command-line flags or the matching environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "product_console", version, about = "Terminal console for managing products")]
pub struct ConsoleConfig {
    /// Base URL of the product REST API
    #[arg(long, env = "PRODUCT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// How long notices stay visible, in milliseconds
    #[arg(long, env = "PRODUCT_NOTICE_TTL_MS", default_value_t = 3000)]
    pub notice_ttl_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, env = "PRODUCT_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Capacity of the internal request and prompt channels
    #[arg(
        long,
        env = "PRODUCT_CHANNEL_BUFFER",
        default_value_t = 32,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub channel_buffer: usize,
}

impl ConsoleConfig {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = ConsoleConfig::try_parse_from([
            "product_console",
            "--api-url",
            "http://example.test/api",
            "--notice-ttl-ms",
            "500",
            "--request-timeout-secs",
            "5",
            "--channel-buffer",
            "4",
        ])
        .expect("flags should parse");

        assert_eq!(config.api_url, "http://example.test/api");
        assert_eq!(config.notice_ttl(), Duration::from_millis(500));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.channel_buffer, 4);
    }

    #[test]
    fn test_zero_channel_buffer_is_rejected() {
        let result = ConsoleConfig::try_parse_from(["product_console", "--channel-buffer", "0"]);
        assert!(result.is_err());
    }
}
