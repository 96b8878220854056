use clap::Parser;
use std::num::ParseIntError;
use std::time::Duration;

use hubwatch::{ChannelId, Config, JitterPolicy, Mode};

fn parse_duration(s: &str) -> Result<Duration, ParseIntError> {
    let millis: u64 = s.parse()?;
    Ok(Duration::from_millis(millis))
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)] // read from Cargo.toml
pub struct Cli {
    /// Hub endpoint probed for reachability
    #[arg(
        env = "HUBWATCH_HUB_URL",
        long = "hub-url",
        value_name = "url",
        default_value = "http://homeassistant.local:8123/"
    )]
    pub hub_url: String,

    /// Base URL of the relay RPC endpoint
    #[arg(
        env = "HUBWATCH_RELAY_URL",
        long = "relay-url",
        value_name = "url",
        default_value = "http://127.0.0.1"
    )]
    pub relay_url: String,

    /// Relay channels to manage, comma separated
    #[arg(
        env = "HUBWATCH_CHANNELS",
        long = "channels",
        value_name = "ids",
        value_delimiter = ',',
        default_value = "0"
    )]
    pub channels: Vec<u8>,

    /// Steady poll interval (and backoff floor) in milliseconds
    #[arg(
        env = "HUBWATCH_POLL_INTERVAL_MS",
        long = "poll-interval-ms",
        value_name = "ms",
        value_parser = parse_duration
    )]
    pub poll_interval: Option<Duration>,

    /// Backoff cap while the hub is unreachable, in milliseconds
    #[arg(
        env = "HUBWATCH_MAX_BACKOFF_MS",
        long = "max-backoff-ms",
        value_name = "ms",
        value_parser = parse_duration
    )]
    pub max_backoff: Option<Duration>,

    /// Per-request timeout in milliseconds
    #[arg(
        env = "HUBWATCH_HTTP_TIMEOUT_MS",
        long = "http-timeout-ms",
        value_name = "ms",
        value_parser = parse_duration
    )]
    pub http_timeout: Option<Duration>,

    /// Pause between the two probe attempts in milliseconds
    #[arg(
        env = "HUBWATCH_RETRY_DELAY_MS",
        long = "retry-delay-ms",
        value_name = "ms",
        value_parser = parse_duration
    )]
    pub retry_delay: Option<Duration>,

    /// Maximum random addition to each poll wait in milliseconds (0 disables)
    #[arg(
        env = "HUBWATCH_MAX_JITTER_MS",
        long = "max-jitter-ms",
        value_name = "ms",
        value_parser = parse_duration
    )]
    pub max_jitter: Option<Duration>,

    /// Settle window for network notifications in milliseconds
    #[arg(
        env = "HUBWATCH_DEBOUNCE_MS",
        long = "debounce-ms",
        value_name = "ms",
        value_parser = parse_duration
    )]
    pub debounce: Option<Duration>,

    /// Grace period before the first probe in milliseconds
    #[arg(
        env = "HUBWATCH_STARTUP_DELAY_MS",
        long = "startup-delay-ms",
        value_name = "ms",
        value_parser = parse_duration
    )]
    pub startup_delay: Option<Duration>,

    /// Input mode while the hub is reachable (detached, follow, flip)
    #[arg(env = "HUBWATCH_UP_MODE", long = "up-mode", value_name = "mode")]
    pub up_mode: Option<Mode>,

    /// Input mode while the hub is unreachable (detached, follow, flip)
    #[arg(env = "HUBWATCH_DOWN_MODE", long = "down-mode", value_name = "mode")]
    pub down_mode: Option<Mode>,
}

impl Cli {
    /// Overlays the given arguments on [`Config::default`].
    pub fn config(&self) -> Config {
        let mut cfg = Config {
            hub_url: self.hub_url.clone(),
            channels: self.channels.iter().copied().map(ChannelId).collect(),
            ..Config::default()
        };
        if let Some(d) = self.poll_interval {
            cfg.poll_interval = d;
        }
        if let Some(d) = self.max_backoff {
            cfg.max_backoff = d;
        }
        if let Some(d) = self.http_timeout {
            cfg.http_timeout = d;
        }
        if let Some(d) = self.retry_delay {
            cfg.retry_delay = d;
        }
        if let Some(d) = self.max_jitter {
            cfg.jitter = if d.is_zero() {
                JitterPolicy::None
            } else {
                JitterPolicy::Additive { ceiling: d }
            };
        }
        if let Some(d) = self.debounce {
            cfg.debounce = d;
        }
        if let Some(d) = self.startup_delay {
            cfg.startup_delay = d;
        }
        if let Some(m) = self.up_mode {
            cfg.up_mode = m;
        }
        if let Some(m) = self.down_mode {
            cfg.down_mode = m;
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_default() {
        let cli = Cli::try_parse_from(["hubwatch"]).unwrap();
        let cfg = cli.config();
        let def = Config::default();

        assert_eq!(cfg.hub_url, def.hub_url);
        assert_eq!(cfg.channels, def.channels);
        assert_eq!(cfg.poll_interval, def.poll_interval);
        assert_eq!(cfg.jitter, def.jitter);
        assert_eq!(cli.relay_url, "http://127.0.0.1");
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "hubwatch",
            "--channels",
            "0,2",
            "--poll-interval-ms",
            "10000",
            "--max-jitter-ms",
            "0",
            "--up-mode",
            "flip",
        ])
        .unwrap();
        let cfg = cli.config();

        assert_eq!(cfg.channels, vec![ChannelId(0), ChannelId(2)]);
        assert_eq!(cfg.poll_interval, Duration::from_secs(10));
        assert_eq!(cfg.jitter, JitterPolicy::None);
        assert_eq!(cfg.up_mode, Mode::Flip);
        assert_eq!(cfg.down_mode, Mode::Follow);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["hubwatch", "--down-mode", "sideways"]).is_err());
    }
}
