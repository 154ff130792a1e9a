use std::{env, time::Duration};

use crate::error::ConfigError;

// Runtime/server settings (not game rules).

pub const DEFAULT_PORT: u16 = 7878;
pub const DEFAULT_PLAYERS: usize = 2;

pub const INBOUND_CHANNEL_CAPACITY: usize = 64;
pub const OUTBOUND_CHANNEL_CAPACITY: usize = 256;

pub const MIN_PORT: u32 = 1024;
pub const MAX_PORT: u32 = 65535;

pub fn port() -> u16 {
    env::var("ARENA_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn players() -> usize {
    env::var("ARENA_PLAYERS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PLAYERS)
}

/// Unset or 0 means wait forever.
pub fn action_timeout_ms() -> u64 {
    env::var("ARENA_ACTION_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(0)
}

pub fn action_timeout(millis: u64) -> Option<Duration> {
    (millis > 0).then(|| Duration::from_millis(millis))
}

/// Ports below 1024 are reserved.
pub fn check_port(port: u32) -> Result<u16, ConfigError> {
    if (MIN_PORT..=MAX_PORT).contains(&port) {
        u16::try_from(port).map_err(|_| ConfigError::InvalidPort(port))
    } else {
        Err(ConfigError::InvalidPort(port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_port() {
        assert_eq!(check_port(1024), Ok(1024));
        assert_eq!(check_port(65535), Ok(65535));
        assert_eq!(check_port(80), Err(ConfigError::InvalidPort(80)));
        assert_eq!(check_port(70000), Err(ConfigError::InvalidPort(70000)));
    }

    #[test]
    fn test_action_timeout() {
        assert_eq!(action_timeout(0), None);
        assert_eq!(action_timeout(1500), Some(Duration::from_millis(1500)));
    }
}
