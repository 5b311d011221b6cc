use std::path::PathBuf;
use std::time::Duration;

/// Seconds the host is told to wait before checking DNS propagation.
pub const DEFAULT_PROPAGATION_SECONDS: u64 = 300;

/// TTL of records created for a challenge.
pub const DEFAULT_TTL: u32 = 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: PathBuf,
    pub propagation: Duration,
    pub ttl: u32,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn new(
        credentials: PathBuf,
        propagation_seconds: u64,
        timeout_seconds: Option<u64>,
    ) -> Self {
        Config {
            credentials,
            propagation: Duration::from_secs(propagation_seconds),
            ttl: DEFAULT_TTL,
            timeout: timeout_seconds.map(Duration::from_secs),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_fixed_ttl() {
        let config = Config::new(PathBuf::from("/etc/bonk.ini"), 120, None);
        assert_eq!(config.ttl, 60);
        assert_eq!(config.propagation, Duration::from_secs(120));
        assert!(config.timeout.is_none());
    }
}
