//! Logging Setup
//!
//! One-call tracing initialization for binaries and test harnesses.
//! `RUST_LOG` wins when set; otherwise the given default directives
//! apply. Library code only emits through the `tracing` macros (with
//! `log` compatibility enabled) and never installs a subscriber itself.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. Safe to call more than once; a
/// second call reports the existing subscriber as an error string.
pub fn init(default_directives: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_init_does_not_panic() {
        let _ = init("info");
        let _ = init("debug");
    }
}
