//! Logging initialization
//!
//! The library only emits `tracing` events. Binaries pick a [`Profile`] and call [`init`]
//! once; `RUST_LOG` overrides the profile's default filter.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output, debug level
    Development,
    /// Warnings and errors only, for normal command line use
    Quiet,
    /// No output
    Test,
}

impl Profile {
    fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development => "exegis=debug",
            Profile::Quiet => "exegis=warn",
            Profile::Test => "off",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber; later calls do nothing
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));
        match profile {
            Profile::Development | Profile::Quiet => {
                // A subscriber installed elsewhere (e.g. by a test harness) wins
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .finish()
                    .try_init();
            }
            Profile::Test => {
                let _ = tracing_subscriber::registry().try_init();
            }
        }
    });
}
