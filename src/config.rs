use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Everything
/// has a default; CLI flags override these values per invocation.
pub struct Config {
    /// Directory matrix and corpus exports land in (GRANARY_OUT_DIR)
    pub out_dir: PathBuf,
    /// Default number of keys shown per topic (GRANARY_NUM_KEYS)
    pub num_keys: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let out_dir = env::var("GRANARY_OUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let num_keys = match env::var("GRANARY_NUM_KEYS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("GRANARY_NUM_KEYS is not a number: '{raw}'"))?,
            Err(_) => 10,
        };
        Ok(Self { out_dir, num_keys })
    }
}
