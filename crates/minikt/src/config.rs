use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Stops any single `while` loop after this many iterations. `None` runs
    /// loops until their condition turns false.
    pub max_loop_iterations: Option<u64>,
    pub prompt: String,
    /// Report failed lines as `Error: <message>` on standard output, mixed
    /// with program output. When off they go to standard error instead.
    pub echo_errors: bool,
    pub log_filter: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_loop_iterations: None,
            prompt: String::from("> "),
            echo_errors: true,
            log_filter: String::from("info"),
        }
    }
}

impl SessionConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading config at {}", path.display()))?;
        let config = serde_json::from_str(&source)
            .with_context(|| format!("parsing config at {}", path.display()))?;
        Ok(config)
    }
}
