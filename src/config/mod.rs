//! # Configuration Management Module
//!
//! Centralized configuration for the terminal: structured sections with serde
//! serialization, sensible defaults, validation on load, and a
//! `create_default` helper used by `termquest init`.
//!
//! ## Configuration File Format
//!
//! Termquest uses TOML for human-readable configuration:
//!
//! ```toml
//! [terminal]
//! hostname = "terminal"
//! greeting = true
//!
//! [render]
//! char_delay_ms = 10
//! settle_delay_ms = 50
//! scroll_throttle_ms = 40
//!
//! [world]
//! rooms_path = "data/rooms.json"
//! ```
//!
//! All sections are optional; missing values fall back to the defaults above.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Terminal presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Host part of the prompt, rendered as `user@{hostname}:~$ `.
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Whether to print the greeting banner at startup.
    #[serde(default = "default_greeting")]
    pub greeting: bool,
}

fn default_hostname() -> String {
    "terminal".to_string()
}

fn default_greeting() -> bool {
    true
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            hostname: default_hostname(),
            greeting: default_greeting(),
        }
    }
}

/// Cadence settings for the incremental renderer and output queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Delay between revealed characters, in milliseconds.
    #[serde(default = "default_char_delay")]
    pub char_delay_ms: u64,
    /// Settle delay between queued messages, in milliseconds.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    /// Minimum gap between scroll-to-bottom requests during a reveal.
    #[serde(default = "default_scroll_throttle")]
    pub scroll_throttle_ms: u64,
}

fn default_char_delay() -> u64 {
    10
}

fn default_settle_delay() -> u64 {
    50
}

fn default_scroll_throttle() -> u64 {
    40
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            char_delay_ms: default_char_delay(),
            settle_delay_ms: default_settle_delay(),
            scroll_throttle_ms: default_scroll_throttle(),
        }
    }
}

impl RenderConfig {
    /// Cadence with all delays zeroed, for tests and headless use.
    pub fn immediate() -> Self {
        RenderConfig {
            char_delay_ms: 0,
            settle_delay_ms: 0,
            scroll_throttle_ms: 0,
        }
    }
}

/// World seed settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Path to the rooms seed JSON. When absent or missing on disk, the
    /// embedded seed is used instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms_path: Option<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub terminal: TerminalConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub world: WorldConfig,
}

impl Config {
    /// Load configuration from a TOML file, applying defaults for any
    /// missing sections, and validate it.
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("cannot read config file '{}': {}", path, e))?;
        let config: Config =
            toml::from_str(&contents).map_err(|e| anyhow!("invalid config '{}': {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Write a default configuration file. Refuses to overwrite an existing
    /// one.
    pub async fn create_default(path: &str) -> Result<()> {
        if fs::try_exists(path).await.unwrap_or(false) {
            return Err(anyhow!("config file '{}' already exists", path));
        }
        let config = Config::default();
        let contents = toml::to_string_pretty(&config)?;
        fs::write(path, contents).await?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.terminal.hostname.trim().is_empty() {
            return Err(anyhow!("terminal.hostname must not be empty"));
        }
        // An excessive cadence makes the terminal look hung.
        if self.render.char_delay_ms > 1_000 {
            return Err(anyhow!("render.char_delay_ms must be at most 1000"));
        }
        if self.render.settle_delay_ms > 10_000 {
            return Err(anyhow!("render.settle_delay_ms must be at most 10000"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_applies_defaults_for_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[terminal]\nhostname = \"mainframe\"\n").unwrap();

        let config = Config::load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(config.terminal.hostname, "mainframe");
        assert_eq!(config.render.char_delay_ms, default_char_delay());
        assert!(config.world.rooms_path.is_none());
    }

    #[tokio::test]
    async fn create_default_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_str().unwrap();

        Config::create_default(path_str).await.unwrap();
        let config = Config::load(path_str).await.unwrap();
        assert_eq!(config.terminal.hostname, "terminal");

        // Second create must refuse to clobber.
        assert!(Config::create_default(path_str).await.is_err());
    }

    #[tokio::test]
    async fn validate_rejects_extreme_cadence() {
        let mut config = Config::default();
        config.render.char_delay_ms = 5_000;
        assert!(config.validate().is_err());
    }
}
