use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BainianError, Result};
use crate::quiet::QuietHours;
use crate::types::Style;

/// Top-level configuration for the bainian application.
///
/// Loaded from `bainian.toml` in the working directory by default. A missing
/// or unparsable file is fatal at startup; within an existing file every
/// option falls back to its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BainianConfig {
    /// Reply style active at startup: "formal" or "humor".
    pub style: Style,
    /// Seconds between poll cycles. Must be positive.
    pub check_interval_secs: u64,
    pub do_not_disturb: DoNotDisturbConfig,
    pub detection: DetectionConfig,
    pub target: TargetConfig,
    pub templates: TemplatesConfig,
}

impl Default for BainianConfig {
    fn default() -> Self {
        Self {
            style: Style::default(),
            check_interval_secs: 2,
            do_not_disturb: DoNotDisturbConfig::default(),
            detection: DetectionConfig::default(),
            target: TargetConfig::default(),
            templates: TemplatesConfig::default(),
        }
    }
}

impl BainianConfig {
    /// Load and validate configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed, or if a value
    /// fails validation. There is no fallback to defaults for a missing
    /// file: running without explicit configuration is a startup error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BainianError::Config(format!(
                "Cannot read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: BainianConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Check value constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.check_interval_secs == 0 {
            return Err(BainianError::Config(
                "check_interval_secs must be positive".to_string(),
            ));
        }
        self.do_not_disturb.policy()?;
        Ok(())
    }

    /// The delay between poll cycles.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    /// Parsed quiet-hours policy.
    pub fn quiet_hours(&self) -> Result<QuietHours> {
        self.do_not_disturb.policy()
    }
}

/// Do-not-disturb window during which replies are suppressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DoNotDisturbConfig {
    /// Whether quiet-hours suppression is active.
    pub enabled: bool,
    /// Window start, "HH:MM" wall clock.
    pub start: String,
    /// Window end, "HH:MM" wall clock. An end before start wraps past midnight.
    pub end: String,
}

impl Default for DoNotDisturbConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            start: "23:00".to_string(),
            end: "07:00".to_string(),
        }
    }
}

impl DoNotDisturbConfig {
    /// Parse this section into a usable policy.
    pub fn policy(&self) -> Result<QuietHours> {
        QuietHours::parse(self.enabled, &self.start, &self.end)
    }
}

/// Greeting detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Substrings that mark a message as a greeting (case-insensitive).
    /// An empty list means no message ever matches.
    pub keywords: Vec<String>,
    /// Fixed template index to send. Negative or omitted selects randomly.
    #[serde(
        deserialize_with = "deserialize_reply_index",
        skip_serializing_if = "Option::is_none"
    )]
    pub reply_index: Option<usize>,
    /// Fingerprints of answered messages kept to avoid double replies.
    /// 0 disables the guard.
    pub recent_cache_size: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            reply_index: None,
            recent_cache_size: 64,
        }
    }
}

/// Accepts the conventional `-1` sentinel for "no fixed template": any
/// negative index maps to random selection instead of a parse error.
fn deserialize_reply_index<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(usize::try_from(raw).ok())
}

/// Identifiers for the target chat application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Process name used for the liveness check on macOS.
    pub app_name: String,
    /// Window title used for lookup on Windows.
    pub window_title: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            app_name: "WeChat".to_string(),
            window_title: "微信".to_string(),
        }
    }
}

/// Reply template file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory containing the per-style `<style>_replies.txt` files.
    pub dir: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
        }
    }
}
