//! Runtime configuration, read from a JSON5 file next to the binary.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default interpolation sample count for combat resolution.
pub const DEFAULT_INTERPOLATION_SAMPLES: usize = 10;
/// Range interpolation sample counts are clamped into.
pub const INTERPOLATION_SAMPLE_RANGE: std::ops::RangeInclusive<usize> = 8..=30;

/// Errors raised while loading or creating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config file io failed: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid JSON5 or does not match the expected layout.
    #[error("config file is malformed: {0}")]
    Parse(#[from] serde_json5::Error),
    /// The defaults could not be serialized.
    #[error("failed to serialize default config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    /// Server ticks per second.
    pub tick_rate: u32,
    /// Combat resolution settings.
    pub combat: CombatConfig,
    /// Acknowledgement probe settings.
    pub acknowledgements: AcknowledgementConfig,
    /// Violation scoring settings.
    pub violations: ViolationConfig,
    /// Disconnect settings.
    pub punishments: PunishmentConfig,
    /// Checks that are not registered, by `NameVariant` identifier (e.g. `"ReachB"`).
    pub disabled_checks: Vec<String>,
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20,
            combat: CombatConfig::default(),
            acknowledgements: AcknowledgementConfig::default(),
            violations: ViolationConfig::default(),
            punishments: PunishmentConfig::default(),
            disabled_checks: Vec::new(),
        }
    }
}

/// Combat resolution settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Number of interpolation samples taken between the pre- and post-tick state.
    pub interpolation_samples: usize,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            interpolation_samples: DEFAULT_INTERPOLATION_SAMPLES,
        }
    }
}

impl CombatConfig {
    /// The sample count, clamped into the supported range.
    #[must_use]
    pub fn samples(&self) -> usize {
        self.interpolation_samples.clamp(
            *INTERPOLATION_SAMPLE_RANGE.start(),
            *INTERPOLATION_SAMPLE_RANGE.end(),
        )
    }
}

/// Acknowledgement probe settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcknowledgementConfig {
    /// Consecutive unanswered ticks before a client is considered unresponsive.
    pub unresponsive_ticks: u32,
    /// Upper bound of outstanding probe buckets per player.
    pub max_pending: usize,
    /// Whether unresponsive clients are disconnected.
    pub disconnect_unresponsive: bool,
}

impl Default for AcknowledgementConfig {
    fn default() -> Self {
        Self {
            unresponsive_ticks: 200,
            max_pending: 1024,
            disconnect_unresponsive: true,
        }
    }
}

/// Violation scoring settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViolationConfig {
    /// Amount removed from every check's violation score on ticks without a flag.
    pub decay_per_tick: f64,
}

impl Default for ViolationConfig {
    fn default() -> Self {
        Self {
            decay_per_tick: 0.0025,
        }
    }
}

/// Disconnect settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PunishmentConfig {
    /// Whether a check reaching its threshold disconnects the player.
    pub enabled: bool,
    /// Disconnect message; `{check}` is replaced with the check identifier.
    pub message: String,
    /// Disconnect message for clients that stopped answering probes.
    pub unresponsive_message: String,
}

impl Default for PunishmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            message: "Disconnected by Vigil: unfair advantage detected ({check}).".to_owned(),
            unresponsive_message: "Disconnected by Vigil: the client stopped responding."
                .to_owned(),
        }
    }
}

impl PunishmentConfig {
    /// Renders the disconnect message for `check`.
    #[must_use]
    pub fn render(&self, check: &str) -> String {
        self.message.replace("{check}", check)
    }
}

impl VigilConfig {
    /// Parses a configuration from JSON5 text.
    pub fn from_json5(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json5::from_str(text)?)
    }

    /// Loads the configuration at `path`, writing the defaults there first if it doesn't exist.
    pub async fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !tokio::fs::try_exists(path).await? {
            let config = Self::default();
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, serde_json::to_string_pretty(&config)?).await?;
            log::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }

        let text = tokio::fs::read_to_string(path).await?;
        let config = Self::from_json5(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Whether the check identified by `id` is registered.
    #[must_use]
    pub fn is_enabled(&self, id: &str) -> bool {
        !self.disabled_checks.iter().any(|disabled| disabled == id)
    }
}
