use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;

use crate::error::AudienceResult;

/// Root application configuration. Loaded from environment variables
/// with the prefix `AUDIENCE_STUDIO__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub campaigns: CampaignConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// How a customer attribute equal to zero is treated by condition evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroValuePolicy {
    /// Zero counts as "no value" and the condition is skipped for that customer.
    #[default]
    TreatAsAbsent,
    /// Zero is compared like any other number.
    Compare,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentationConfig {
    #[serde(default)]
    pub zero_value_policy: ZeroValuePolicy,
    #[serde(default = "default_seed_demo_segments")]
    pub seed_demo_segments: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CampaignConfig {
    /// Probability in `[0, 1]` that a simulated delivery fails.
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_seed_demo_segments() -> bool {
    true
}
fn default_failure_rate() -> f64 {
    0.0
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            zero_value_policy: ZeroValuePolicy::default(),
            seed_demo_segments: default_seed_demo_segments(),
        }
    }
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            failure_rate: default_failure_rate(),
            rng_seed: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            segmentation: SegmentationConfig::default(),
            campaigns: CampaignConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> AudienceResult<Self> {
        Self::from_builder(config::Config::builder().add_source(
            config::Environment::with_prefix("AUDIENCE_STUDIO")
                .separator("__")
                .try_parsing(true),
        ))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> AudienceResult<Self> {
        let config = builder.build()?;
        let mut loaded: AppConfig = config.try_deserialize()?;
        loaded.campaigns.failure_rate = loaded.campaigns.failure_rate.clamp(0.0, 1.0);
        Ok(loaded)
    }
}
