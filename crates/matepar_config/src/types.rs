//! Configuration types deserialized from `matepar.toml`.

use serde::Deserialize;

/// Default value of [`EngineConfig::max_temperature`].
pub const DEFAULT_MAX_TEMPERATURE: u32 = 100;

/// The top-level configuration parsed from `matepar.toml`.
///
/// Every section is optional; an empty file yields [`ParConfig::default`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParConfig {
    /// Placement engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Diagnostic output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Tuning knobs of the annealing placer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Starting temperature. The optimizer runs at most `max_temperature - 1`
    /// iterations and accepts a worsening move when
    /// `random % max_temperature < temperature`. Must be at least 1.
    #[serde(default = "default_max_temperature")]
    pub max_temperature: u32,
    /// Seed used when the caller does not supply one explicitly.
    #[serde(default)]
    pub seed: u32,
    /// Emit a score note for every optimizer iteration.
    #[serde(default)]
    pub verbose: bool,
}

fn default_max_temperature() -> u32 {
    DEFAULT_MAX_TEMPERATURE
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_temperature: DEFAULT_MAX_TEMPERATURE,
            seed: 0,
            verbose: false,
        }
    }
}

/// Settings for rendering diagnostics.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Use ANSI colors when rendering to a terminal.
    #[serde(default)]
    pub color: bool,
}
