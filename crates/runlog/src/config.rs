//! Demo configuration loaded from TOML.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::policy::PolicyKind;


/// Simulated durations used by a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
	/// Number of paced steps it takes to create a run id.
	pub init_steps: u32,
	pub init_step: Duration,
	/// Time to transmit one result.
	pub transmit: Duration,
	/// Number of paced steps per simulated test.
	pub test_steps: u32,
	pub test_step: Duration,
	/// Gap between concurrent worker starts.
	pub stagger: Duration,
}

impl Default for Timing {
	fn default() -> Self {
		Self {
			init_steps: 4,
			init_step: Duration::from_secs(1),
			transmit: Duration::from_secs(1),
			test_steps: 3,
			test_step: Duration::from_secs(1),
			stagger: Duration::from_secs(2),
		}
	}
}

impl Timing {
	/// Replaces every field that `overrides` sets.
	pub fn apply(mut self, overrides: &TimingOverrides) -> Self {
		if let Some(steps) = overrides.init_steps {
			self.init_steps = steps;
		}
		if let Some(ms) = overrides.init_step_ms {
			self.init_step = Duration::from_millis(ms);
		}
		if let Some(ms) = overrides.transmit_ms {
			self.transmit = Duration::from_millis(ms);
		}
		if let Some(steps) = overrides.test_steps {
			self.test_steps = steps;
		}
		if let Some(ms) = overrides.test_step_ms {
			self.test_step = Duration::from_millis(ms);
		}
		if let Some(ms) = overrides.stagger_ms {
			self.stagger = Duration::from_millis(ms);
		}
		self
	}

	/// Total simulated time for creating a run id.
	pub fn initialization(&self) -> Duration {
		self.init_step * self.init_steps
	}

	/// Total simulated time for one test.
	pub fn per_test(&self) -> Duration {
		self.test_step * self.test_steps
	}
}

/// Optional per-field timing overrides, the `[timing]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingOverrides {
	pub init_steps: Option<u32>,
	pub init_step_ms: Option<u64>,
	pub transmit_ms: Option<u64>,
	pub test_steps: Option<u32>,
	pub test_step_ms: Option<u64>,
	pub stagger_ms: Option<u64>,
}

/// Largest accepted `time_scale`.
pub const MAX_TIME_SCALE: f64 = 1e6;

/// User configuration layered over a scenario preset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
	/// Multiplier applied to every paced delay.
	pub time_scale: f64,
	/// Fixes run-id suffixes and test outcomes when set.
	pub seed: Option<u64>,
	/// Replaces the scenario's failure sentinel. An empty string disables it.
	pub failure_sentinel: Option<String>,
	/// Replaces the scenario's policy variant.
	pub policy: Option<PolicyKind>,
	/// Permit pool capacity for the permit-gated policy.
	pub permits: Option<usize>,
	pub timing: TimingOverrides,
}

impl Default for DemoConfig {
	fn default() -> Self {
		Self {
			time_scale: 1.0,
			seed: None,
			failure_sentinel: None,
			policy: None,
			permits: None,
			timing: TimingOverrides::default(),
		}
	}
}

impl DemoConfig {
	/// Parses and validates TOML text.
	pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml(&text)?;
		tracing::debug!(path = %path.display(), "loaded demo config");
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if !(0.0..=MAX_TIME_SCALE).contains(&self.time_scale) {
			return Err(ConfigError::Invalid(format!(
				"time_scale must be between 0 and {MAX_TIME_SCALE} (got {})",
				self.time_scale
			)));
		}
		if self.permits == Some(0) {
			return Err(ConfigError::Invalid("permits must be at least 1".to_string()));
		}
		Ok(())
	}
}
