//! Injectable pacing for simulated latency.

use std::fmt;
use std::time::Duration;

/// What a paced delay stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
	/// One step of creating a run id on the backing server.
	RunInitialization,
	/// One step of executing a simulated test.
	TestExecution,
	/// Sending one result to the backing server.
	ResultTransmission,
	/// Gap between starting two concurrent workers.
	LaunchStagger,
}

impl Phase {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::RunInitialization => "run_initialization",
			Self::TestExecution => "test_execution",
			Self::ResultTransmission => "result_transmission",
			Self::LaunchStagger => "launch_stagger",
		}
	}
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Source of simulated latency.
///
/// Implementations block the calling thread for as long as they see fit.
/// Tests substitute pacers that return immediately or coordinate threads.
pub trait Pacer: Send + Sync {
	/// Blocks the calling thread for a delay standing in for `phase`.
	fn pause(&self, phase: Phase, duration: Duration);
}

/// Sleeps the calling thread for each delay, multiplied by a scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepPacer {
	scale: f64,
}

impl Default for SleepPacer {
	fn default() -> Self {
		Self::real_time()
	}
}

impl SleepPacer {
	/// Creates a pacer that sleeps `duration * scale`.
	///
	/// Negative or non-finite scales fall back to real time.
	pub fn new(scale: f64) -> Self {
		let scale = if scale.is_finite() && scale >= 0.0 { scale } else { 1.0 };
		Self { scale }
	}

	/// Creates a pacer that sleeps every delay in full.
	pub const fn real_time() -> Self {
		Self { scale: 1.0 }
	}

	pub const fn scale(&self) -> f64 {
		self.scale
	}

	/// `duration * scale`, saturating at [`Duration::MAX`].
	pub fn scaled(&self, duration: Duration) -> Duration {
		Duration::try_from_secs_f64(duration.as_secs_f64() * self.scale).unwrap_or(Duration::MAX)
	}
}

impl Pacer for SleepPacer {
	fn pause(&self, phase: Phase, duration: Duration) {
		let scaled = self.scaled(duration);
		tracing::trace!(phase = phase.as_str(), ?scaled, "pacer.pause");
		if !scaled.is_zero() {
			std::thread::sleep(scaled);
		}
	}
}

/// Pacer that never blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantPacer;

impl Pacer for InstantPacer {
	fn pause(&self, _phase: Phase, _duration: Duration) {}
}
