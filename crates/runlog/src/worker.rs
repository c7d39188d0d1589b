//! Simulated test runner.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::Result;
use crate::pacer::{Pacer, Phase};
use crate::policy::AccessPolicy;
use crate::record::{Outcome, ResultRecord, RunId};

/// What a finished worker reports back to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSummary {
	pub name: String,
	/// The run id this worker was handed.
	pub run_id: RunId,
	pub tests_logged: u32,
}

/// One simulated test runner bound to a shared policy.
pub struct Worker<'a> {
	name: String,
	policy: &'a dyn AccessPolicy,
	pacer: Arc<dyn Pacer>,
	test_steps: u32,
	test_step: Duration,
	rng: StdRng,
}

impl<'a> Worker<'a> {
	pub fn new(name: impl Into<String>, policy: &'a dyn AccessPolicy, pacer: Arc<dyn Pacer>) -> Self {
		let name = name.into().trim().to_string();
		Self {
			name,
			policy,
			pacer,
			test_steps: 3,
			test_step: Duration::from_secs(1),
			rng: StdRng::from_entropy(),
		}
	}

	/// Sets how long each simulated test takes.
	pub fn with_test_time(mut self, steps: u32, step: Duration) -> Self {
		self.test_steps = steps;
		self.test_step = step;
		self
	}

	/// Fixes the outcome sequence.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.rng = StdRng::seed_from_u64(seed);
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Requests the shared run id once, then runs and logs `test_count` tests.
	///
	/// A failed run-id request is returned as-is; no tests run and nothing is
	/// retried.
	pub fn run(&mut self, test_count: u32) -> Result<WorkerSummary> {
		info!(
			"I exist! my tests will take {:?} each to run",
			self.test_step * self.test_steps
		);
		info!("I am asking for a new test run id");
		let run_id = self.policy.request_run(&self.name)?;

		info!(run_id = %run_id, "starting to run {test_count} tests");
		for sequence in 1..=test_count {
			self.run_test(sequence);
		}

		Ok(WorkerSummary {
			name: self.name.clone(),
			run_id,
			tests_logged: test_count,
		})
	}

	fn run_test(&mut self, sequence: u32) {
		info!(
			"starting test number {sequence}, this will take {:?}",
			self.test_step * self.test_steps
		);

		let mut progress = format!("test {sequence}");
		for _ in 0..self.test_steps {
			progress.push_str(" testing...");
			info!("{progress}");
			self.pacer.pause(Phase::TestExecution, self.test_step);
		}

		let outcome = Outcome::ALL[self.rng.gen_range(0..Outcome::ALL.len())];
		info!(%outcome, "I have a test result of {outcome}");

		let permit = self.policy.acquire_transmit_slot();
		self.policy.append(ResultRecord::new(self.name.clone(), sequence, outcome), permit);
	}
}
