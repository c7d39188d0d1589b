//! One-time run id assignment.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::LOGGER_SRC;
use crate::pacer::{Pacer, Phase};
use crate::record::RunId;

#[cfg(test)]
mod tests;

/// Observable state of a registrar's run-id slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrarState {
	/// No run id yet; the next request will create one.
	Empty,
	/// At least one request is creating a run id right now.
	Initializing,
	/// A run id is assigned and will be handed to every later request.
	Assigned(RunId),
	/// The lock around the slot was abandoned while held; no request can
	/// make progress again.
	PermanentlyLocked,
}

/// Holds the run-id slot and the history of assignments made to it.
///
/// Plain data: the policy wrapping it decides whether the
/// check-provision-assign sequence runs inside a critical section.
#[derive(Debug, Default)]
pub struct RunRegistrar {
	current: Option<RunId>,
	in_flight: usize,
	assignments: Vec<RunId>,
}

impl RunRegistrar {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the assigned run id, if any.
	pub fn existing(&self) -> Option<&RunId> {
		self.current.as_ref()
	}

	/// Marks the start of a provisioning pass.
	pub fn begin(&mut self) {
		self.in_flight += 1;
	}

	/// Stores a freshly provisioned id, replacing any current one.
	pub fn assign(&mut self, id: RunId) {
		self.in_flight = self.in_flight.saturating_sub(1);
		self.assignments.push(id.clone());
		self.current = Some(id);
	}

	/// Runs the whole check-provision-assign sequence.
	///
	/// Callers must hold exclusive access for the duration; the `&mut`
	/// receiver makes that explicit.
	pub fn request_run(&mut self, requester: &str, provisioner: &Provisioner) -> RunId {
		info!(src = LOGGER_SRC, requester, "getting a new test run id for '{requester}'");
		if let Some(id) = self.existing() {
			log_already_created(requester, id);
			return id.clone();
		}
		self.begin();
		let id = provisioner.provision(requester);
		self.assign(id.clone());
		id
	}

	/// Every id ever assigned, oldest first. More than one entry means the
	/// slot was initialized more than once.
	pub fn assignments(&self) -> &[RunId] {
		&self.assignments
	}

	/// Number of completed initializations.
	pub fn initializations(&self) -> usize {
		self.assignments.len()
	}

	pub fn state(&self) -> RegistrarState {
		match (&self.current, self.in_flight) {
			(_, n) if n > 0 => RegistrarState::Initializing,
			(Some(id), _) => RegistrarState::Assigned(id.clone()),
			(None, _) => RegistrarState::Empty,
		}
	}
}

pub(crate) fn log_already_created(requester: &str, id: &RunId) {
	info!(
		src = LOGGER_SRC,
		requester,
		run_id = %id,
		"excuse me '{requester}', but test run '{id}' was already created; not making another"
	);
}

/// Performs the slow part of creating a run id.
///
/// Pauses once per initialization step, then draws a random suffix. Holds
/// no registrar state, so it can run with or without a lock held.
pub struct Provisioner {
	steps: u32,
	step: Duration,
	pacer: Arc<dyn Pacer>,
	rng: Mutex<StdRng>,
}

impl Provisioner {
	/// Number of distinct id suffixes.
	pub const SUFFIX_RANGE: u16 = 1000;

	pub fn new(steps: u32, step: Duration, pacer: Arc<dyn Pacer>, seed: Option<u64>) -> Self {
		let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
		Self {
			steps,
			step,
			pacer,
			rng: Mutex::new(rng),
		}
	}

	/// Simulates the backing server creating a run for `requester`.
	pub fn provision(&self, requester: &str) -> RunId {
		info!(
			src = LOGGER_SRC,
			requester,
			"making a new run will take some time, give me {:?}",
			self.step * self.steps
		);

		let mut progress = format!("run initialization for '{requester}'");
		for _ in 0..self.steps {
			progress.push_str(" initializing...");
			info!(src = LOGGER_SRC, "{progress}");
			self.pacer.pause(Phase::RunInitialization, self.step);
		}

		let suffix = self.rng.lock().gen_range(0..Self::SUFFIX_RANGE);
		let id = RunId::synthesize(requester, suffix);
		info!(src = LOGGER_SRC, run_id = %id, "test run '{id}' has been created");
		id
	}
}
