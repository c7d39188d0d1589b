//! Access policies guarding the shared registrar and result log.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Timing;
use crate::error::{Result, RunError};
use crate::ledger::ResultLog;
use crate::pacer::{Pacer, Phase};
use crate::permits::TransmitPermit;
use crate::record::{ResultRecord, RunId};
use crate::registrar::{Provisioner, RegistrarState, RunRegistrar};
use crate::LOGGER_SRC;

mod gated;
mod manual;
mod scoped;
mod unsynchronized;


pub use gated::PermitGated;
pub use manual::ManualMutex;
pub use scoped::ScopedMutex;
pub use unsynchronized::Unsynchronized;

/// Permit pool capacity used when none is configured.
pub const DEFAULT_PERMITS: usize = 2;

/// Capability set shared by every policy variant.
///
/// Workers hold a shared reference to one policy and call it from their own
/// threads. Variants differ only in how they synchronize the two mutating
/// operations.
pub trait AccessPolicy: Send + Sync {
	fn kind(&self) -> PolicyKind;

	/// Returns the run id, creating it if none exists yet.
	fn request_run(&self, requester: &str) -> Result<RunId>;

	/// Takes a transmission permit on the worker side, blocking until one is
	/// free. Variants without a permit pool return `None` immediately.
	fn acquire_transmit_slot(&self) -> Option<TransmitPermit<'_>> {
		None
	}

	/// Transmits and stores one record. The permit, if any, is released by
	/// the policy once transmission has finished.
	fn append<'a>(&'a self, record: ResultRecord, permit: Option<TransmitPermit<'a>>);

	/// Copies the current registrar and log contents.
	fn snapshot(&self) -> LedgerSnapshot;
}

/// Names of the policy variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
	Unsynchronized,
	ManualMutex,
	ScopedMutex,
	PermitGated,
}

impl PolicyKind {
	pub const ALL: [Self; 4] = [Self::Unsynchronized, Self::ManualMutex, Self::ScopedMutex, Self::PermitGated];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Unsynchronized => "unsynchronized",
			Self::ManualMutex => "manual-mutex",
			Self::ScopedMutex => "scoped-mutex",
			Self::PermitGated => "permit-gated",
		}
	}
}

impl fmt::Display for PolicyKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PolicyKind {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|kind| kind.as_str() == s)
			.ok_or_else(|| format!("unknown policy '{s}' (expected one of: unsynchronized, manual-mutex, scoped-mutex, permit-gated)"))
	}
}

/// Requester-name pattern that makes the run-id critical section fail.
///
/// Only variants that take a lock consult it: the failure is raised after
/// the lock is acquired and before it is released.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureSentinel(Option<String>);

impl FailureSentinel {
	pub const fn none() -> Self {
		Self(None)
	}

	pub fn matching(pattern: impl Into<String>) -> Self {
		Self(Some(pattern.into()))
	}

	pub fn pattern(&self) -> Option<&str> {
		self.0.as_deref()
	}

	/// Returns true when `requester` contains the pattern.
	pub fn trips(&self, requester: &str) -> bool {
		self.0.as_deref().is_some_and(|pattern| requester.contains(pattern))
	}

	pub(crate) fn check(&self, requester: &str) -> Result<()> {
		if self.trips(requester) {
			warn!(src = LOGGER_SRC, requester, "we crashed trying to get a test run for '{requester}'");
			return Err(RunError::InitializationFailed {
				requester: requester.to_string(),
			});
		}
		Ok(())
	}
}

/// Everything needed to build a policy instance.
#[derive(Clone)]
pub struct PolicySettings {
	pub pacer: Arc<dyn Pacer>,
	pub timing: Timing,
	pub sentinel: FailureSentinel,
	pub permits: usize,
	pub seed: Option<u64>,
}

impl PolicySettings {
	/// Default timing, no sentinel, [`DEFAULT_PERMITS`] permits, random seed.
	pub fn new(pacer: Arc<dyn Pacer>) -> Self {
		Self {
			pacer,
			timing: Timing::default(),
			sentinel: FailureSentinel::none(),
			permits: DEFAULT_PERMITS,
			seed: None,
		}
	}

	pub fn with_timing(mut self, timing: Timing) -> Self {
		self.timing = timing;
		self
	}

	pub fn with_sentinel(mut self, sentinel: FailureSentinel) -> Self {
		self.sentinel = sentinel;
		self
	}

	pub fn with_permits(mut self, permits: usize) -> Self {
		self.permits = permits;
		self
	}

	pub fn with_seed(mut self, seed: Option<u64>) -> Self {
		self.seed = seed;
		self
	}

	pub(crate) fn provisioner(&self) -> Provisioner {
		Provisioner::new(self.timing.init_steps, self.timing.init_step, Arc::clone(&self.pacer), self.seed)
	}

	pub(crate) fn transmitter(&self) -> Transmitter {
		Transmitter {
			pacer: Arc::clone(&self.pacer),
			duration: self.timing.transmit,
		}
	}
}

/// Builds the policy variant named by `kind`.
pub fn build_policy(kind: PolicyKind, settings: &PolicySettings) -> Arc<dyn AccessPolicy> {
	match kind {
		PolicyKind::Unsynchronized => Arc::new(Unsynchronized::new(settings)),
		PolicyKind::ManualMutex => Arc::new(ManualMutex::new(settings)),
		PolicyKind::ScopedMutex => Arc::new(ScopedMutex::new(settings)),
		PolicyKind::PermitGated => Arc::new(PermitGated::new(settings)),
	}
}

/// Point-in-time copy of a policy's shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
	pub run_id: Option<RunId>,
	pub state: RegistrarState,
	pub assignments: Vec<RunId>,
	pub records: Vec<ResultRecord>,
}

impl LedgerSnapshot {
	pub fn initializations(&self) -> usize {
		self.assignments.len()
	}

	/// Number of different run ids ever assigned.
	pub fn distinct_run_ids(&self) -> usize {
		self.assignments.iter().collect::<HashSet<_>>().len()
	}

	pub fn records_for(&self, worker: &str) -> usize {
		self.records.iter().filter(|r| r.worker == worker).count()
	}
}

/// Registrar and log as one unit of shared state.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
	pub(crate) registrar: RunRegistrar,
	pub(crate) log: ResultLog,
}

impl Ledger {
	pub(crate) fn snapshot(&self) -> LedgerSnapshot {
		LedgerSnapshot {
			run_id: self.registrar.existing().cloned(),
			state: self.registrar.state(),
			assignments: self.registrar.assignments().to_vec(),
			records: self.log.records().to_vec(),
		}
	}

	pub(crate) fn accept(&mut self, record: ResultRecord) {
		info!(
			src = LOGGER_SRC,
			worker = %record.worker,
			"test result '{}' for test id {} has been logged",
			record.outcome,
			record.sequence
		);
		self.log.append(record);
	}
}

/// Simulated result transmission to the backing server.
pub(crate) struct Transmitter {
	pacer: Arc<dyn Pacer>,
	duration: Duration,
}

impl Transmitter {
	pub(crate) fn send(&self, record: &ResultRecord) {
		info!(
			src = LOGGER_SRC,
			worker = %record.worker,
			"transmitting test results, this will take {:?}",
			self.duration
		);
		self.pacer.pause(Phase::ResultTransmission, self.duration);
	}

	pub(crate) const fn duration(&self) -> Duration {
		self.duration
	}
}
