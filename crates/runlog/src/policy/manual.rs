use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use parking_lot::lock_api::RawMutex as _;
use tracing::{debug, info, warn};

use super::{AccessPolicy, FailureSentinel, Ledger, LedgerSnapshot, PolicyKind, PolicySettings, Transmitter};
use crate::LOGGER_SRC;
use crate::error::Result;
use crate::permits::TransmitPermit;
use crate::record::{ResultRecord, RunId};
use crate::registrar::{Provisioner, RegistrarState, log_already_created};

/// Lock taken and released by hand around the run-id sequence.
///
/// The release is a separate statement at the end of the section. If the
/// section returns early with an error, the release never runs and every
/// later caller blocks forever. This variant exists to show that failure
/// mode; [`ScopedMutex`](super::ScopedMutex) is the fix.
pub struct ManualMutex {
	gate: parking_lot::RawMutex,
	abandoned: AtomicBool,
	ledger: Mutex<Ledger>,
	provisioner: Provisioner,
	transmitter: Transmitter,
	sentinel: FailureSentinel,
}

impl ManualMutex {
	pub fn new(settings: &PolicySettings) -> Self {
		Self {
			gate: parking_lot::RawMutex::INIT,
			abandoned: AtomicBool::new(false),
			ledger: Mutex::new(Ledger::default()),
			provisioner: settings.provisioner(),
			transmitter: settings.transmitter(),
			sentinel: settings.sentinel.clone(),
		}
	}

	/// True once a failed request left the gate locked.
	pub fn is_abandoned(&self) -> bool {
		self.abandoned.load(Ordering::Acquire)
	}

	/// Body of the critical section. Runs with `gate` held.
	fn locked_request(&self, requester: &str) -> Result<RunId> {
		if let Err(err) = self.sentinel.check(requester) {
			self.abandoned.store(true, Ordering::Release);
			warn!(src = LOGGER_SRC, requester, "request_run bailed out before releasing its lock");
			return Err(err);
		}

		info!(src = LOGGER_SRC, requester, "getting a new test run id for '{requester}'");
		let existing = self.ledger.lock().registrar.existing().cloned();
		if let Some(id) = existing {
			log_already_created(requester, &id);
			return Ok(id);
		}

		self.ledger.lock().registrar.begin();
		let id = self.provisioner.provision(requester);
		self.ledger.lock().registrar.assign(id.clone());
		Ok(id)
	}
}

impl AccessPolicy for ManualMutex {
	fn kind(&self) -> PolicyKind {
		PolicyKind::ManualMutex
	}

	fn request_run(&self, requester: &str) -> Result<RunId> {
		info!(src = LOGGER_SRC, requester, "'{requester}' has requested a new test run, but will it get it?");

		self.gate.lock();
		debug!(src = LOGGER_SRC, requester, "'{requester}' now has a lock on request_run");

		let id = self.locked_request(requester)?;

		// SAFETY: `gate` was locked by this thread at the top of this function
		// and nothing between there and here unlocks it.
		unsafe { self.gate.unlock() };
		debug!(src = LOGGER_SRC, requester, "'{requester}' has released its lock on request_run");
		Ok(id)
	}

	fn append<'a>(&'a self, record: ResultRecord, _permit: Option<TransmitPermit<'a>>) {
		self.transmitter.send(&record);

		self.gate.lock();
		self.ledger.lock().accept(record);
		// SAFETY: locked by this thread two statements above.
		unsafe { self.gate.unlock() };
	}

	fn snapshot(&self) -> LedgerSnapshot {
		let mut snapshot = self.ledger.lock().snapshot();
		if self.is_abandoned() {
			snapshot.state = RegistrarState::PermanentlyLocked;
		}
		snapshot
	}
}
