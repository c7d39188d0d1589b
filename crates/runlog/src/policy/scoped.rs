use parking_lot::Mutex;
use tracing::{debug, info};

use super::{AccessPolicy, FailureSentinel, Ledger, LedgerSnapshot, PolicyKind, PolicySettings, Transmitter};
use crate::LOGGER_SRC;
use crate::error::Result;
use crate::permits::TransmitPermit;
use crate::record::{ResultRecord, RunId};
use crate::registrar::Provisioner;

/// Lock held by a guard for the whole run-id sequence.
///
/// The registrar and the log sit inside the mutex, so the only way to reach
/// them is through the guard, and the guard releases the lock on every exit
/// path. A failed request leaves the slot empty for the next caller.
pub struct ScopedMutex {
	ledger: Mutex<Ledger>,
	provisioner: Provisioner,
	transmitter: Transmitter,
	sentinel: FailureSentinel,
}

impl ScopedMutex {
	pub fn new(settings: &PolicySettings) -> Self {
		Self {
			ledger: Mutex::new(Ledger::default()),
			provisioner: settings.provisioner(),
			transmitter: settings.transmitter(),
			sentinel: settings.sentinel.clone(),
		}
	}

	pub(crate) fn transmitter(&self) -> &Transmitter {
		&self.transmitter
	}
}

impl AccessPolicy for ScopedMutex {
	fn kind(&self) -> PolicyKind {
		PolicyKind::ScopedMutex
	}

	fn request_run(&self, requester: &str) -> Result<RunId> {
		info!(src = LOGGER_SRC, requester, "'{requester}' has requested a new test run, but will it get it?");

		let id = {
			let mut ledger = self.ledger.lock();
			debug!(src = LOGGER_SRC, requester, "'{requester}' now has a lock on request_run");
			self.sentinel.check(requester)?;
			ledger.registrar.request_run(requester, &self.provisioner)
		};

		debug!(src = LOGGER_SRC, requester, "'{requester}' has released its lock on request_run");
		Ok(id)
	}

	fn append<'a>(&'a self, record: ResultRecord, permit: Option<TransmitPermit<'a>>) {
		self.transmitter.send(&record);
		self.ledger.lock().accept(record);
		drop(permit);
	}

	fn snapshot(&self) -> LedgerSnapshot {
		self.ledger.lock().snapshot()
	}
}
