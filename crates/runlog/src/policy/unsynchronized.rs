use parking_lot::Mutex;
use tracing::info;

use super::{AccessPolicy, Ledger, LedgerSnapshot, PolicyKind, PolicySettings, Transmitter};
use crate::LOGGER_SRC;
use crate::error::Result;
use crate::permits::TransmitPermit;
use crate::record::{ResultRecord, RunId};
use crate::registrar::{Provisioner, log_already_created};

/// Baseline policy with no critical section around the run-id sequence.
///
/// Each read and write of the ledger is atomic on its own, so records are
/// never torn. The check for an existing id, the slow provisioning and the
/// assignment are three separate steps, though, and requesters that overlap
/// between the check and the assignment each create their own id. The last
/// assignment wins the slot.
pub struct Unsynchronized {
	ledger: Mutex<Ledger>,
	provisioner: Provisioner,
	transmitter: Transmitter,
}

impl Unsynchronized {
	pub fn new(settings: &PolicySettings) -> Self {
		Self {
			ledger: Mutex::new(Ledger::default()),
			provisioner: settings.provisioner(),
			transmitter: settings.transmitter(),
		}
	}
}

impl AccessPolicy for Unsynchronized {
	fn kind(&self) -> PolicyKind {
		PolicyKind::Unsynchronized
	}

	fn request_run(&self, requester: &str) -> Result<RunId> {
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

	fn append<'a>(&'a self, record: ResultRecord, _permit: Option<TransmitPermit<'a>>) {
		self.transmitter.send(&record);
		self.ledger.lock().accept(record);
	}

	fn snapshot(&self) -> LedgerSnapshot {
		self.ledger.lock().snapshot()
	}
}
