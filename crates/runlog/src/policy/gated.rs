use tracing::{debug, info};

use super::{AccessPolicy, LedgerSnapshot, PolicyKind, PolicySettings, ScopedMutex};
use crate::LOGGER_SRC;
use crate::error::Result;
use crate::permits::{PermitPool, TransmitPermit};
use crate::record::{ResultRecord, RunId};

/// [`ScopedMutex`] plus a permit pool bounding concurrent transmissions.
///
/// Workers take a permit before handing a record over; the policy drops it
/// once the transmission and the log write are done. The pool and the
/// run-id lock are independent: holding a permit never blocks run-id
/// requests, and holding the lock never consumes a permit.
pub struct PermitGated {
	inner: ScopedMutex,
	permits: PermitPool,
}

impl PermitGated {
	pub fn new(settings: &PolicySettings) -> Self {
		Self {
			inner: ScopedMutex::new(settings),
			permits: PermitPool::new(settings.permits),
		}
	}

	pub fn permits(&self) -> &PermitPool {
		&self.permits
	}
}

impl AccessPolicy for PermitGated {
	fn kind(&self) -> PolicyKind {
		PolicyKind::PermitGated
	}

	fn request_run(&self, requester: &str) -> Result<RunId> {
		self.inner.request_run(requester)
	}

	fn acquire_transmit_slot(&self) -> Option<TransmitPermit<'_>> {
		debug!(
			src = LOGGER_SRC,
			available = self.permits.available(),
			"want to log test results, but first need a permit"
		);
		let permit = self.permits.acquire();
		debug!(src = LOGGER_SRC, "was given a permit, logging the result");
		Some(permit)
	}

	fn append<'a>(&'a self, record: ResultRecord, permit: Option<TransmitPermit<'a>>) {
		// A caller that skipped `acquire_transmit_slot` still has to wait its turn.
		let permit = permit.unwrap_or_else(|| self.permits.acquire());
		info!(
			src = LOGGER_SRC,
			worker = %record.worker,
			"runner wants to save test results, this will take {:?}",
			self.inner.transmitter().duration()
		);
		self.inner.append(record, Some(permit));
		info!(src = LOGGER_SRC, "finished saving test results, permit released");
	}

	fn snapshot(&self) -> LedgerSnapshot {
		self.inner.snapshot()
	}
}
