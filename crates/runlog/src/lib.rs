//! Simulated test runners sharing one result logger.
//!
//! Every [`Worker`] asks the shared [`AccessPolicy`] for a run identifier,
//! then logs a handful of results through it. The policy variants differ
//! only in how they protect that shared state:
//!
//! * [`Unsynchronized`] checks and assigns the run id without a critical
//!   section, so racing workers can each create one.
//! * [`ManualMutex`] takes and releases a raw lock by hand; a failure between
//!   the two leaves it locked forever.
//! * [`ScopedMutex`] holds a guard for the whole section, so failures still
//!   release the lock.
//! * [`PermitGated`] adds a two-permit pool around result transmission on
//!   top of the scoped lock.
//!
//! The [`Driver`] runs a [`Scenario`] against one policy instance and
//! returns a [`DemoReport`]. All simulated latency goes through a [`Pacer`].

pub mod config;
pub mod driver;
pub mod error;
pub mod ledger;
pub mod pacer;
pub mod permits;
pub mod policy;
pub mod record;
pub mod registrar;
pub mod scenario;
pub mod worker;

pub use config::{DemoConfig, MAX_TIME_SCALE, Timing, TimingOverrides};
pub use driver::{DemoReport, Driver, WorkerOutcome};
pub use error::{ConfigError, Result, RunError};
pub use ledger::ResultLog;
pub use pacer::{InstantPacer, Pacer, Phase, SleepPacer};
pub use permits::{PermitPool, TransmitPermit};
pub use policy::{
	AccessPolicy, FailureSentinel, LedgerSnapshot, ManualMutex, PermitGated, PolicyKind, PolicySettings, ScopedMutex,
	Unsynchronized, build_policy,
};
pub use record::{Outcome, ResultRecord, RunId};
pub use registrar::{Provisioner, RegistrarState, RunRegistrar};
pub use scenario::{Launch, Scenario, ScenarioName, WorkerPlan};
pub use worker::{Worker, WorkerSummary};

/// Value of the `src` field on events emitted from the shared logger side.
pub(crate) const LOGGER_SRC: &str = "logger";
