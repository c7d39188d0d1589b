//! Launches a scenario's workers against one shared policy.

use std::sync::Arc;
use std::thread;

use tracing::{debug, info, info_span, warn};

use crate::error::{Result, RunError};
use crate::pacer::{Pacer, Phase};
use crate::policy::{AccessPolicy, LedgerSnapshot, PolicyKind, PolicySettings, build_policy};
use crate::scenario::{Launch, Scenario, WorkerPlan};
use crate::worker::{Worker, WorkerSummary};

/// How one worker finished.
#[derive(Debug)]
pub struct WorkerOutcome {
	pub name: String,
	pub result: Result<WorkerSummary>,
}

/// Everything a finished demo produced.
#[derive(Debug)]
pub struct DemoReport {
	pub policy: PolicyKind,
	pub snapshot: LedgerSnapshot,
	pub workers: Vec<WorkerOutcome>,
}

impl DemoReport {
	/// True when every worker returned a summary.
	pub fn succeeded(&self) -> bool {
		self.workers.iter().all(|w| w.result.is_ok())
	}

	pub fn failures(&self) -> impl Iterator<Item = (&str, &RunError)> + '_ {
		self.workers
			.iter()
			.filter_map(|w| w.result.as_ref().err().map(|err| (w.name.as_str(), err)))
	}

	/// Result log lines in acceptance order.
	pub fn report_lines(&self) -> impl Iterator<Item = String> + '_ {
		self.snapshot.records.iter().map(ToString::to_string)
	}
}

/// Runs scenarios with a fixed pacer and optional seed.
pub struct Driver {
	pacer: Arc<dyn Pacer>,
	seed: Option<u64>,
}

impl Driver {
	pub fn new(pacer: Arc<dyn Pacer>) -> Self {
		Self { pacer, seed: None }
	}

	/// Fixes run-id suffixes and every worker's outcome sequence.
	pub fn with_seed(mut self, seed: Option<u64>) -> Self {
		self.seed = seed;
		self
	}

	/// Builds the policy instance `scenario` asks for.
	pub fn build_policy(&self, scenario: &Scenario) -> Arc<dyn AccessPolicy> {
		let settings = PolicySettings::new(Arc::clone(&self.pacer))
			.with_timing(scenario.timing)
			.with_sentinel(scenario.sentinel.clone())
			.with_permits(scenario.permits)
			.with_seed(self.seed);
		build_policy(scenario.policy, &settings)
	}

	/// Runs `scenario` against a fresh policy instance.
	pub fn run(&self, scenario: &Scenario) -> DemoReport {
		let policy = self.build_policy(scenario);
		self.run_with(scenario, policy.as_ref())
	}

	/// Runs `scenario`'s workers against an existing policy.
	///
	/// Blocks until every worker has finished. A worker stuck behind an
	/// abandoned lock never finishes, so neither does this call.
	pub fn run_with(&self, scenario: &Scenario, policy: &dyn AccessPolicy) -> DemoReport {
		info!(
			scenario = %scenario.name,
			policy = %policy.kind(),
			workers = scenario.workers.len(),
			initialization = ?scenario.timing.initialization(),
			per_test = ?scenario.timing.per_test(),
			"starting demo"
		);

		let workers: Vec<WorkerOutcome> = match scenario.launch {
			Launch::Sequential => scenario
				.workers
				.iter()
				.enumerate()
				.map(|(idx, plan)| thread::scope(|scope| self.launch(scope, idx, plan, scenario, policy)))
				.collect(),
			Launch::Concurrent => thread::scope(|scope| {
				let mut pending = Vec::with_capacity(scenario.workers.len());
				for (idx, plan) in scenario.workers.iter().enumerate() {
					if idx > 0 {
						self.pacer.pause(Phase::LaunchStagger, scenario.timing.stagger);
					}
					pending.push(self.start(scope, idx, plan, scenario, policy));
				}
				pending.into_iter().map(Pending::join).collect()
			}),
		};

		let report = DemoReport {
			policy: policy.kind(),
			snapshot: policy.snapshot(),
			workers,
		};
		log_report(&report);
		report
	}

	fn launch<'scope, 'env>(
		&'env self,
		scope: &'scope thread::Scope<'scope, 'env>,
		idx: usize,
		plan: &'env WorkerPlan,
		scenario: &'env Scenario,
		policy: &'env dyn AccessPolicy,
	) -> WorkerOutcome {
		self.start(scope, idx, plan, scenario, policy).join()
	}

	fn start<'scope, 'env>(
		&'env self,
		scope: &'scope thread::Scope<'scope, 'env>,
		idx: usize,
		plan: &'env WorkerPlan,
		scenario: &'env Scenario,
		policy: &'env dyn AccessPolicy,
	) -> Pending<'scope> {
		debug!(worker = %plan.name, thread = %plan.thread_name, "spawning runner thread");

		let mut worker = Worker::new(plan.name.as_str(), policy, Arc::clone(&self.pacer))
			.with_test_time(scenario.timing.test_steps, scenario.timing.test_step);
		if let Some(seed) = self.seed {
			worker = worker.with_seed(seed.wrapping_add(idx as u64 + 1));
		}
		let tests = plan.tests;

		let handle = thread::Builder::new().name(plan.thread_name.clone()).spawn_scoped(scope, move || {
			let _span = info_span!("runner", name = %worker.name()).entered();
			worker.run(tests)
		});

		Pending {
			name: plan.name.clone(),
			handle,
		}
	}
}

/// A spawned (or failed to spawn) worker thread.
struct Pending<'scope> {
	name: String,
	handle: std::io::Result<thread::ScopedJoinHandle<'scope, Result<WorkerSummary>>>,
}

impl Pending<'_> {
	fn join(self) -> WorkerOutcome {
		let result = match self.handle {
			Ok(handle) => handle.join().unwrap_or_else(|_| {
				Err(RunError::WorkerPanicked {
					worker: self.name.clone(),
				})
			}),
			Err(error) => Err(RunError::Spawn {
				worker: self.name.clone(),
				error,
			}),
		};
		WorkerOutcome { name: self.name, result }
	}
}

fn log_report(report: &DemoReport) {
	for (worker, err) in report.failures() {
		warn!(worker, "runner failed: {err}");
	}

	let snapshot = &report.snapshot;
	if snapshot.initializations() > 1 {
		warn!(
			initializations = snapshot.initializations(),
			distinct = snapshot.distinct_run_ids(),
			"the run id was created more than once"
		);
	}

	match &snapshot.run_id {
		Some(id) => info!("showing test results for run {id}:"),
		None => info!("no test run was created"),
	}
	for line in report.report_lines() {
		info!("{line}");
	}
	for outcome in &report.workers {
		info!(
			worker = %outcome.name,
			logged = snapshot.records_for(&outcome.name),
			"results logged by {}",
			outcome.name
		);
	}
}
