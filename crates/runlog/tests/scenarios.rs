//! End-to-end runs of the preset scenarios with injected pacers.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, mpsc};
use std::thread;
use std::time::Duration;

use lockstep_runlog::{
	ConfigError, DemoConfig, Driver, InstantPacer, Pacer, Phase, PolicyKind, RegistrarState, RunError, Scenario,
	ScenarioName, SleepPacer,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use rstest::rstest;

struct RendezvousPacer(Barrier);

impl Pacer for RendezvousPacer {
	fn pause(&self, phase: Phase, _duration: Duration) {
		if phase == Phase::RunInitialization {
			self.0.wait();
		}
	}
}

#[derive(Default)]
struct ProbePacer {
	in_flight: AtomicUsize,
	peak: AtomicUsize,
}

impl Pacer for ProbePacer {
	fn pause(&self, phase: Phase, _duration: Duration) {
		if phase == Phase::ResultTransmission {
			let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
			self.peak.fetch_max(now, Ordering::SeqCst);
			thread::sleep(Duration::from_millis(10));
			self.in_flight.fetch_sub(1, Ordering::SeqCst);
		}
	}
}

/// Remembers which threads ran simulated tests.
#[derive(Default)]
struct ThreadNamePacer(Mutex<HashSet<String>>);

impl Pacer for ThreadNamePacer {
	fn pause(&self, phase: Phase, _duration: Duration) {
		if phase == Phase::TestExecution
			&& let Some(name) = thread::current().name()
		{
			self.0.lock().insert(name.to_string());
		}
	}
}

fn instant() -> Driver {
	Driver::new(Arc::new(InstantPacer)).with_seed(Some(42))
}

#[rstest]
#[case::basic(ScenarioName::Basic)]
#[case::sequential(ScenarioName::Sequential)]
#[case::mutex(ScenarioName::Mutex)]
#[case::safe_mutex(ScenarioName::SafeMutex)]
#[case::semaphore(ScenarioName::Semaphore)]
fn clean_scenarios_share_one_run_id(#[case] name: ScenarioName) {
	let scenario = Scenario::preset(name);
	let report = instant().run(&scenario);

	assert!(report.succeeded());
	assert_eq!(report.snapshot.initializations(), 1);
	assert_eq!(report.snapshot.records.len(), scenario.total_tests() as usize);

	let ids: HashSet<_> = report
		.workers
		.iter()
		.map(|w| w.result.as_ref().map(|s| s.run_id.clone()).unwrap())
		.collect();
	assert_eq!(ids.len(), 1);
	for plan in &scenario.workers {
		assert_eq!(report.snapshot.records_for(&plan.name), plan.tests as usize);
	}
}

#[test]
fn sequential_runs_keep_worker_order() {
	let report = instant().run(&Scenario::preset(ScenarioName::Sequential));
	let order: Vec<_> = report
		.snapshot
		.records
		.iter()
		.map(|r| (r.worker.as_str(), r.sequence))
		.collect();
	assert_eq!(order, [("Alpha", 1), ("Alpha", 2), ("Beta", 1), ("Beta", 2)]);
	assert_eq!(report.snapshot.run_id.as_ref().map(|id| id.requester()), Some("Alpha"));
}

#[test]
fn parallel_runners_race_to_create_the_run_id() {
	let driver = Driver::new(Arc::new(RendezvousPacer(Barrier::new(2))));
	let report = driver.run(&Scenario::preset(ScenarioName::Parallel));

	assert!(report.succeeded());
	assert_eq!(report.snapshot.initializations(), 2);
	assert_eq!(report.snapshot.records.len(), 4);
}

#[test]
fn crash_safe_scenario_lets_the_survivor_finish() {
	let report = instant().run(&Scenario::preset(ScenarioName::CrashSafe));

	assert!(!report.succeeded());
	let failures: Vec<_> = report.failures().collect();
	assert_eq!(failures.len(), 1);
	assert_eq!(failures[0].0, "Alpha");
	assert!(matches!(failures[0].1, RunError::InitializationFailed { .. }));

	assert_eq!(report.snapshot.records_for("Alpha"), 0);
	assert_eq!(report.snapshot.records_for("Beta"), 4);
	assert_eq!(report.snapshot.run_id.as_ref().map(|id| id.requester()), Some("Beta"));
}

#[test]
fn deadlock_scenario_never_finishes() {
	let scenario = Scenario::preset(ScenarioName::Deadlock);
	// The real stagger lets Alpha fail before Beta asks for the run id.
	let driver = || Driver::new(Arc::new(SleepPacer::new(0.05)));
	let policy = driver().build_policy(&scenario);
	assert_eq!(policy.kind(), PolicyKind::ManualMutex);

	let (tx, rx) = mpsc::channel();
	let shared = Arc::clone(&policy);
	// Never joined: Beta waits on the abandoned lock forever.
	thread::spawn(move || {
		let report = driver().run_with(&scenario, shared.as_ref());
		let _ = tx.send(report.succeeded());
	});

	assert!(matches!(
		rx.recv_timeout(Duration::from_millis(300)),
		Err(mpsc::RecvTimeoutError::Timeout)
	));
	let snapshot = policy.snapshot();
	assert_eq!(snapshot.state, RegistrarState::PermanentlyLocked);
	assert!(snapshot.records.is_empty());
}

#[test]
fn semaphore_scenario_transmits_at_most_two_at_once() {
	let probe = Arc::new(ProbePacer::default());
	let report = Driver::new(Arc::clone(&probe) as Arc<dyn Pacer>).run(&Scenario::preset(ScenarioName::Semaphore));

	assert!(report.succeeded());
	assert_eq!(report.snapshot.records.len(), 20);
	let peak = probe.peak.load(Ordering::SeqCst);
	assert!((1..=2).contains(&peak), "peak of {peak} concurrent transmissions");
}

#[test]
fn seeded_runs_repeat_exactly() {
	let scenario = Scenario::preset(ScenarioName::Sequential);
	let first = instant().run(&scenario);
	let second = instant().run(&scenario);
	assert_eq!(first.snapshot, second.snapshot);
}

#[test]
fn oversized_time_scale_is_rejected_before_running() {
	let err = DemoConfig::from_toml("time_scale = 1e30").unwrap_err();
	assert!(matches!(err, ConfigError::Invalid(_)));
	assert!(err.to_string().contains("time_scale"), "got: {err}");
}

#[test]
fn runners_run_on_threads_named_by_initial() {
	let pacer = Arc::new(ThreadNamePacer::default());
	let report = Driver::new(Arc::clone(&pacer) as Arc<dyn Pacer>).run(&Scenario::preset(ScenarioName::Semaphore));
	assert!(report.succeeded());

	let mut names: Vec<_> = pacer.0.lock().iter().cloned().collect();
	names.sort();
	assert_eq!(names, ["Thread-A", "Thread-B", "Thread-D", "Thread-G"]);
}
