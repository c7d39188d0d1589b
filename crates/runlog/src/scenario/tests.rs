use std::time::Duration;

use rstest::rstest;

use super::*;
use crate::config::TimingOverrides;

#[rstest]
#[case(ScenarioName::Basic, PolicyKind::Unsynchronized, Launch::Sequential, 1, 3)]
#[case(ScenarioName::Sequential, PolicyKind::Unsynchronized, Launch::Sequential, 2, 4)]
#[case(ScenarioName::Parallel, PolicyKind::Unsynchronized, Launch::Concurrent, 2, 4)]
#[case(ScenarioName::Mutex, PolicyKind::ManualMutex, Launch::Concurrent, 2, 8)]
#[case(ScenarioName::Deadlock, PolicyKind::ManualMutex, Launch::Concurrent, 2, 8)]
#[case(ScenarioName::CrashSafe, PolicyKind::ScopedMutex, Launch::Concurrent, 2, 8)]
#[case(ScenarioName::SafeMutex, PolicyKind::ScopedMutex, Launch::Concurrent, 2, 8)]
#[case(ScenarioName::Semaphore, PolicyKind::PermitGated, Launch::Concurrent, 4, 20)]
fn preset_shapes(
	#[case] name: ScenarioName,
	#[case] policy: PolicyKind,
	#[case] launch: Launch,
	#[case] workers: usize,
	#[case] tests: u32,
) {
	let scenario = Scenario::preset(name);
	assert_eq!(scenario.policy, policy);
	assert_eq!(scenario.launch, launch);
	assert_eq!(scenario.workers.len(), workers);
	assert_eq!(scenario.total_tests(), tests);
	assert_eq!(scenario.permits, DEFAULT_PERMITS);
}

#[test]
fn only_failure_scenarios_carry_a_sentinel() {
	for name in ScenarioName::ALL {
		let expected = matches!(name, ScenarioName::Deadlock | ScenarioName::CrashSafe);
		assert_eq!(Scenario::preset(name).sentinel.trips("Alpha"), expected, "{name}");
	}
}

#[test]
fn semaphore_runs_short_tests_and_slow_transmissions() {
	let timing = Scenario::preset(ScenarioName::Semaphore).timing;
	assert_eq!(timing.test_steps, 1);
	assert_eq!(timing.transmit, Duration::from_secs(4));
	assert_eq!(Scenario::preset(ScenarioName::Mutex).timing, Timing::default());
}

#[test]
fn names_parse_back() {
	for name in ScenarioName::ALL {
		assert_eq!(name.as_str().parse::<ScenarioName>(), Ok(name));
		assert!(!name.description().is_empty());
	}
	let err = "locks".parse::<ScenarioName>().unwrap_err();
	assert!(err.contains("crash-safe"));
}

#[test]
fn config_overrides_preset() {
	let config = DemoConfig {
		policy: Some(PolicyKind::ScopedMutex),
		failure_sentinel: Some("Beta".to_string()),
		permits: Some(3),
		timing: TimingOverrides {
			transmit_ms: Some(10),
			..TimingOverrides::default()
		},
		..DemoConfig::default()
	};
	let scenario = Scenario::preset(ScenarioName::Deadlock).with_config(&config);

	assert_eq!(scenario.policy, PolicyKind::ScopedMutex);
	assert!(scenario.sentinel.trips("Beta"));
	assert!(!scenario.sentinel.trips("Alpha"));
	assert_eq!(scenario.permits, 3);
	assert_eq!(scenario.timing.transmit, Duration::from_millis(10));
	assert_eq!(scenario.timing.init_steps, 4);
}

#[test]
fn empty_sentinel_disables_failure() {
	let config = DemoConfig {
		failure_sentinel: Some(String::new()),
		..DemoConfig::default()
	};
	let scenario = Scenario::preset(ScenarioName::CrashSafe).with_config(&config);
	assert_eq!(scenario.sentinel, FailureSentinel::none());
}

#[test]
fn threads_are_named_by_initial() {
	let names: Vec<_> = Scenario::preset(ScenarioName::Semaphore)
		.workers
		.into_iter()
		.map(|plan| plan.thread_name)
		.collect();
	assert_eq!(names, ["Thread-A", "Thread-B", "Thread-D", "Thread-G"]);
}

#[test]
fn explicit_thread_name_wins() {
	let plan = WorkerPlan::new("Alpha", 1).with_thread_name("runner-1");
	assert_eq!(plan.thread_name, "runner-1");
	assert_eq!(WorkerPlan::new("", 1).thread_name, "Thread");
}
