//! Built-in demo scenarios.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::{DemoConfig, Timing};
use crate::policy::{DEFAULT_PERMITS, FailureSentinel, PolicyKind};

#[cfg(test)]
mod tests;

/// Names of the preset scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioName {
	Basic,
	Sequential,
	Parallel,
	Mutex,
	Deadlock,
	CrashSafe,
	SafeMutex,
	Semaphore,
}

impl ScenarioName {
	pub const ALL: [Self; 8] = [
		Self::Basic,
		Self::Sequential,
		Self::Parallel,
		Self::Mutex,
		Self::Deadlock,
		Self::CrashSafe,
		Self::SafeMutex,
		Self::Semaphore,
	];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Basic => "basic",
			Self::Sequential => "sequential",
			Self::Parallel => "parallel",
			Self::Mutex => "mutex",
			Self::Deadlock => "deadlock",
			Self::CrashSafe => "crash-safe",
			Self::SafeMutex => "safe-mutex",
			Self::Semaphore => "semaphore",
		}
	}

	/// One-line summary for listings.
	pub const fn description(self) -> &'static str {
		match self {
			Self::Basic => "one runner, three tests, no synchronization",
			Self::Sequential => "two runners one after the other, sharing a run id",
			Self::Parallel => "two overlapping runners racing to create the run id",
			Self::Mutex => "manual lock around run id creation",
			Self::Deadlock => "manual lock abandoned by a failing runner; hangs forever",
			Self::CrashSafe => "scoped lock survives a failing runner",
			Self::SafeMutex => "scoped lock, no failures",
			Self::Semaphore => "four runners, at most two transmitting at once",
		}
	}
}

impl fmt::Display for ScenarioName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ScenarioName {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|name| name.as_str() == s).ok_or_else(|| {
			let known: Vec<_> = Self::ALL.iter().map(|name| name.as_str()).collect();
			format!("unknown scenario '{s}' (expected one of: {})", known.join(", "))
		})
	}
}

/// How the driver starts workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
	/// Each worker finishes before the next starts.
	Sequential,
	/// All workers run at once, started `Timing::stagger` apart.
	Concurrent,
}

/// One worker to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerPlan {
	pub name: String,
	pub tests: u32,
	/// OS thread name, `Thread-` plus the worker's initial by default.
	pub thread_name: String,
}

impl WorkerPlan {
	pub fn new(name: impl Into<String>, tests: u32) -> Self {
		let name = name.into();
		let thread_name = match name.trim().chars().next() {
			Some(initial) => format!("Thread-{initial}"),
			None => "Thread".to_string(),
		};
		Self { name, tests, thread_name }
	}

	pub fn with_thread_name(mut self, thread_name: impl Into<String>) -> Self {
		self.thread_name = thread_name.into();
		self
	}
}

/// A fully resolved demo: policy, workers and timing.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
	pub name: ScenarioName,
	pub policy: PolicyKind,
	pub launch: Launch,
	pub workers: Vec<WorkerPlan>,
	pub timing: Timing,
	pub sentinel: FailureSentinel,
	pub permits: usize,
}

impl Scenario {
	pub fn preset(name: ScenarioName) -> Self {
		let pair = |tests| vec![WorkerPlan::new("Alpha", tests), WorkerPlan::new("Beta", tests)];
		let (policy, launch, workers) = match name {
			ScenarioName::Basic => (PolicyKind::Unsynchronized, Launch::Sequential, vec![WorkerPlan::new("Alpha", 3)]),
			ScenarioName::Sequential => (PolicyKind::Unsynchronized, Launch::Sequential, pair(2)),
			ScenarioName::Parallel => (PolicyKind::Unsynchronized, Launch::Concurrent, pair(2)),
			ScenarioName::Mutex | ScenarioName::Deadlock => (PolicyKind::ManualMutex, Launch::Concurrent, pair(4)),
			ScenarioName::CrashSafe | ScenarioName::SafeMutex => (PolicyKind::ScopedMutex, Launch::Concurrent, pair(4)),
			ScenarioName::Semaphore => (
				PolicyKind::PermitGated,
				Launch::Concurrent,
				["Alpha", "Beta", "Delta", "Gamma"].into_iter().map(|n| WorkerPlan::new(n, 5)).collect(),
			),
		};

		let sentinel = match name {
			ScenarioName::Deadlock | ScenarioName::CrashSafe => FailureSentinel::matching("Alpha"),
			_ => FailureSentinel::none(),
		};

		let mut timing = Timing::default();
		if name == ScenarioName::Semaphore {
			timing.test_steps = 1;
			timing.transmit = Duration::from_secs(4);
		}

		Self {
			name,
			policy,
			launch,
			workers,
			timing,
			sentinel,
			permits: DEFAULT_PERMITS,
		}
	}

	/// Layers file or command-line configuration over the preset.
	pub fn with_config(mut self, config: &DemoConfig) -> Self {
		if let Some(policy) = config.policy {
			self.policy = policy;
		}
		if let Some(pattern) = &config.failure_sentinel {
			self.sentinel = if pattern.is_empty() {
				FailureSentinel::none()
			} else {
				FailureSentinel::matching(pattern.as_str())
			};
		}
		if let Some(permits) = config.permits {
			self.permits = permits;
		}
		self.timing = self.timing.apply(&config.timing);
		self
	}

	pub fn total_tests(&self) -> u32 {
		self.workers.iter().map(|w| w.tests).sum()
	}
}
