//! lockstep binary.
//!
//! Spells dollar amounts in words and runs the concurrent test-logger
//! demos.

mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use lockstep_runlog::{DemoConfig, Driver, PolicyKind, Scenario, ScenarioName, SleepPacer};
use lockstep_wordify::{Phrasing, words_for_amount_with};
use tracing::{info, warn};

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	match cli.command {
		Command::Wordify { amount, ledger } => Ok(wordify(&amount, ledger)),
		Command::Demo {
			scenario,
			config,
			time_scale,
			seed,
			sentinel,
			policy,
		} => {
			let mut config = match config {
				Some(path) => load_config(&path)?,
				None => DemoConfig::default(),
			};
			apply_flags(&mut config, time_scale, seed, sentinel, policy);
			config.validate()?;
			Ok(demo(scenario, &config))
		}
		Command::Scenarios => {
			for name in ScenarioName::ALL {
				println!("{:<12} {}", name.as_str(), name.description());
			}
			Ok(ExitCode::SUCCESS)
		}
	}
}

fn wordify(amount: &str, ledger: bool) -> ExitCode {
	let phrasing = if ledger { Phrasing::Ledger } else { Phrasing::Spoken };
	match words_for_amount_with(amount, phrasing) {
		Ok(words) => {
			println!("{words}");
			ExitCode::SUCCESS
		}
		Err(err) => {
			println!("{err}");
			ExitCode::FAILURE
		}
	}
}

fn load_config(path: &Path) -> anyhow::Result<DemoConfig> {
	DemoConfig::load(path).with_context(|| format!("loading {}", path.display()))
}

/// Command-line flags win over file values.
fn apply_flags(
	config: &mut DemoConfig,
	time_scale: Option<f64>,
	seed: Option<u64>,
	sentinel: Option<String>,
	policy: Option<PolicyKind>,
) {
	if let Some(scale) = time_scale {
		config.time_scale = scale;
	}
	if seed.is_some() {
		config.seed = seed;
	}
	if sentinel.is_some() {
		config.failure_sentinel = sentinel;
	}
	if policy.is_some() {
		config.policy = policy;
	}
}

fn demo(name: ScenarioName, config: &DemoConfig) -> ExitCode {
	let scenario = Scenario::preset(name).with_config(config);
	if name == ScenarioName::Deadlock {
		warn!("this scenario never finishes; stop it with Ctrl-C");
	}

	let driver = Driver::new(Arc::new(SleepPacer::new(config.time_scale))).with_seed(config.seed);
	let report = driver.run(&scenario);

	if report.succeeded() {
		info!(records = report.snapshot.records.len(), "demo finished");
		ExitCode::SUCCESS
	} else {
		warn!(failed = report.failures().count(), "demo finished with failed runners");
		ExitCode::FAILURE
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_thread_names(true)
		.with_target(false)
		.init();
}
