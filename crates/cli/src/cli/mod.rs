//! CLI schema for the lockstep binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lockstep_runlog::{PolicyKind, ScenarioName};

#[derive(Parser, Debug)]
#[command(name = "lockstep")]
#[command(about = "Currency-to-words converter and concurrent test-logger demos")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Log lock and permit bookkeeping too
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Spell a dollar amount in words
	Wordify {
		/// Amount such as `$1,234.56`
		#[arg(allow_hyphen_values = true)]
		amount: String,

		/// Comma-separated groups, `and` only before cents
		#[arg(long)]
		ledger: bool,
	},
	/// Run a concurrency demo scenario
	Demo {
		/// Scenario name (see `lockstep scenarios`)
		scenario: ScenarioName,

		/// TOML file layered over the scenario preset
		#[arg(short, long, value_name = "PATH")]
		config: Option<PathBuf>,

		/// Multiplier applied to every simulated delay
		#[arg(long, value_name = "FACTOR")]
		time_scale: Option<f64>,

		/// Fix run ids and test outcomes
		#[arg(long)]
		seed: Option<u64>,

		/// Requester name fragment that makes run creation fail; empty disables
		#[arg(long, value_name = "NAME")]
		sentinel: Option<String>,

		/// Swap the scenario's access policy
		#[arg(long)]
		policy: Option<PolicyKind>,
	},
	/// List the demo scenarios
	Scenarios,
}

#[cfg(test)]
mod tests;
