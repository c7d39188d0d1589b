use clap::Parser;
use rstest::rstest;

use super::*;

fn parse(args: &[&str]) -> Cli {
	Cli::try_parse_from(std::iter::once("lockstep").chain(args.iter().copied())).unwrap()
}

#[test]
fn wordify_takes_the_raw_amount() {
	let cli = parse(&["wordify", "$1,234.56"]);
	assert!(matches!(cli.command, Command::Wordify { ref amount, ledger: false } if amount == "$1,234.56"));
}

#[test]
fn wordify_accepts_negative_amounts_as_values() {
	let cli = parse(&["wordify", "-5", "--ledger"]);
	assert!(matches!(cli.command, Command::Wordify { ref amount, ledger: true } if amount == "-5"));
}

#[test]
fn demo_collects_overrides() {
	let cli = parse(&[
		"-v",
		"demo",
		"crash-safe",
		"--config",
		"demo.toml",
		"--time-scale",
		"0.1",
		"--seed",
		"7",
		"--sentinel",
		"Beta",
		"--policy",
		"manual-mutex",
	]);
	assert!(cli.verbose);
	let Command::Demo {
		scenario,
		config,
		time_scale,
		seed,
		sentinel,
		policy,
	} = cli.command
	else {
		panic!("expected demo command");
	};
	assert_eq!(scenario, ScenarioName::CrashSafe);
	assert_eq!(config, Some(PathBuf::from("demo.toml")));
	assert_eq!(time_scale, Some(0.1));
	assert_eq!(seed, Some(7));
	assert_eq!(sentinel.as_deref(), Some("Beta"));
	assert_eq!(policy, Some(PolicyKind::ManualMutex));
}

#[test]
fn verbose_is_accepted_after_the_subcommand() {
	assert!(parse(&["scenarios", "--verbose"]).verbose);
}

#[rstest]
#[case(&["demo", "locks"])]
#[case(&["demo", "basic", "--policy", "spinlock"])]
#[case(&["wordify"])]
#[case(&[])]
fn rejects_bad_arguments(#[case] args: &[&str]) {
	let argv = std::iter::once("lockstep").chain(args.iter().copied());
	assert!(Cli::try_parse_from(argv).is_err());
}
