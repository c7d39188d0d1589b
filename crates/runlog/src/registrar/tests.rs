use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::pacer::InstantPacer;

fn provisioner(seed: u64) -> Provisioner {
	Provisioner::new(4, Duration::from_secs(1), Arc::new(InstantPacer), Some(seed))
}

#[test]
fn first_request_assigns_and_later_requests_reuse() {
	let mut registrar = RunRegistrar::new();
	let provisioner = provisioner(1);

	let first = registrar.request_run("Alpha", &provisioner);
	let second = registrar.request_run("Beta", &provisioner);

	assert_eq!(first, second);
	assert_eq!(first.requester(), "Alpha");
	assert_eq!(registrar.initializations(), 1);
	assert_eq!(registrar.state(), RegistrarState::Assigned(first));
}

#[test]
fn starts_empty() {
	let registrar = RunRegistrar::new();
	assert_eq!(registrar.state(), RegistrarState::Empty);
	assert!(registrar.existing().is_none());
	assert!(registrar.assignments().is_empty());
}

#[test]
fn begun_provisioning_reports_initializing() {
	let mut registrar = RunRegistrar::new();
	registrar.begin();
	assert_eq!(registrar.state(), RegistrarState::Initializing);
	registrar.assign(provisioner(2).provision("Alpha"));
	assert!(matches!(registrar.state(), RegistrarState::Assigned(_)));
}

#[test]
fn overlapping_assignments_are_all_recorded() {
	let mut registrar = RunRegistrar::new();
	let provisioner = provisioner(3);
	registrar.begin();
	registrar.begin();
	let alpha = provisioner.provision("Alpha");
	let beta = provisioner.provision("Beta");
	registrar.assign(alpha.clone());
	registrar.assign(beta.clone());

	assert_eq!(registrar.assignments(), [alpha, beta.clone()]);
	assert_eq!(registrar.existing(), Some(&beta));
	assert_eq!(registrar.initializations(), 2);
}

#[test]
fn provisioning_pauses_once_per_step() {
	struct CountingPacer(parking_lot::Mutex<Vec<(Phase, Duration)>>);
	impl Pacer for CountingPacer {
		fn pause(&self, phase: Phase, duration: Duration) {
			self.0.lock().push((phase, duration));
		}
	}

	let pacer = Arc::new(CountingPacer(parking_lot::Mutex::new(Vec::new())));
	let provisioner = Provisioner::new(4, Duration::from_millis(250), pacer.clone(), Some(9));
	provisioner.provision("Gamma");

	let pauses = pacer.0.lock();
	assert_eq!(pauses.len(), 4);
	assert!(pauses.iter().all(|&(phase, d)| phase == Phase::RunInitialization && d == Duration::from_millis(250)));
}

#[test]
fn seeded_suffixes_are_reproducible_and_bounded() {
	let a = provisioner(42).provision("Delta");
	let b = provisioner(42).provision("Delta");
	assert_eq!(a, b);

	let suffix: u16 = a.as_str().rsplit_once('_').unwrap().1.parse().unwrap();
	assert!(suffix < Provisioner::SUFFIX_RANGE);
}
