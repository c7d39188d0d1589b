//! Run identifiers and result records.

use std::fmt;

/// Identifier of a test run on the simulated backing server.
///
/// Formatted as `{requester}_{suffix}`, remembering which requester's call
/// actually created it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
	pub(crate) fn synthesize(requester: &str, suffix: u16) -> Self {
		Self(format!("{requester}_{suffix}"))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Name of the requester whose call created this id.
	pub fn requester(&self) -> &str {
		self.0.rsplit_once('_').map_or(self.0.as_str(), |(requester, _)| requester)
	}
}

impl fmt::Display for RunId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Outcome of one simulated test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
	Pass,
	Fail,
	Skip,
	ExpectedFail,
	Timeout,
}

impl Outcome {
	/// Every outcome, in the order workers draw from.
	pub const ALL: [Self; 5] = [Self::Pass, Self::Fail, Self::Skip, Self::ExpectedFail, Self::Timeout];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Pass => "pass",
			Self::Fail => "fail",
			Self::Skip => "skip",
			Self::ExpectedFail => "xfail",
			Self::Timeout => "timeout",
		}
	}
}

impl fmt::Display for Outcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One logged test result. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultRecord {
	pub worker: String,
	pub sequence: u32,
	pub outcome: Outcome,
}

impl ResultRecord {
	pub fn new(worker: impl Into<String>, sequence: u32, outcome: Outcome) -> Self {
		Self {
			worker: worker.into(),
			sequence,
			outcome,
		}
	}
}

impl fmt::Display for ResultRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:>7} {}: {}", self.worker, self.sequence, self.outcome)
	}
}
