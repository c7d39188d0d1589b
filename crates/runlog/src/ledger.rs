//! Append-only result storage.

use crate::record::ResultRecord;

/// Results in the order they were accepted.
///
/// Plain data: callers decide how access is synchronized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultLog {
	records: Vec<ResultRecord>,
}

impl ResultLog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append(&mut self, record: ResultRecord) {
		self.records.push(record);
	}

	pub fn records(&self) -> &[ResultRecord] {
		&self.records
	}

}
