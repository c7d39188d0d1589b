//! Error types for amount conversion.

use thiserror::Error;

/// Errors produced while converting an amount to words.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordifyError {
	/// The text is not a decimal numeral.
	#[error("'{0}' is not a number; only digits, one period, commas and dollar signs are allowed")]
	Format(String),

	/// The amount is one billion or more.
	#[error("{0} is too large; amounts must be below 1,000,000,000")]
	TooLarge(String),

	/// The amount is below zero.
	#[error("{0} is negative; amounts must be zero or more")]
	Negative(String),

	/// More than two fractional digits were given.
	#[error("{0} has more than two decimal places")]
	Precision(String),

	/// A whole number outside `0..=999` was passed to the numeral speller.
	#[error("cannot spell {0}; only 0 through 999 are supported")]
	OutOfRange(u32),
}

impl WordifyError {
	/// Returns true for errors about the magnitude or sign of an amount.
	pub const fn is_range_error(&self) -> bool {
		matches!(self, Self::TooLarge(_) | Self::Negative(_))
	}
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, WordifyError>;
