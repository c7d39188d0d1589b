//! Parsing of amount text into whole cents.

use std::fmt;
use std::str::FromStr;

use crate::{Result, WordifyError};


/// Number of cents in one dollar.
pub const CENTS_PER_DOLLAR: u64 = 100;

/// Exclusive upper bound on amounts, in dollars.
pub const DOLLAR_LIMIT: u64 = 1_000_000_000;

/// Maximum number of fractional digits accepted.
const MAX_FRACTION_DIGITS: usize = 2;

/// A validated, non-negative amount below [`DOLLAR_LIMIT`], held in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
	cents: u64,
}

impl Amount {
	/// Builds an amount from a cent count.
	pub fn from_cents(cents: u64) -> Result<Self> {
		if cents >= DOLLAR_LIMIT * CENTS_PER_DOLLAR {
			return Err(WordifyError::TooLarge(Self { cents }.to_string()));
		}
		Ok(Self { cents })
	}

	/// Parses amount text such as `$1,234.56`, `0.33` or `.01`.
	///
	/// `$` and `,` are dropped wherever they appear and surrounding
	/// whitespace is trimmed. The rest must be `[+-]?digits[.digits]` with at
	/// least one digit. Range is checked before sign, and sign before
	/// precision, so `-10.123` is reported as negative.
	pub fn parse(text: &str) -> Result<Self> {
		let cleaned: String = text.chars().filter(|c| !matches!(c, '$' | ',')).collect();
		let numeral = cleaned.trim();

		let (negative, unsigned) = if let Some(rest) = numeral.strip_prefix('-') {
			(true, rest)
		} else if let Some(rest) = numeral.strip_prefix('+') {
			(false, rest)
		} else {
			(false, numeral)
		};

		let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
		let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
		if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
			return Err(WordifyError::Format(text.to_string()));
		}

		let significant = whole.trim_start_matches('0');
		let is_zero = significant.is_empty() && fraction.bytes().all(|b| b == b'0');

		// Nine significant digits is the most a dollar count below the limit can have.
		if !negative && significant.len() > 9 {
			return Err(WordifyError::TooLarge(numeral.to_string()));
		}
		if negative && !is_zero {
			return Err(WordifyError::Negative(numeral.to_string()));
		}
		if fraction.len() > MAX_FRACTION_DIGITS {
			return Err(WordifyError::Precision(numeral.to_string()));
		}

		let dollars = digits_value(significant);
		let cents = digits_value(fraction) * 10u64.pow((MAX_FRACTION_DIGITS - fraction.len()) as u32);
		Self::from_cents(dollars * CENTS_PER_DOLLAR + cents)
	}

	/// Total value in cents.
	pub const fn cents(self) -> u64 {
		self.cents
	}

	/// Whole dollars.
	pub const fn dollars(self) -> u64 {
		self.cents / CENTS_PER_DOLLAR
	}

	/// Cents beyond the whole dollars, `0..100`.
	pub const fn fractional_cents(self) -> u64 {
		self.cents % CENTS_PER_DOLLAR
	}
}

/// Value of an all-ASCII-digit string of at most nine digits.
fn digits_value(digits: &str) -> u64 {
	digits.bytes().fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
}

impl FromStr for Amount {
	type Err = WordifyError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "${}.{:02}", self.dollars(), self.fractional_cents())
	}
}
