//! Currency amounts spelled out as English words.
//!
//! ```
//! use lockstep_wordify::words_for_amount;
//!
//! assert_eq!(
//! 	words_for_amount("$1,234.56").unwrap(),
//! 	"one thousand two hundred thirty-four dollars and fifty-six cents"
//! );
//! ```

/// Parsing and validation of amount text.
pub mod amount;
/// Error type shared by every conversion.
pub mod error;
/// Spelling of whole numbers below one thousand.
pub mod numerals;
/// Assembly of group words into a full phrase.
pub mod phrasing;

pub use amount::Amount;
pub use error::{Result, WordifyError};
pub use numerals::int_to_words;
pub use phrasing::Phrasing;

/// Spells out `text` using [`Phrasing::Spoken`].
///
/// `text` is a decimal numeral, optionally carrying `$` and `,` characters
/// anywhere (they are ignored). Fails with [`WordifyError::Format`] when the
/// text is not a numeral, with a range error when the amount is negative or
/// at least one billion, and with [`WordifyError::Precision`] when more than
/// two fractional digits are given.
pub fn words_for_amount(text: &str) -> Result<String> {
	words_for_amount_with(text, Phrasing::Spoken)
}

/// Spells out `text` with an explicit phrasing style.
pub fn words_for_amount_with(text: &str, phrasing: Phrasing) -> Result<String> {
	let amount = Amount::parse(text)?;
	Ok(phrasing.spell(amount))
}
