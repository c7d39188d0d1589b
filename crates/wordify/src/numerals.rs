use crate::{Result, WordifyError};


const ONES: [&str; 20] = [
	"zero",
	"one",
	"two",
	"three",
	"four",
	"five",
	"six",
	"seven",
	"eight",
	"nine",
	"ten",
	"eleven",
	"twelve",
	"thirteen",
	"fourteen",
	"fifteen",
	"sixteen",
	"seventeen",
	"eighteen",
	"nineteen",
];

const TENS: [&str; 10] = ["", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety"];

/// Spells a whole number between 0 and 999.
///
/// Uses the short-scale construction: hundreds, then tens or teens, then
/// ones, with compound tens joined by a hyphen (`forty-two`). `zero` is only
/// produced for 0 itself.
pub fn int_to_words(number: u32) -> Result<String> {
	if number > 999 {
		return Err(WordifyError::OutOfRange(number));
	}
	Ok(spell_group(u64::from(number)))
}

/// Spells one three-digit group. Callers guarantee `number < 1000`.
pub(crate) fn spell_group(number: u64) -> String {
	debug_assert!(number < 1000, "group value {number} exceeds three digits");
	if number == 0 {
		return ONES[0].to_string();
	}

	let hundreds = (number / 100) as usize;
	let rest = (number % 100) as usize;
	let mut words = String::new();

	if hundreds > 0 {
		words.push_str(ONES[hundreds]);
		words.push_str(" hundred");
	}

	if rest > 0 {
		if !words.is_empty() {
			words.push(' ');
		}
		if rest < ONES.len() {
			words.push_str(ONES[rest]);
		} else {
			words.push_str(TENS[rest / 10]);
			if rest % 10 > 0 {
				words.push('-');
				words.push_str(ONES[rest % 10]);
			}
		}
	}

	words
}
