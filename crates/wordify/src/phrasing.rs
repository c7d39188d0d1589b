use crate::amount::{Amount, CENTS_PER_DOLLAR};
use crate::numerals::spell_group;


/// How group words are joined into a phrase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phrasing {
	/// Space-separated groups; `and` precedes the final non-zero group.
	///
	/// `1005` reads `one thousand and five dollars`.
	#[default]
	Spoken,
	/// Comma-separated dollar groups; `and` only precedes the cents.
	///
	/// `1005` reads `one thousand, five dollars`. A zero dollar group after
	/// larger groups is left out rather than spelled, so `2,000,000` reads
	/// `two million dollars`, not `two million, zero dollars`.
	Ledger,
}

impl Phrasing {
	/// Spells `amount` in this style.
	pub fn spell(self, amount: Amount) -> String {
		match self {
			Self::Spoken => spoken(amount),
			Self::Ledger => ledger(amount),
		}
	}
}

/// One named slice of an amount, bounds in cents.
struct Group {
	name: &'static str,
	upper: u64,
	lower: u64,
	plural: bool,
	mandatory: bool,
}

impl Group {
	fn label(&self, piece: u64) -> String {
		if self.plural && piece != 1 {
			format!("{}s", self.name)
		} else {
			self.name.to_string()
		}
	}
}

const GROUPS: [Group; 4] = [
	Group {
		name: "million",
		upper: 1_000_000_000 * CENTS_PER_DOLLAR,
		lower: 1_000_000 * CENTS_PER_DOLLAR,
		plural: false,
		mandatory: false,
	},
	Group {
		name: "thousand",
		upper: 1_000_000 * CENTS_PER_DOLLAR,
		lower: 1_000 * CENTS_PER_DOLLAR,
		plural: false,
		mandatory: false,
	},
	Group {
		name: "dollar",
		upper: 1_000 * CENTS_PER_DOLLAR,
		lower: CENTS_PER_DOLLAR,
		plural: true,
		mandatory: true,
	},
	Group {
		name: "cent",
		upper: CENTS_PER_DOLLAR,
		lower: 1,
		plural: true,
		mandatory: false,
	},
];

fn spoken(amount: Amount) -> String {
	let total = amount.cents();
	let mut words: Vec<String> = Vec::new();

	for group in &GROUPS {
		let piece = (total % group.upper) / group.lower;
		if piece == 0 && !group.mandatory {
			continue;
		}

		// Nothing below this group remains, so it closes the phrase.
		if !words.is_empty() && piece != 0 && total % group.lower == 0 {
			words.push("and".to_string());
		}

		// A zero dollar group after larger groups only contributes its label.
		if piece != 0 || words.is_empty() {
			words.push(spell_group(piece));
		}
		words.push(group.label(piece));
	}

	words.join(" ")
}

fn ledger(amount: Amount) -> String {
	let dollars = amount.dollars();
	let mut groups = Vec::new();

	for (scale, name) in [(1_000_000, Some("million")), (1_000, Some("thousand")), (1, None)] {
		let piece = dollars / scale % 1_000;
		if piece == 0 {
			continue;
		}
		let mut words = spell_group(piece);
		if let Some(name) = name {
			words.push(' ');
			words.push_str(name);
		}
		groups.push(words);
	}

	let dollar_label = GROUPS[2].label(dollars % 1_000);
	let mut phrase = if groups.is_empty() {
		format!("zero {dollar_label}")
	} else {
		format!("{} {dollar_label}", groups.join(", "))
	};

	let cents = amount.fractional_cents();
	if cents > 0 {
		phrase.push_str(&format!(" and {} {}", spell_group(cents), GROUPS[3].label(cents)));
	}
	phrase
}
