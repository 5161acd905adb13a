use serde_derive::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Hash, Debug)]
pub struct NationalNumber {
	value: u64,

	/// In some countries, the national (significant) number starts with one or
	/// more "0"s without this being a national prefix or trunk code of some kind.
	/// For example, the leading zero in the national (significant) number of an
	/// Italian phone number indicates the number is a fixed-line number.  There
	/// have been plans to migrate fixed-line numbers to start with the digit two
	/// since December 2000, but it has not happened yet. See
	/// http://en.wikipedia.org/wiki/%2B39 for more details.
	///
	/// These fields can be safely ignored (there is no need to set them) for most
	/// countries. Some limited number of countries behave like Italy - for these
	/// cases, if the leading zero(s) of a number would be retained even when
	/// dialling internationally, set this flag to true, and also set the number of
	/// leading zeros.
	///
	/// Clients who use the parsing or conversion functionality of the i18n phone
	/// number libraries will have these fields set if necessary automatically.
	zeroes: Option<u8>,
}

impl NationalNumber {
	/// Build a national number from its numeric value and a count of leading
	/// zeroes that were stripped off to produce it. A `zeroes` of `0` means
	/// there was no leading zero at all; anything less would make `value`
	/// ambiguous, so it is stored as `None` (`italian_leading_zero = false`).
	pub fn new(value: u64, zeroes: u8) -> NationalNumber {
		NationalNumber {
			value,
			zeroes: if zeroes == 0 { None } else { Some(zeroes) },
		}
	}

	/// The national (significant) number.
	pub fn value(&self) -> u64 {
		self.value
	}

	/// Whether the national (significant) number has one or more leading
	/// zeroes that are not a trunk/national prefix (e.g. Italy).
	pub fn is_italian_leading_zero(&self) -> bool {
		self.zeroes.is_some()
	}

	/// The number of leading zeroes in the national (significant) number, as
	/// described by `is_italian_leading_zero`. Defaults to `1` when there is
	/// no leading zero, matching upstream's "non-negative int, default 1"
	/// convention for a field that's only meaningful alongside the flag.
	pub fn number_of_leading_zeros(&self) -> u8 {
		self.zeroes.unwrap_or(1)
	}
}

impl fmt::Display for NationalNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for _ in 0..self.zeroes.unwrap_or(0) {
			write!(f, "0")?;
		}

		write!(f, "{}", self.value)
	}
}

#[cfg(test)]
mod test {
	use super::NationalNumber;

	#[test]
	fn no_leading_zero() {
		let n = NationalNumber::new(6502530000, 0);
		assert!(!n.is_italian_leading_zero());
		assert_eq!(1, n.number_of_leading_zeros());
		assert_eq!("6502530000", n.to_string());
	}

	#[test]
	fn italian_leading_zero() {
		let n = NationalNumber::new(236618300, 1);
		assert!(n.is_italian_leading_zero());
		assert_eq!(1, n.number_of_leading_zeros());
		assert_eq!("0236618300", n.to_string());
	}
}
