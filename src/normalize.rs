// Copyright (C) 2017 1aim GmbH
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Standalone character-normalization helpers, usable outside of parsing
//! (e.g. to normalize a number for display or comparison purposes).

use crate::consts;
use crate::parser::helper::AsCharExt;

/// Strip everything but digits, folding full-width and Arabic-Indic digits
/// down to ASCII `0`-`9` along the way.
pub fn normalize_digits_only<S: AsRef<str>>(value: S) -> String {
    value.as_ref().chars().filter_map(AsCharExt::as_dec_digit).collect()
}

/// Normalize a raw phone number string for comparison/display: if the input
/// looks like a vanity number (three or more letters), fold letters to their
/// keypad digit first; either way, the result contains digits only.
pub fn normalize<S: AsRef<str>>(value: S) -> String {
    let value = value.as_ref();

    if consts::VALID_ALPHA_PHONE.is_match(value) {
        value
            .chars()
            .filter_map(|c| {
                c.as_dec_digit()
                    .or_else(|| consts::ALPHA_PHONE_MAPPINGS.get(&c.to_ascii_uppercase()).copied())
            })
            .collect()
    } else {
        normalize_digits_only(value)
    }
}

#[cfg(test)]
mod test {
    use crate::normalize::{normalize, normalize_digits_only};

    #[test]
    fn digits_only_strips_symbols() {
        assert_eq!("6502530000", normalize_digits_only("(650) 253-0000"));
    }

    #[test]
    fn digits_only_folds_wide_digits() {
        assert_eq!("420", normalize_digits_only("\u{FF14}2\u{FF10}"));
    }

    #[test]
    fn folds_vanity_letters() {
        assert_eq!("2225463", normalize("ABC-LINE"));
    }

    #[test]
    fn idempotent_on_digits() {
        let once = normalize_digits_only("+1 (650) 253-0000");
        let twice = normalize_digits_only(&once);

        assert_eq!(once, twice);
    }
}
