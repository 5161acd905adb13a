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

use crate::consts;
use crate::country;
use crate::metadata::{Database, Format, Metadata, DATABASE};
use crate::parser::helper::AsCharExt;

/// Placeholder glyph used in `formatting_template` to mark a position a
/// not-yet-typed digit will land on.
const DIGIT_PLACEHOLDER: char = '\u{2008}';

/// Phases of the as-you-type state machine. Preserves the semantics of the
/// original independent booleans (`able_to_format`, NDD-in-progress, and so
/// on) as explicit, mutually exclusive states.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Phase {
    /// Still collecting the first few national-significant-number digits;
    /// too early to commit to a formatting template.
    CollectingDigits,

    /// A leading `+` (or IDD) has been seen; digits are being accumulated to
    /// identify the country calling code.
    HaveInternationalPrefix,

    /// The country calling code (and its metadata) has been resolved.
    HaveCountryCode,

    /// A formatting template has been chosen and is being filled in.
    FormattingNational,

    /// Formatting gave up; echo the raw accrued input from here on.
    Fallback,
}

/// Incremental formatter that reformats a phone number after every typed
/// character, the way a dialler UI would.
///
/// Not thread-safe: an instance is meant to be pinned to one input session.
pub struct AsYouTypeFormatter<'d> {
    database: &'d Database,
    default_region: Option<country::Id>,

    phase: Phase,
    able_to_format: bool,
    input_has_formatting: bool,
    is_complete_number: bool,

    accrued_input: String,
    accrued_input_without_formatting: String,

    prefix_digits: String,
    national_number: String,
    extracted_national_prefix: String,
    prefix_before_national_number: String,

    country_code: Option<u16>,
    region_id: Option<String>,

    current_formatting_pattern: usize,
    formatting_template: Vec<char>,
    last_match_position: usize,
    should_add_space_after_national_prefix: bool,

    position_to_remember: Option<usize>,
    current_output: String,
}

impl<'d> AsYouTypeFormatter<'d> {
    /// Create a formatter for the given default region, using the bundled
    /// metadata database.
    pub fn new(default_region: Option<country::Id>) -> Self {
        Self::new_with(&DATABASE, default_region)
    }

    /// Create a formatter using the given metadata database.
    pub fn new_with(database: &'d Database, default_region: Option<country::Id>) -> Self {
        AsYouTypeFormatter {
            database,
            default_region,

            phase: Phase::CollectingDigits,
            able_to_format: true,
            input_has_formatting: false,
            is_complete_number: false,

            accrued_input: String::new(),
            accrued_input_without_formatting: String::new(),

            prefix_digits: String::new(),
            national_number: String::new(),
            extracted_national_prefix: String::new(),
            prefix_before_national_number: String::new(),

            country_code: None,
            region_id: None,

            current_formatting_pattern: usize::MAX,
            formatting_template: Vec::new(),
            last_match_position: 0,
            should_add_space_after_national_prefix: false,

            position_to_remember: None,
            current_output: String::new(),
        }
    }

    /// Reset every field back to the freshly-constructed state.
    pub fn clear(&mut self) {
        let database = self.database;
        let default_region = self.default_region;

        *self = Self::new_with(database, default_region);
    }

    /// Current best-effort formatting of everything typed so far.
    pub fn current_output(&self) -> &str {
        &self.current_output
    }

    /// Feed one more input character and return the updated formatting.
    pub fn input_digit(&mut self, c: char) -> &str {
        self.input(c, false)
    }

    /// Like [`input_digit`](Self::input_digit), and additionally remembers
    /// the position of this character so it can be mapped back into the
    /// formatted output (see [`remembered_position`](Self::remembered_position)).
    pub fn input_digit_and_remember_position(&mut self, c: char) -> &str {
        self.input(c, true)
    }

    /// The character-index in [`current_output`](Self::current_output)
    /// corresponding to the last character passed to
    /// [`input_digit_and_remember_position`](Self::input_digit_and_remember_position),
    /// if one was ever remembered and still falls within the output.
    pub fn remembered_position(&self) -> Option<usize> {
        let remembered = self.position_to_remember?;

        if self.input_has_formatting || !self.able_to_format {
            return Some(remembered.min(self.current_output.chars().count()));
        }

        // Map the digit-index back to a character index by walking the
        // template alongside the digits actually placed.
        let mut digits_seen = 0;

        for (index, ch) in self.current_output.chars().enumerate() {
            if ch.is_ascii_digit() || ch == '+' {
                digits_seen += 1;

                if digits_seen == remembered {
                    return Some(index + 1);
                }
            }
        }

        Some(self.current_output.chars().count())
    }

    fn meta(&self) -> Option<&'d Metadata> {
        self.region_id.as_ref().and_then(|id| self.database.by_id(id))
    }

    fn input(&mut self, c: char, remember: bool) -> &str {
        self.accrued_input.push(c);

        match c.as_dec_digit().or_else(|| is_plus(c).then(|| '+')) {
            None => {
                self.input_has_formatting = true;
            }

            Some(ch) => {
                self.accrued_input_without_formatting.push(ch);

                if remember {
                    self.position_to_remember =
                        Some(self.accrued_input_without_formatting.chars().count());
                }

                if ch == '+' {
                    if self.accrued_input_without_formatting.chars().count() == 1 {
                        self.is_complete_number = true;
                        self.phase = Phase::HaveInternationalPrefix;
                    } else {
                        self.input_has_formatting = true;
                    }
                } else {
                    self.absorb_digit(ch);
                }
            }
        }

        if remember && self.position_to_remember.is_none() {
            self.position_to_remember =
                Some(self.accrued_input_without_formatting.chars().count());
        }

        self.rebuild_output();
        &self.current_output
    }

    fn absorb_digit(&mut self, ch: char) {
        if self.input_has_formatting || self.phase == Phase::Fallback {
            return;
        }

        match self.phase {
            Phase::HaveInternationalPrefix => {
                self.prefix_digits.push(ch);
                self.try_commit_country_code();
            }

            Phase::CollectingDigits | Phase::HaveCountryCode | Phase::FormattingNational => {
                if self.country_code.is_none() {
                    self.resolve_default_region();
                }

                self.national_number.push(ch);
                self.strip_national_prefix_once();

                if self.country_code.is_some() && self.national_number.len() >= consts::MIN_LENGTH_FOR_NSN {
                    self.phase = Phase::FormattingNational;
                }
            }

            Phase::Fallback => {}
        }
    }

    fn try_commit_country_code(&mut self) {
        let len = self.prefix_digits.len();

        if len == 0 {
            return;
        }

        for l in (1..=len.min(consts::MAX_LENGTH_FOR_COUNTRY_CODE)).rev() {
            if let Ok(code) = self.prefix_digits[..l].parse::<u16>() {
                if let Some(meta) = self.database.by_code(&code).and_then(|m| m.into_iter().next()) {
                    self.country_code = Some(code);
                    self.region_id = Some(meta.id().to_owned());
                    self.prefix_before_national_number = format!("+{} ", code);
                    self.phase = Phase::HaveCountryCode;

                    return;
                }
            }
        }

        if len >= consts::MAX_LENGTH_FOR_COUNTRY_CODE {
            self.able_to_format = false;
            self.phase = Phase::Fallback;
        }
    }

    fn resolve_default_region(&mut self) {
        if let Some(region) = self.default_region {
            if let Some(meta) = self.database.by_id(region.as_ref()) {
                self.country_code = Some(meta.country_code());
                self.region_id = Some(meta.id().to_owned());
                self.phase = Phase::HaveCountryCode;

                return;
            }
        }

        self.able_to_format = false;
        self.phase = Phase::Fallback;
    }

    /// Strip one occurrence of the region's national prefix from the front
    /// of `national_number`, the first time it is recognized. Only applies
    /// when we're not building a complete (`+cc ...`) international number,
    /// since the NDD is never dialled internationally.
    fn strip_national_prefix_once(&mut self) {
        if self.is_complete_number || !self.extracted_national_prefix.is_empty() {
            return;
        }

        let prefix = match self.meta().and_then(|m| m.national_prefix()) {
            Some(prefix) => prefix.to_owned(),
            None => return,
        };

        if prefix.is_empty() || !self.national_number.starts_with(&prefix) {
            return;
        }

        // Don't strip if it would leave nothing to format yet; wait for more
        // digits so we don't mistake a short national prefix for the whole
        // number.
        if self.national_number.len() <= prefix.len() {
            return;
        }

        self.extracted_national_prefix = prefix.clone();
        self.national_number = self.national_number[prefix.len()..].to_owned();
    }

    /// The digits the chosen pattern should actually match against: the
    /// national number with any already-stripped NDD removed, which is
    /// exactly `national_number` as maintained above.
    fn significant_digits(&self) -> &str {
        &self.national_number
    }

    fn candidate_formats(&self) -> Vec<&'d Format> {
        let meta = match self.meta() {
            Some(meta) => meta,
            None => return Vec::new(),
        };

        let formats = if self.is_complete_number && !meta.international_formats().is_empty() {
            meta.international_formats()
        } else {
            meta.formats()
        };

        let digits = self.significant_digits();

        formats
            .iter()
            .filter(|f| consts::IS_FORMAT_ELIGIBLE_AS_YOU_TYPE.is_match(f.format()))
            .filter(|f| {
                f.leading_digits()
                    .last()
                    .map(|re| re.find(digits).map(|m| m.start() == 0).unwrap_or(false))
                    .unwrap_or(true)
            })
            .collect()
    }

    fn national_format_string(&self, format: &Format) -> String {
        let template = format.format();

        if self.is_complete_number {
            return template.to_owned();
        }

        if let Some(rule) = format.national_prefix() {
            let first = match consts::FIRST_GROUP.captures(template).and_then(|c| c.get(1)) {
                Some(m) => m.as_str().to_owned(),
                None => return template.to_owned(),
            };

            let meta_prefix = self.meta().and_then(|m| m.national_prefix()).unwrap_or("");

            let rule = rule.replace(*consts::NP, meta_prefix);
            let rule = rule.replace(*consts::FG, &first);

            return consts::FIRST_GROUP.replace(template, &*rule).into_owned();
        }

        template.to_owned()
    }

    fn build_template(&self, format: &Format) -> Option<Vec<char>> {
        let dummy: String = std::iter::repeat('9').take(20).collect();
        let national_format = self.national_format_string(format);

        let m = format.pattern().find(&dummy)?;

        if m.start() != 0 {
            return None;
        }

        let trimmed = &dummy[..m.end()];
        let expanded = format.pattern().replace(trimmed, &*national_format);

        Some(
            expanded
                .chars()
                .map(|c| if c.is_ascii_digit() { DIGIT_PLACEHOLDER } else { c })
                .collect(),
        )
    }

    fn maybe_create_new_template(&mut self) {
        let candidates = self.candidate_formats();

        for (index, format) in candidates.into_iter().enumerate() {
            if let Some(template) = self.build_template(format) {
                let placeholders = template.iter().filter(|&&c| c == DIGIT_PLACEHOLDER).count();

                if placeholders >= self.significant_digits().len() {
                    if index != self.current_formatting_pattern {
                        self.current_formatting_pattern = index;
                        self.formatting_template = template;
                        self.last_match_position = 0;
                        self.should_add_space_after_national_prefix =
                            format.national_prefix().map(ends_with_space_after_np).unwrap_or(false);
                    }

                    return;
                }
            }
        }

        self.current_formatting_pattern = usize::MAX;
        self.formatting_template.clear();
    }

    fn fill_template(&mut self) -> Option<String> {
        if self.formatting_template.is_empty() {
            return None;
        }

        let digits = self.significant_digits().to_owned();

        let mut out = String::new();
        let mut placed = 0;
        let total = digits.len();
        let template = self.formatting_template.clone();

        for ch in template {
            if ch == DIGIT_PLACEHOLDER {
                if placed >= total {
                    break;
                }

                out.push(digits.as_bytes()[placed] as char);
                placed += 1;
                self.last_match_position = out.chars().count();
            } else {
                out.push(ch);
            }
        }

        if placed < total {
            // Ran out of placeholders: the template can't hold this many
            // digits any more.
            self.able_to_format = false;
            return None;
        }

        // Drop any template literal (separator, closing paren) that follows
        // the last digit we actually placed.
        out.truncate(
            out.char_indices()
                .nth(self.last_match_position)
                .map(|(i, _)| i)
                .unwrap_or(out.len()),
        );

        Some(out)
    }

    fn rebuild_output(&mut self) {
        if self.input_has_formatting || !self.able_to_format {
            self.current_output = self.accrued_input.clone();
            return;
        }

        match self.phase {
            Phase::CollectingDigits | Phase::HaveInternationalPrefix => {
                self.current_output = self.accrued_input_without_formatting.clone();
            }

            Phase::HaveCountryCode | Phase::FormattingNational => {
                if self.significant_digits().len() < consts::MIN_LENGTH_FOR_NSN {
                    self.current_output = format!(
                        "{}{}{}",
                        self.prefix_before_national_number,
                        self.extracted_national_prefix,
                        self.significant_digits()
                    );

                    return;
                }

                self.maybe_create_new_template();

                let rendered = self.fill_template();

                let prefix = if self.is_complete_number {
                    self.prefix_before_national_number.clone()
                } else if self.should_add_space_after_national_prefix
                    && !self.extracted_national_prefix.is_empty()
                {
                    format!("{} ", self.extracted_national_prefix)
                } else {
                    self.extracted_national_prefix.clone()
                };

                self.current_output = match rendered {
                    Some(national) => format!("{}{}", prefix, national),
                    None => format!(
                        "{}{}",
                        prefix,
                        self.significant_digits()
                    ),
                };
            }

            Phase::Fallback => {
                self.current_output = self.accrued_input_without_formatting.clone();
            }
        }
    }
}

fn is_plus(c: char) -> bool {
    c == '+' || c == '\u{FF0B}'
}

/// Whether a `nationalPrefixFormattingRule` like `"$NP $FG"` inserts a space
/// between the national prefix and the first group, as opposed to `"$NP$FG"`.
fn ends_with_space_after_np(rule: &str) -> bool {
    rule.find("$NP")
        .map(|pos| rule[pos + 3..].starts_with(' '))
        .unwrap_or(false)
}

#[cfg(test)]
mod test {
    use crate::as_you_type::AsYouTypeFormatter;
    use crate::country;

    fn feed(formatter: &mut AsYouTypeFormatter, input: &str) -> String {
        let mut last = String::new();

        for c in input.chars() {
            last = formatter.input_digit(c).to_owned();
        }

        last
    }

    #[test]
    fn us_international() {
        let mut formatter = AsYouTypeFormatter::new(Some(country::US));

        assert_eq!("+1 202-555-1212", feed(&mut formatter, "+12025551212"));
    }

    #[test]
    fn ch_national_incremental() {
        let mut formatter = AsYouTypeFormatter::new(Some(country::CH));

        assert_eq!("044", feed(&mut formatter, "044"));
        assert_eq!("044 6", formatter.input_digit('6'));
        assert_eq!("044 66 8", feed(&mut formatter, "68"));
        assert_eq!("044 668 18 00", feed(&mut formatter, "1800"));
    }

    #[test]
    fn clear_resets_state() {
        let mut formatter = AsYouTypeFormatter::new(Some(country::US));

        feed(&mut formatter, "+12025551212");
        formatter.clear();

        assert_eq!("", formatter.current_output());
        assert_eq!("2", formatter.input_digit('2'));
    }

    #[test]
    fn stray_formatting_falls_back_to_raw() {
        let mut formatter = AsYouTypeFormatter::new(Some(country::US));

        formatter.input_digit('2');
        formatter.input_digit('0');

        assert_eq!("20a", formatter.input_digit('a'));
        assert_eq!("20a-", formatter.input_digit('-'));
    }
}
