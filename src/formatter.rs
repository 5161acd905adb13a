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

use crate::{
    consts,
    country,
    metadata::{Database, Format, Metadata, DATABASE},
    phone_number::PhoneNumber,
};
use std::{borrow::Cow, fmt};

/// Formatting modes for phone number.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Mode {
    /// E.164 formatting, no spaces, no decorations.
    E164,

    /// International formatting, contains country code and country dependent
    /// formatting.
    International,

    /// National formatting, no country code and country dependent formatting.
    National,

    /// RFC3966 formatting, see the RFC.
    Rfc3966,
}

/// A formatter for a `PhoneNumber`.
#[derive(Copy, Clone, Debug)]
pub struct Formatter<'n, 'd, 'f> {
    number: &'n PhoneNumber,
    database: Option<&'d Database>,
    mode: Mode,
    format: Option<&'f Format>,
}

impl<'n, 'd, 'f> Formatter<'n, 'd, 'f> {
    /// Define a metadata database to use for formatting.
    pub fn database<'a>(self, database: &'a Database) -> Formatter<'n, 'a, 'f> {
        Formatter {
            number: self.number,
            database: Some(database),
            mode: self.mode,
            format: self.format,
        }
    }

    /// Define the formatting mode.
    pub fn mode(mut self, mode: Mode) -> Formatter<'n, 'd, 'f> {
        self.mode = mode;
        self
    }

    /// Define a custom `Format` to use for formatting.
    pub fn with<'a>(self, format: &'a Format) -> Formatter<'n, 'd, 'a> {
        Formatter {
            number: self.number,
            database: self.database,
            mode: self.mode,
            format: Some(format),
        }
    }
}

/// Create a new `Formatter` for the given phone number.
pub fn format<'n>(number: &'n PhoneNumber) -> Formatter<'n, 'static, 'static> {
    Formatter {
        number: number,
        database: None,
        mode: Mode::E164,
        format: None,
    }
}

/// Create a new `Formatter` for the given phone number using the given
/// metadata database.
pub fn format_with<'d, 'n>(
    database: &'d Database,
    number: &'n PhoneNumber,
) -> Formatter<'n, 'd, 'static> {
    Formatter {
        number: number,
        database: Some(database),
        mode: Mode::E164,
        format: None,
    }
}

impl<'n, 'd, 'f> fmt::Display for Formatter<'n, 'd, 'f> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let db = self.database.unwrap_or(&*DATABASE);

        // If the country code is invalid, return an error.
        let meta = try_opt!(Err(fmt::Error);
			db.by_code(&self.number.country().code()).map(|m|
				m.into_iter().next().unwrap()));

        let national = self.number.national().to_string();
        let formatter = self.format.or_else(|| {
            formatter(
                &national,
                if meta.international_formats().is_empty() || self.mode == Mode::National {
                    meta.formats()
                } else {
                    meta.international_formats()
                },
            )
        });

        match self.mode {
            // Requires no formatting at all, easy life.
            Mode::E164 => {
                write!(f, "+{}{}", self.number.country().code(), national)?;
            }

            // Space separated formatting with national specific rules.
            Mode::International => {
                write!(f, "+{} ", self.number.country().code())?;

                if let Some(formatter) = formatter {
                    write!(f, "{}", replace(&national, meta, formatter, None, None))?;
                } else {
                    write!(f, "{}", national)?;
                }

                if let Some(ext) = self.number.extension() {
                    write!(
                        f,
                        "{}{}",
                        meta.preferred_extension_prefix().unwrap_or(" ext. "),
                        ext
                    )?;
                }
            }

            Mode::National => {
                if let Some(formatter) = formatter {
                    let carrier = self
                        .number
                        .carrier()
                        .and_then(|c| formatter.domestic_carrier().map(|f| (c, f)));

                    if let Some((carrier, format)) = carrier {
                        write!(
                            f,
                            "{}",
                            replace(&national, meta, formatter, Some(format), Some(carrier))
                        )?;
                    } else if let Some(prefix) = formatter.national_prefix() {
                        write!(
                            f,
                            "{}",
                            replace(&national, meta, formatter, Some(prefix), None)
                        )?;
                    } else {
                        write!(f, "{}", replace(&national, meta, formatter, None, None))?;
                    }
                } else {
                    write!(f, "{}", national)?;
                }

                if let Some(ext) = self.number.extension() {
                    write!(
                        f,
                        "{}{}",
                        meta.preferred_extension_prefix().unwrap_or(" ext. "),
                        ext
                    )?;
                }
            }

            Mode::Rfc3966 => {
                write!(f, "tel:+{}-", self.number.country().code())?;

                if let Some(formatter) = formatter {
                    write!(
                        f,
                        "{}",
                        consts::SEPARATOR_PATTERN
                            .replace_all(&replace(&national, meta, formatter, None, None), "-")
                    )?;
                } else {
                    write!(f, "{}", national)?;
                }

                if let Some(ext) = self.number.extension() {
                    write!(f, ";ext={}", ext)?;
                }
            }
        }

        Ok(())
    }
}

/// Format `number` out of country, as it would be dialled by someone
/// physically in `calling_from`.
pub fn format_out_of_country(
    database: &Database,
    number: &PhoneNumber,
    calling_from: country::Id,
) -> String {
    let from_meta = match database.by_id(calling_from.as_ref()) {
        Some(meta) => meta,
        None => return format_with(database, number).mode(Mode::International).to_string(),
    };

    let code = number.country().code();

    if from_meta.country_code() as u32 == consts::NANPA_COUNTRY_CODE && code == consts::NANPA_COUNTRY_CODE as u16
    {
        return format!(
            "1 {}",
            format_with(database, number).mode(Mode::National)
        );
    }

    if from_meta.country_code() == code {
        return format_with(database, number).mode(Mode::National).to_string();
    }

    let international = format_with(database, number)
        .mode(Mode::International)
        .to_string();

    let idd = from_meta
        .preferred_international_prefix()
        .map(str::to_owned)
        .or_else(|| {
            from_meta.international_prefix().and_then(|re| {
                let pattern = re.as_str();

                if consts::UNIQUE_INTERNATIONAL_PREFIX.is_match(pattern) {
                    Some(pattern.replace('~', ""))
                } else {
                    None
                }
            })
        });

    match idd {
        Some(idd) => international.replacen('+', &format!("{} ", idd), 1),
        None => international,
    }
}

/// Recover, as closely as possible, the style the number was originally
/// entered in. Falls back to `raw_input` verbatim whenever the formatted
/// output's dialable digits would disagree with it.
pub fn format_in_original_format(
    database: &Database,
    number: &PhoneNumber,
    calling_from: country::Id,
) -> String {
    let raw = match number.raw_input() {
        Some(raw) => raw,
        None => return format_with(database, number).mode(Mode::National).to_string(),
    };

    let meta = number.metadata(database);
    let national = number.national().to_string();
    let has_pattern = meta
        .map(|m| formatter(&national, m.formats()).is_some())
        .unwrap_or(false);

    if !has_pattern {
        return raw.to_owned();
    }

    let result = match number.country_code_source() {
        crate::country::Source::Plus => format_with(database, number)
            .mode(Mode::International)
            .to_string(),

        crate::country::Source::Idd => format_out_of_country(database, number, calling_from),

        crate::country::Source::Number => {
            let international = format_with(database, number)
                .mode(Mode::International)
                .to_string();

            international.trim_start_matches('+').to_owned()
        }

        crate::country::Source::Default => national_without_unrequested_prefix(meta.unwrap(), &national, raw),
    };

    let diallable = |s: &str| -> String {
        s.chars()
            .filter(|c| consts::DIALLABLE_CHAR_MAPPINGS.contains_key(c))
            .collect()
    };

    if diallable(&result) != diallable(raw) {
        raw.to_owned()
    } else {
        result
    }
}

/// Format the national significant number, patching away a national-prefix
/// insertion the user's original input never had.
fn national_without_unrequested_prefix(meta: &Metadata, national: &str, raw: &str) -> String {
    let format = match formatter(national, meta.formats()) {
        Some(format) => format,
        None => return national.to_owned(),
    };

    let raw_digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let wants_no_prefix = meta
        .national_prefix()
        .map(|prefix| !raw_digits.starts_with(prefix))
        .unwrap_or(false);

    if wants_no_prefix && format.national_prefix().is_some() {
        let mut patched = format.clone();
        patched.national_prefix = None;

        replace(national, meta, &patched, None, None)
    } else if let Some(prefix) = format.national_prefix() {
        replace(national, meta, format, Some(prefix), None)
    } else {
        replace(national, meta, format, None, None)
    }
}

/// Format `number` using a caller-supplied set of `Format`s instead of the
/// ones in the region's metadata (the region's metadata is still consulted
/// for `$NP`/`$FG` substitution).
pub fn format_by_pattern(number: &PhoneNumber, mode: Mode, formats: &[Format]) -> String {
    let database = &*DATABASE;
    let meta = match number.metadata(database) {
        Some(meta) => meta,
        None => return format(number).mode(mode).to_string(),
    };

    let national = number.national().to_string();
    let format = formatter(&national, formats);

    match mode {
        Mode::E164 => format!("+{}{}", number.country().code(), national),

        Mode::International => {
            let mut out = format!("+{} ", number.country().code());

            if let Some(format) = format {
                out.push_str(&replace(&national, meta, format, None, None));
            } else {
                out.push_str(&national);
            }

            if let Some(ext) = number.extension() {
                out.push_str(&format!(
                    "{}{}",
                    meta.preferred_extension_prefix().unwrap_or(" ext. "),
                    ext
                ));
            }

            out
        }

        Mode::National => {
            let mut out = if let Some(format) = format {
                if let Some(prefix) = format.national_prefix() {
                    replace(&national, meta, format, Some(prefix), None)
                } else {
                    replace(&national, meta, format, None, None)
                }
            } else {
                national.clone()
            };

            if let Some(ext) = number.extension() {
                out.push_str(&format!(
                    "{}{}",
                    meta.preferred_extension_prefix().unwrap_or(" ext. "),
                    ext
                ));
            }

            out
        }

        Mode::Rfc3966 => {
            let mut out = format!("tel:+{}-", number.country().code());

            if let Some(format) = format {
                out.push_str(&consts::SEPARATOR_PATTERN.replace_all(
                    &replace(&national, meta, format, None, None),
                    "-",
                ));
            } else {
                out.push_str(&national);
            }

            if let Some(ext) = number.extension() {
                out.push_str(&format!(";ext={}", ext));
            }

            out
        }
    }
}

/// Drop trailing digits one at a time until the number validates, or give
/// up without mutating `number` if it never does (or runs out of digits).
pub fn truncate_too_long_number(database: &Database, number: &mut PhoneNumber) -> bool {
    if crate::validator::is_valid_with(database, number) {
        return true;
    }

    let meta = match number.metadata(database) {
        Some(meta) => meta,
        None => return false,
    };

    let zeros = number.national().number_of_leading_zeros();
    let italian = number.national().is_italian_leading_zero();
    let mut national = number.national().value();

    loop {
        if national == 0 {
            return false;
        }

        national /= 10;

        if national == 0 {
            return false;
        }

        let length_check = crate::parser::helper::Number {
            national: national.to_string().into(),
            ..Default::default()
        };

        if crate::validator::length(meta, &length_check, crate::phone_number::Type::Unknown)
            == crate::validator::Validation::TooShort
        {
            return false;
        }

        let candidate = PhoneNumber {
            national: crate::national_number::NationalNumber::new(
                national,
                if italian { zeros } else { 0 },
            ),
            ..number.clone()
        };

        if crate::validator::is_valid_with(database, &candidate) {
            *number = candidate;
            return true;
        }
    }
}

fn formatter<'a>(number: &str, formats: &'a [Format]) -> Option<&'a Format> {
    for format in formats {
        let leading = format.leading_digits();

        if leading.is_empty()
            || leading
                .last()
                .unwrap()
                .find(&number)
                .map(|m| m.start() == 0)
                .unwrap_or(false)
        {
            if format
                .pattern()
                .find(&number)
                .map(|m| m.start() == 0 && m.end() == number.len())
                .unwrap_or(false)
            {
                return Some(format);
            }
        }
    }

    None
}

fn replace(
    national: &str,
    meta: &Metadata,
    formatter: &Format,
    transform: Option<&str>,
    carrier: Option<&str>,
) -> String {
    formatter
        .pattern()
        .replace(
            national,
            &*if let Some(transform) = transform {
                let first = consts::FIRST_GROUP
                    .captures(&formatter.format())
                    .unwrap()
                    .get(1)
                    .unwrap()
                    .as_str();
                let format = transform.replace(*consts::NP, meta.national_prefix().unwrap_or(""));
                let format = format.replace(*consts::FG, &*format!("${}", first));
                let format = format.replace(*consts::CC, carrier.unwrap_or(""));

                consts::FIRST_GROUP.replace(formatter.format(), &*format)
            } else {
                Cow::Borrowed(formatter.format())
            },
        )
        .into()
}

#[cfg(test)]
mod test {
    use crate::country;
    use crate::formatter::Mode;
    use crate::parser;

    #[test]
    fn us() {
        assert_eq!(
            "(650) 253-0000",
            parser::parse(Some(country::US), "+1 6502530000")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "+1 650-253-0000",
            parser::parse(Some(country::US), "+1 6502530000")
                .unwrap()
                .format()
                .mode(Mode::International)
                .to_string()
        );

        assert_eq!(
            "(800) 253-0000",
            parser::parse(Some(country::US), "+1 8002530000")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "+1 800-253-0000",
            parser::parse(Some(country::US), "+1 8002530000")
                .unwrap()
                .format()
                .mode(Mode::International)
                .to_string()
        );

        assert_eq!(
            "(900) 253-0000",
            parser::parse(Some(country::US), "+1 9002530000")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "+1 900-253-0000",
            parser::parse(Some(country::US), "+1 9002530000")
                .unwrap()
                .format()
                .mode(Mode::International)
                .to_string()
        );

        assert_eq!(
            "tel:+1-900-253-0000",
            parser::parse(Some(country::US), "+1 9002530000")
                .unwrap()
                .format()
                .mode(Mode::Rfc3966)
                .to_string()
        );
    }

    #[test]
    fn gb() {
        assert_eq!(
            "020 7031 3000",
            parser::parse(Some(country::GB), "+44 2070313000")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "+44 20 7031 3000",
            parser::parse(Some(country::GB), "+44 2070313000")
                .unwrap()
                .format()
                .mode(Mode::International)
                .to_string()
        );

        assert_eq!(
            "020 7031 3000",
            parser::parse(Some(country::GB), "+44 2070313000")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "07912 345678",
            parser::parse(Some(country::GB), "+44 7912345678")
                .unwrap()
                .format()
                .mode(Mode::National)
                .to_string()
        );

        assert_eq!(
            "+44 7912 345678",
            parser::parse(Some(country::GB), "+44 7912345678")
                .unwrap()
                .format()
                .mode(Mode::International)
                .to_string()
        );
    }
}
