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

//! Parsing, validating, formatting and as-you-type-formatting of
//! international phone numbers.

#[macro_use]
extern crate lazy_static;

extern crate quick_xml;
extern crate regex;
extern crate regex_syntax;

macro_rules! try_opt {
    ($default:expr; $value:expr) => {
        match $value {
            Some(value) => value,
            None => return $default,
        }
    };
}

pub mod error;
pub use error::{LoadMetadataError, ParseError};

pub mod country;
pub use country::Id as Country;

pub mod metadata;
pub use metadata::{Database, Metadata, DATABASE};

mod national_number;
pub use national_number::NationalNumber;

mod extension;
pub use extension::Extension;

pub mod carrier;
pub use carrier::Carrier;

mod phone_number;
pub use phone_number::{Country as PhoneNumberCountry, PhoneNumber, Type};

pub mod parser;
pub use parser::{parse, parse_and_keep_raw, parse_with};

pub mod validator;
pub use validator::{
    can_be_internationally_dialled, is_possible_number, is_possible_number_with, is_valid,
    is_valid_with, match_number_pair, match_number_pair_str, MatchType, Validation,
};

pub mod formatter;
pub use formatter::{
    format_by_pattern, format_in_original_format, format_out_of_country, truncate_too_long_number,
    Mode,
};

pub mod as_you_type;
pub use as_you_type::AsYouTypeFormatter;

mod normalize;
pub use normalize::{normalize, normalize_digits_only};
