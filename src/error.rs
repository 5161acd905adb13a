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

use thiserror::Error;

/// Errors encountered while walking the XML metadata tree.
#[derive(Error, Clone, Debug)]
pub enum MetadataError {
    /// EOF was reached before the parsing was complete.
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// A mismatched tag was met.
    #[error("mismatched tag: {0}")]
    MismatchedTag(String),

    /// A required value was missing.
    #[error("{phase}: missing value: {name}")]
    MissingValue { phase: String, name: String },

    /// An element was not handled.
    #[error("{phase}: unhandled element: {name}")]
    UnhandledElement { phase: String, name: String },

    /// An attribute was not handled.
    #[error("{phase}: unhandled attribute: {name}={value}")]
    UnhandledAttribute {
        phase: String,
        name: String,
        value: String,
    },

    /// An event was not handled.
    #[error("{phase}: unhandled event: {event}")]
    UnhandledEvent { phase: String, event: String },
}

/// Errors encountered while loading a metadata database, either from the
/// compiled-in blob or from a caller-supplied XML source.
#[derive(Error, Debug)]
pub enum LoadMetadataError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("invalid integer: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("invalid boolean: {0}")]
    ParseBool(#[from] std::str::ParseBoolError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("invalid regex syntax: {0}")]
    RegexSyntax(#[from] regex_syntax::Error),

    #[error("regex build error: {0}")]
    Regex(#[from] regex_cache::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

/// Errors that can occur while parsing a phone number.
#[derive(Error, Clone, Copy, Eq, PartialEq, Debug)]
pub enum ParseError {
    /// This generally indicates the string passed in had less than 2 digits
    /// in it, or does not look anything like a phone number.
    #[error("not a number")]
    NotANumber,

    /// The country code supplied did not belong to a supported country or
    /// non-geographical entity.
    #[error("invalid country code")]
    InvalidCountryCode,

    /// This indicates the string started with an international dialing
    /// prefix, but after this was stripped from the number, had fewer digits
    /// than any valid phone number (including country code) could have.
    #[error("the number is too short after IDD")]
    TooShortAfterIdd,

    /// This indicates the string, after any country code has been stripped,
    /// had fewer digits than any valid phone number could have.
    #[error("the number is too short after the country code")]
    TooShortNsn,

    /// This indicates the string had more digits than any valid phone number
    /// could have.
    #[error("the number is too long")]
    TooLongNsn,

    /// A carrier/network code fragment could not be parsed as a valid MCC/MNC
    /// pair.
    #[error("invalid network code")]
    InvalidNetworkCode,
}

impl From<std::num::ParseIntError> for ParseError {
    fn from(_: std::num::ParseIntError) -> Self {
        ParseError::NotANumber
    }
}
