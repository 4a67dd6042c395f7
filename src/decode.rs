//! Decoding of a single raw parameter value.
//!
//! A value comes in one of three forms:
//!
//! ```not-rust
//! token              text/plain; charset=utf-8
//! quoted-string      form-data; filename="John \"Magic\" Smith.png"
//! ext-value          attachment; filename*=utf-8''%e2%82%ac%20rates
//! ```
//!
//! The `ext-value` form is only considered when the key carried a trailing `*`.
//! See [RFC 5987 - Section 3.2](https://datatracker.ietf.org/doc/html/rfc5987#section-3.2).

use log::{debug, trace};
use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::charset::{self, UnknownCharset};
use crate::params::ScanState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown charset {0:?} in extended parameter value")]
    UnknownCharset(String),
}

/// The final text of a parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedValue {
    /// Fully unescaped and, for extended values, charset-decoded text.
    pub text: String,

    /// Whether the parameter used the `key*=` syntax.
    pub extended: bool,
}

impl DecodedValue {
    pub fn new(text: impl Into<String>, extended: bool) -> Self {
        DecodedValue {
            text: text.into(),
            extended,
        }
    }
}

/// The pieces of an `ext-value`, before charset decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedValue<'a> {
    pub charset: &'a str,

    /// Language tag, `None` when the segment between the quotes is empty.
    pub language: Option<&'a str>,

    /// Percent-decoded octets.
    pub octets: Vec<u8>,
}

/// Splits `charset'language'octets` on its first two single quotes and percent-decodes the
/// octets. A `%` that does not start a valid `%XX` triplet is kept as is.
pub fn parse_extended_value(value: &str) -> Option<ExtendedValue<'_>> {
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?;
    let language = parts.next()?;
    let octets = parts.next()?;

    Some(ExtendedValue {
        charset,
        language: if language.is_empty() { None } else { Some(language) },
        octets: percent_decode_str(octets).collect(),
    })
}

/// Decodes `raw` as it appeared after the `=`, quotes included.
///
/// Only the [`UnknownCharset::Reject`] policy can make this fail.
pub fn decode_value(raw: &str, extended: bool, policy: UnknownCharset) -> Result<DecodedValue, DecodeError> {
    if extended {
        let value = unquote(raw);
        return match parse_extended_value(&value) {
            Some(ext) => {
                trace!("Extended value with charset {:?}, language {:?}.", ext.charset, ext.language);
                let text = charset::decode_bytes(ext.charset, &ext.octets, policy)?;
                Ok(DecodedValue::new(text, true))
            }
            None => {
                debug!("Extended parameter without charset: {:?}.", raw);
                Ok(DecodedValue::new(value, true))
            }
        };
    }

    Ok(DecodedValue::new(unquote(raw), false))
}

/// Removes the quoting of a `quoted-string`.
///
/// `\"` and `\\` unescape to `"` and `\`. A backslash in front of any other character is kept,
/// so unescaped Windows paths survive. Text after the closing quote is appended verbatim and a
/// missing closing quote runs to the end of the value. Values not starting with `"` are returned
/// unchanged.
pub fn unquote(raw: &str) -> String {
    let inner = match raw.strip_prefix('"') {
        Some(inner) => inner,
        None => return raw.to_string(),
    };

    let mut out = String::with_capacity(inner.len());
    let mut state = ScanState::InQuotes;

    for (index, c) in inner.char_indices() {
        match state {
            ScanState::Normal => {
                out.push_str(&inner[index..]);
                return out;
            }
            ScanState::InQuotes => {
                if c != '"' && c != '\\' {
                    out.push(c);
                }
            }
            ScanState::InQuotesEscaped => {
                if c != '"' && c != '\\' {
                    out.push('\\');
                }
                out.push(c);
            }
        }
        state = state.next(c);
    }

    // Dangling backslash at the end of an unterminated string.
    if state == ScanState::InQuotesEscaped {
        out.push('\\');
    }

    out
}
