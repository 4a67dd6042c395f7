//! Tokenizer for parameter lists such as the value of a `Content-Type` or `Content-Disposition`
//! header, as described in [RFC 2616 - Section 3.7](https://datatracker.ietf.org/doc/html/rfc2616#section-3.7).
//!
//! The input is scanned once, left to right, with the following states:
//!
//! ```not-rust
//! State 1: Normal
//!     State 2: InQuotes         on `"`
//! State 2: InQuotes
//!     State 1: Normal           on `"`
//!     State 3: InQuotesEscaped  on `\`
//! State 3: InQuotesEscaped
//!     State 2: InQuotes         on any character
//! ```
//!
//! `;` and `=` only act as separators in the `Normal` state.

use std::ops::Index;
use std::slice;

use log::{debug, trace};

use crate::charset::UnknownCharset;
use crate::decode::{decode_value, DecodeError, DecodedValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanState {
    Normal,
    InQuotes,
    InQuotesEscaped,
}

impl ScanState {
    pub(crate) fn next(self, c: char) -> Self {
        match (self, c) {
            (ScanState::Normal, '"') => ScanState::InQuotes,
            (ScanState::Normal, _) => ScanState::Normal,
            (ScanState::InQuotes, '"') => ScanState::Normal,
            (ScanState::InQuotes, '\\') => ScanState::InQuotesEscaped,
            (ScanState::InQuotes, _) => ScanState::InQuotes,
            (ScanState::InQuotesEscaped, _) => ScanState::InQuotes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Policy for extended values declaring a charset that is not registered.
    pub unknown_charset: UnknownCharset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// A segment without `=`, such as the media type itself.
    Bare(String),

    /// A `name=value` or `name*=value` segment. The `*` is not part of `name`.
    Named { name: String, value: DecodedValue },

    /// A `name*=value` segment whose value could not be decoded. Only produced with
    /// [`UnknownCharset::Reject`].
    Rejected {
        name: String,
        raw: String,
        error: DecodeError,
    },
}

impl Parameter {
    pub fn name(&self) -> Option<&str> {
        match self {
            Parameter::Bare(_) => None,
            Parameter::Named { name, .. } | Parameter::Rejected { name, .. } => Some(name),
        }
    }

    pub fn value(&self) -> Option<&DecodedValue> {
        match self {
            Parameter::Named { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Ordered result of [`parse`]. The first element is always the leading segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterList {
    parameters: Vec<Parameter>,
}

impl ParameterList {
    /// The leading segment, usually the media type or disposition type. May be empty.
    pub fn media_type(&self) -> &str {
        match self.parameters.first() {
            Some(Parameter::Bare(token)) => token,
            _ => "",
        }
    }

    /// Value of the first parameter named exactly `name`.
    pub fn get(&self, name: &str) -> Option<&DecodedValue> {
        self.parameters
            .iter()
            .skip(1)
            .find(|parameter| parameter.name() == Some(name))
            .and_then(Parameter::value)
    }

    pub fn iter(&self) -> slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Always `false`: a list holds at least the leading segment.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl Index<usize> for ParameterList {
    type Output = Parameter;

    fn index(&self, index: usize) -> &Parameter {
        &self.parameters[index]
    }
}

impl IntoIterator for ParameterList {
    type Item = Parameter;
    type IntoIter = std::vec::IntoIter<Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a Parameter;
    type IntoIter = slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.parameters.iter()
    }
}

/// Parses a header value with the default [`ParseOptions`].
pub fn parse(input: &str) -> ParameterList {
    parse_with(input, &ParseOptions::default())
}

/// Parses a header value. Never fails: malformed input is split on a best-effort basis.
pub fn parse_with(input: &str, options: &ParseOptions) -> ParameterList {
    let mut segments = split_segments(input).into_iter();
    let mut parameters = Vec::with_capacity(segments.len());

    let head = segments.next().unwrap_or_default();
    parameters.push(Parameter::Bare(head.trim().to_string()));

    for segment in segments {
        parameters.push(build_parameter(segment.trim(), options));
    }

    trace!("Parsed {} parameter(s) from {:?}.", parameters.len(), input);
    ParameterList { parameters }
}

/// Splits on top-level `;`. A last segment holding only whitespace is dropped, unless it is the
/// only one.
fn split_segments(input: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut state = ScanState::Normal;
    let mut start = 0;

    for (index, c) in input.char_indices() {
        if state == ScanState::Normal && c == ';' {
            segments.push(&input[start..index]);
            start = index + 1;
        }
        state = state.next(c);
    }

    let tail = &input[start..];
    if segments.is_empty() || !tail.trim().is_empty() {
        segments.push(tail);
    }
    segments
}

/// Splits at the first `=` outside quotes.
fn split_key_value(segment: &str) -> Option<(&str, &str)> {
    let mut state = ScanState::Normal;

    for (index, c) in segment.char_indices() {
        if state == ScanState::Normal && c == '=' {
            return Some((&segment[..index], &segment[index + 1..]));
        }
        state = state.next(c);
    }
    None
}

fn build_parameter(segment: &str, options: &ParseOptions) -> Parameter {
    let (key, raw) = match split_key_value(segment) {
        Some((key, raw)) => (key.trim_end(), raw.trim_start()),
        None => return Parameter::Bare(segment.to_string()),
    };

    let (name, extended) = match key.strip_suffix('*') {
        Some(name) => (name.trim_end(), true),
        None => (key, false),
    };

    match decode_value(raw, extended, options.unknown_charset) {
        Ok(value) => Parameter::Named {
            name: name.to_string(),
            value,
        },
        Err(error) => {
            debug!("Parameter {:?} rejected: {}.", name, error);
            Parameter::Rejected {
                name: name.to_string(),
                raw: raw.to_string(),
                error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(token: &str) -> Parameter {
        Parameter::Bare(token.to_string())
    }

    fn named(name: &str, text: &str, extended: bool) -> Parameter {
        Parameter::Named {
            name: name.to_string(),
            value: DecodedValue::new(text, extended),
        }
    }

    #[test]
    fn scan_state_transitions() {
        assert_eq!(ScanState::Normal.next('a'), ScanState::Normal);
        assert_eq!(ScanState::Normal.next('\\'), ScanState::Normal);
        assert_eq!(ScanState::Normal.next('"'), ScanState::InQuotes);
        assert_eq!(ScanState::InQuotes.next(';'), ScanState::InQuotes);
        assert_eq!(ScanState::InQuotes.next('\\'), ScanState::InQuotesEscaped);
        assert_eq!(ScanState::InQuotes.next('"'), ScanState::Normal);
        assert_eq!(ScanState::InQuotesEscaped.next('"'), ScanState::InQuotes);
        assert_eq!(ScanState::InQuotesEscaped.next('\\'), ScanState::InQuotes);
    }

    #[test]
    fn split_segments_respects_quotes() {
        assert_eq!(split_segments("a; b=\"x;y\"; c"), vec!["a", " b=\"x;y\"", " c"]);
        assert_eq!(split_segments("a; b=\"x\\\";y\""), vec!["a", " b=\"x\\\";y\""]);
        assert_eq!(split_segments("a; b=\"x;y"), vec!["a", " b=\"x;y"]);
    }

    #[test]
    fn split_segments_drops_blank_tail_only() {
        assert_eq!(split_segments(""), vec![""]);
        assert_eq!(split_segments("   "), vec!["   "]);
        assert_eq!(split_segments("a;"), vec!["a"]);
        assert_eq!(split_segments("a; \t"), vec!["a"]);
        assert_eq!(split_segments("a;;b"), vec!["a", "", "b"]);
        assert_eq!(split_segments(";a"), vec!["", "a"]);
    }

    #[test]
    fn split_key_value_uses_first_unquoted_equals() {
        assert_eq!(split_key_value("a=b=c"), Some(("a", "b=c")));
        assert_eq!(split_key_value("\"a=b\"=c"), Some(("\"a=b\"", "c")));
        assert_eq!(split_key_value("test"), None);
    }

    #[test]
    fn whitespace_around_key_and_value_is_ignored() {
        let params = parse("text/plain ;  encoding  =  \"a b\" ;\tfoo*  = utf-8''x");
        assert_eq!(
            params.iter().cloned().collect::<Vec<_>>(),
            vec![bare("text/plain"), named("encoding", "a b", false), named("foo", "x", true)]
        );
    }

    #[test]
    fn empty_segments_in_the_middle_are_kept() {
        let params = parse("a;;b; ;c");
        assert_eq!(
            params.into_iter().collect::<Vec<_>>(),
            vec![bare("a"), bare(""), bare("b"), bare(""), bare("c")]
        );
    }

    #[test]
    fn unterminated_quote_consumes_the_rest() {
        let params = parse("text/plain; name=\"abc; other=1");
        assert_eq!(params.len(), 2);
        assert_eq!(params[1], named("name", "abc; other=1", false));
    }

    #[test]
    fn rejected_parameter_does_not_stop_parsing() {
        let options = ParseOptions {
            unknown_charset: UnknownCharset::Reject,
        };
        let params = parse_with("attachment; filename*=koi8-r''%C1; name=x", &options);

        assert_eq!(params.len(), 3);
        assert_eq!(
            params[1],
            Parameter::Rejected {
                name: "filename".to_string(),
                raw: "koi8-r''%C1".to_string(),
                error: DecodeError::UnknownCharset("koi8-r".to_string()),
            }
        );
        assert_eq!(params.get("filename"), None);
        assert_eq!(params.get("name"), Some(&DecodedValue::new("x", false)));
    }

    #[test]
    fn accessors() {
        let params = parse("form-data; name=\"field\"; filename*=utf-8''a%20b; name=second");
        assert_eq!(params.media_type(), "form-data");
        assert_eq!(params.get("name").map(|v| v.text.as_str()), Some("field"));
        assert_eq!(params.get("filename"), Some(&DecodedValue::new("a b", true)));
        assert_eq!(params.get("form-data"), None);
        assert_eq!(params[3].name(), Some("name"));
        assert!(!params.is_empty());
        assert_eq!((&params).into_iter().count(), 4);
    }
}
