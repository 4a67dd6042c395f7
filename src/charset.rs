//! Charsets accepted in [RFC 5987](https://datatracker.ietf.org/doc/html/rfc5987#section-3.2)
//! extended parameter values.
//!
//! The registry maps a lowercase charset name to a function turning the percent-decoded octets
//! into text. Adding a charset means adding a row to `CHARSETS`.

use log::debug;

use crate::decode::DecodeError;

/// Turns raw octets into text.
pub type Decoder = fn(&[u8]) -> String;

const CHARSETS: &[(&str, Decoder)] = &[
    ("utf-8", decode_utf8 as Decoder),
    ("utf8", decode_utf8 as Decoder),
    ("iso-8859-1", decode_latin1 as Decoder),
    ("latin1", decode_latin1 as Decoder),
];

/// What to do with an extended value whose charset is not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownCharset {
    /// Map every octet to the code point of the same value, as ISO-8859-1 does.
    #[default]
    Latin1,
    /// Report [`DecodeError::UnknownCharset`] for the parameter.
    Reject,
}

/// Finds the decoder registered for `name`, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<Decoder> {
    CHARSETS
        .iter()
        .find(|(charset, _)| charset.eq_ignore_ascii_case(name))
        .map(|&(_, decoder)| decoder)
}

pub fn decode_bytes(charset: &str, bytes: &[u8], policy: UnknownCharset) -> Result<String, DecodeError> {
    match lookup(charset) {
        Some(decoder) => Ok(decoder(bytes)),
        None => match policy {
            UnknownCharset::Latin1 => {
                debug!("Unknown charset {:?}, falling back to ISO-8859-1.", charset);
                Ok(decode_latin1(bytes))
            }
            UnknownCharset::Reject => Err(DecodeError::UnknownCharset(charset.to_string())),
        },
    }
}

/// Invalid sequences become U+FFFD, so no octet disappears without a trace.
fn decode_utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
