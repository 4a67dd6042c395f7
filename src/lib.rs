//! Parser for the parameter lists carried by headers such as `Content-Type` and
//! `Content-Disposition`.
//!
//! ```
//! use header_params::{parse, DecodedValue};
//!
//! let params = parse("attachment; filename=\"rates.txt\"; filename*=utf-8''%e2%82%ac%20rates");
//!
//! assert_eq!(params.media_type(), "attachment");
//! assert_eq!(params.get("filename"), Some(&DecodedValue::new("rates.txt", false)));
//! assert_eq!(params[2].value(), Some(&DecodedValue::new("€ rates", true)));
//! ```

pub mod charset;
pub mod decode;
pub mod params;

#[cfg(feature = "python")]
mod python;

pub use charset::UnknownCharset;
pub use decode::{decode_value, DecodeError, DecodedValue};
pub use params::{parse, parse_with, Parameter, ParameterList, ParseOptions};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn header_params(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_function(wrap_pyfunction!(python::parse_params, m)?)?;
    Ok(())
}
