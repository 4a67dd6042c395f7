//! Python bindings. Built with `--features python` as the `header_params` extension module.

use pyo3::prelude::*;

use crate::charset::UnknownCharset;
use crate::params::{self, Parameter, ParseOptions};

/// Bare tokens become `str`, named parameters `(name, (text, extended))`, and rejected ones
/// `(name, None)`.
impl IntoPy<PyObject> for Parameter {
    fn into_py(self, py: Python<'_>) -> PyObject {
        match self {
            Parameter::Bare(token) => token.into_py(py),
            Parameter::Named { name, value } => (name, (value.text, value.extended)).into_py(py),
            Parameter::Rejected { name, .. } => (name, py.None()).into_py(py),
        }
    }
}

#[pyfunction]
#[pyo3(signature = (value, strict_charset = false))]
pub fn parse_params(value: &str, strict_charset: bool) -> Vec<Parameter> {
    let options = ParseOptions {
        unknown_charset: if strict_charset {
            UnknownCharset::Reject
        } else {
            UnknownCharset::Latin1
        },
    };

    params::parse_with(value, &options).into_iter().collect()
}
