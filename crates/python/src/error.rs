//! Error handling for Python bindings

use pyo3::{create_exception, exceptions::PyRuntimeError, PyErr};
use shapepiece_tokenizer::TokenizerError as RustTokenizerError;

create_exception!(
    shapepiece,
    TokenizerError,
    PyRuntimeError,
    "Error during encoding or model loading"
);

/// Convert a Rust TokenizerError to a Python exception
pub trait IntoPyErr {
    fn into_py_err(self) -> PyErr;
}

impl IntoPyErr for RustTokenizerError {
    fn into_py_err(self) -> PyErr {
        TokenizerError::new_err(self.to_string())
    }
}
