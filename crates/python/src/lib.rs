//! Python bindings for shapepiece
//!
//! Exposes the sentencepiece encoder so a Python training pipeline can call
//! it per line.

use pyo3::prelude::*;

mod encoder;
mod error;

use encoder::PySentencepieceBpe;

/// shapepiece: sentencepiece encoding with token shapes
#[pymodule]
fn shapepiece(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySentencepieceBpe>()?;
    m.add("TokenizerError", m.py().get_type_bound::<error::TokenizerError>())?;

    // Add version info
    m.add("__version__", shapepiece_tokenizer::VERSION)?;

    Ok(())
}
