//! PyO3 wrapper for the sentencepiece encoder

use pyo3::prelude::*;
use shapepiece_core::Segmenter;
use shapepiece_tokenizer::{CachedPathResolver, SentencepieceArgs, SentencepieceBpe};

use crate::error::IntoPyErr;

/// Sentencepiece encoder with optional token-shape encoding
#[pyclass(name = "SentencepieceBPE", frozen)]
pub struct PySentencepieceBpe {
    inner: SentencepieceBpe,
}

#[pymethods]
impl PySentencepieceBpe {
    /// Load the model at `model`, a local path or a cached URL
    #[new]
    #[pyo3(signature = (model, encode_shapes=false))]
    fn new(model: String, encode_shapes: bool) -> PyResult<Self> {
        let args = SentencepieceArgs {
            sentencepiece_model: Some(model),
            sentencepiece_encode_shapes: Some(encode_shapes),
        };
        let resolver = CachedPathResolver::from_env();
        let inner = SentencepieceBpe::from_args(&args, &resolver)
            .map_err(|e| e.into_py_err())?;
        Ok(Self { inner })
    }

    /// Whether pieces are emitted in their original casing
    #[getter]
    fn encode_shapes(&self) -> bool {
        self.inner.encode_shapes()
    }

    /// Encode one line to space-separated pieces
    fn encode(&self, py: Python<'_>, text: &str) -> PyResult<String> {
        py.allow_threads(|| self.inner.encode(text))
            .map_err(|e| e.into_py_err())
    }

    /// Encode many lines in parallel
    fn encode_batch(&self, py: Python<'_>, texts: Vec<String>) -> PyResult<Vec<String>> {
        py.allow_threads(|| self.inner.encode_batch(&texts))
            .map_err(|e| e.into_py_err())
    }

    fn decode(&self, text: &str) -> String {
        self.inner.decode(text)
    }

    fn is_beginning_of_word(&self, token: &str) -> bool {
        self.inner.is_beginning_of_word(token)
    }

    fn __repr__(&self) -> String {
        format!(
            "SentencepieceBPE(vocab_size={}, encode_shapes={})",
            self.inner.segmenter().vocab_size(),
            self.inner.encode_shapes()
        )
    }
}
