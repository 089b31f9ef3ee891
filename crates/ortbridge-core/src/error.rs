use std::path::PathBuf;

use crate::types::ElementType;

/// Adapter error taxonomy. Every failure is surfaced synchronously to the
/// immediate caller; nothing is retried or recovered internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("model not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to parse model: {0}")]
    Parse(#[from] prost::DecodeError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Half-precision element on a device without fp16 support. Names the
    /// offending model element.
    #[error("{detail} ({element})")]
    UnsupportedOnDevice { element: String, detail: String },

    #[error("a model was already loaded into this session")]
    AlreadyLoaded,

    #[error("no model has been loaded into this session")]
    NotLoaded,

    #[error("unsupported element type {ty:?} for {context}")]
    UnsupportedElementType {
        context: &'static str,
        ty: ElementType,
    },

    #[error("no model output matches bound slot `{name}`")]
    UnknownSlot { name: String },

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// Pass-through engine failure, meaning preserved.
    #[error("engine error: {0}")]
    Engine(String),
}

impl Error {
    pub fn engine(err: impl std::fmt::Display) -> Self {
        Error::Engine(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
