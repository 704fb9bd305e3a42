//! Error types for the handsketch core.

use thiserror::Error;

use crate::practice::catalog::TemplateKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("template not found: {kind} {key:?}")]
    TemplateNotFound { kind: TemplateKind, key: String },

    #[error("invalid landmark count: expected {expected}, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
