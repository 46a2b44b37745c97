//! Errors raised while loading exported survey data.

use crate::models::Category;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("duplicate question id '{0}'")]
    DuplicateQuestion(String),

    #[error("duplicate composite id '{0}'")]
    DuplicateComposite(String),

    #[error("composite '{composite}' references unknown question '{question}'")]
    UnknownQuestion { composite: String, question: String },

    #[error(
        "composite '{composite}' ({expected}) contains question '{question}' from category {found}"
    )]
    CategoryMismatch {
        composite: String,
        question: String,
        expected: Category,
        found: Category,
    },
}

pub type Result<T> = std::result::Result<T, DatasetError>;
