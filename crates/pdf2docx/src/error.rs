//! Crate-wide error type.
//!
//! Per-image, per-annotation and per-table failures are recovered locally by
//! the page assembler and reported through `tracing`; they never become an
//! `Error` variant. Only conditions that abort a whole conversion live here.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input file not found: {0}")]
    InputMissing(PathBuf),

    #[error("input could not be read as a PDF: {0}")]
    InputUnreadable(String),

    #[error("conversion was cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("package error: {0}")]
    Package(String),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, Error>;
