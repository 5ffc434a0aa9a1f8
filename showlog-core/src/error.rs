use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShowlogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open {what} ({}): {source}", .path.display())]
    Open {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Format error: {0}")]
    Format(String),

    #[error("Unknown layout version: {0}")]
    UnknownLayout(String),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, ShowlogError>;
