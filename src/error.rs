//! Error types for oltstat.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for oltstat operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Interactive session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Source document errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// No source documents found at the given path
    #[error("No .txt documents found under {path}")]
    NoDocuments { path: PathBuf },

    /// I/O error while writing reports or captures
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Interactive session errors (shell setup, command capture).
#[derive(Error, Debug)]
pub enum SessionError {
    /// Channel closed while a capture was in progress
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),
}

/// Source document errors (reading and decoding capture files).
#[derive(Error, Debug)]
pub enum SourceError {
    /// None of the attempted text encodings could decode the document.
    /// Fatal for this document only; batches continue with siblings.
    #[error("Unreadable input: {path} decodes under none of utf-8/gbk/gb18030")]
    UnreadableInput { path: PathBuf },

    /// Failed to read the document from disk
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias using oltstat's Error.
pub type Result<T> = std::result::Result<T, Error>;
