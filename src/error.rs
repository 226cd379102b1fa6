//! Error types
//!
//! Resolution itself never fails: lookup errors and malformed records are
//! absorbed and logged. These errors cover the edges of the program, i.e.
//! argument validation, resolver setup, file output and process control.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors raised outside the resolve/merge core
#[derive(Debug, thiserror::Error)]
pub enum DnsConfigError {
    #[error("unknown service '{0}'")]
    UnknownService(String),

    #[error("invalid hostname '{0}'")]
    InvalidHostname(String),

    #[error("could not determine local hostname: {0}")]
    Hostname(#[source] std::io::Error),

    #[error("failed to initialise DNS resolver: {0}")]
    ResolverInit(#[from] hickory_resolver::ResolveError),

    #[error("failed to create directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}")]
    CommandFailed { command: String, status: ExitStatus },
}

pub type Result<T> = std::result::Result<T, DnsConfigError>;
