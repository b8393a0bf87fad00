use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum BiomajError {
    #[error("BioMaj server unreachable ({url}): {message}")]
    UnreachableServer { url: String, message: String },

    #[error("received wrong response from BioMaj server: {0}")]
    MalformedResponse(String),

    #[error("value is not one of the available banks: {0}")]
    ValidationFailed(String),

    #[error("bank path not found: {0}")]
    PathNotFound(String),

    #[error("bank path {path} is outside of {prefix}")]
    PrefixMismatch { path: String, prefix: String },

    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    #[error("missing config file biomaj.json")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("no BioMaj server configured (set `server` in biomaj.json or BIOMAJ_SERVER)")]
    MissingServer,

    #[error("failed to build HTTP client: {0}")]
    Http(String),
}
