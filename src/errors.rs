// ABOUTME: Error types for the reveal-deck application
// ABOUTME: Provides structured error handling for each step of check, build, watch and serve

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("{tool} is missing, Please install it with pip install {tool}")]
    ToolMissing { tool: String },

    #[error(
        "Could not find {submodule}, Please get the submodules using git submodule init && git submodule update (expected {manifest:?})"
    )]
    SubmoduleMissing { submodule: String, manifest: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0:?}")]
    PathNotFound(PathBuf),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} build failed ({status}): {stderr}")]
    BuildFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to start HTTP server on {addr}: {message}")]
    ServerBind { addr: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, DeckError>;
