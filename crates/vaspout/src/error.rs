//! Error types for the high-level API.

use std::path::Path;

use thiserror::Error;
use vaspout_io::StoreError;

use crate::config::ConfigError;
use crate::version::{Quantity, Version};

/// Errors that can occur when reading records from a container.
#[derive(Debug, Error)]
pub enum Error {
    /// The container could not be opened, or was used after closing.
    #[error("{0}")]
    Access(String),

    /// The file was written by a VASP version that lacks the quantity.
    #[error(
        "{quantity} ({variant}) requires VASP {required} or newer, \
         but the file was written by VASP {actual}"
    )]
    Capability {
        /// The gated quantity.
        quantity: Quantity,
        /// Variant key of the quantity.
        variant: String,
        /// Minimum version declared in the gate table.
        required: Version,
        /// Version recorded in the file.
        actual: Version,
    },

    /// An atom of a selection expression does not resolve to an index.
    #[error("invalid selection `{atom}`: {reason}")]
    Selection {
        /// The offending atom or token.
        atom: String,
        /// What would have been valid.
        reason: String,
    },

    /// A step key is malformed or out of bounds.
    #[error(
        "Error reading the {context}. Please check if the key `{key}` is properly \
         formatted and within the boundaries. The underlying error was:\n{message}"
    )]
    Read {
        /// The key as given by the caller.
        key: String,
        /// Which quantity was being read.
        context: String,
        /// Low-level description of the failure.
        message: String,
    },

    /// A variant key is not part of a keyed result.
    #[error("unknown key `{key}`, available keys are: {}", available.join(", "))]
    Key {
        /// The requested key.
        key: String,
        /// Keys present in the result.
        available: Vec<String>,
    },

    /// Invalid reader configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Error from the storage backend.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    pub(crate) fn closed() -> Self {
        Error::Access("I/O operation on closed file.".to_string())
    }

    pub(crate) fn open_failed(path: &Path, reason: &dyn std::fmt::Display) -> Self {
        Error::Access(format!(
            "Error opening {} to read the data ({reason}). Please check that the VASP \
             calculation has completed and that the file is in the directory, or pass \
             the full path of the file.",
            path.display()
        ))
    }
}
