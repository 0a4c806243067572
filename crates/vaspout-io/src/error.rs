//! Error types for storage backends.

use thiserror::Error;

use crate::types::DType;

/// Errors that can occur when a backend resolves or decodes a path.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing exists at the given path.
    #[error("path not found: {0}")]
    NotFound(String),

    /// The path names a group, not a dataset.
    #[error("not a dataset: {0}")]
    NotADataset(String),

    /// A scalar was requested from a dataset holding more than one value.
    #[error("dataset {path} is not a scalar (shape {shape:?})")]
    NotScalar {
        /// Path of the offending dataset.
        path: String,
        /// Its actual shape.
        shape: Vec<usize>,
    },

    /// A row selection was made on a zero-dimensional dataset.
    #[error("dataset {0} has no leading axis to slice")]
    NoLeadingAxis(String),

    /// A row selection reaches past the leading axis.
    #[error("rows {start}..{end} are out of bounds for dataset {path} with {len} rows")]
    RowsOutOfBounds {
        /// Path of the offending dataset.
        path: String,
        /// First requested row.
        start: usize,
        /// One past the last requested row.
        end: usize,
        /// Length of the leading axis.
        len: usize,
    },

    /// The dataset holds values of a different kind than requested.
    #[error("dataset {path} holds {actual} values, expected {expected}")]
    TypeMismatch {
        /// Path of the offending dataset.
        path: String,
        /// The requested element type.
        expected: DType,
        /// The element type stored in the container.
        actual: DType,
    },

    /// Flat data did not fit the declared shape.
    #[error("shape error for {path}: {source}")]
    Shape {
        /// Path of the offending dataset.
        path: String,
        /// The underlying ndarray error.
        #[source]
        source: ndarray::ShapeError,
    },

    /// Error reported by the underlying HDF5 library.
    #[error("HDF5 error: {0}")]
    Backend(String),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
