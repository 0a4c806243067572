//! Storage backends for VASP HDF5 output.
//!
//! A [`Store`] resolves slash-separated paths (`results/positions/scale`)
//! to datasets and materializes them as [`ArrayData`]. The high-level
//! `vaspout` crate only ever talks to this trait, so the same records can be
//! assembled from an HDF5 file on disk or from data held in memory:
//!
//! - [`MemoryStore`] keeps every dataset in a map (tests, synthetic data)
//! - `Hdf5Store` reads `vaspout.h5` through the HDF5 library (`hdf5` feature)
//!
//! Stores never write; they are read-only views of one calculation.

use std::fmt;
use std::ops::Range;

pub mod error;
pub mod memory;
pub mod types;

#[cfg(feature = "hdf5")]
pub mod hdf5_store;

pub use error::StoreError;
pub use memory::{DatasetBuilder, MemoryStore, MemoryStoreBuilder};
pub use types::{ArrayData, DType, Scalar};

#[cfg(feature = "hdf5")]
pub use hdf5_store::Hdf5Store;

/// Read-only access to a hierarchical container.
///
/// Paths use `/` separators; leading and trailing separators are ignored.
/// `contains` answers for both groups and datasets, every other method
/// requires the path to name a dataset.
pub trait Store: fmt::Debug {
    /// Returns `true` if a group or dataset exists at `path`.
    fn contains(&self, path: &str) -> bool;

    /// Shape of the dataset at `path`.
    fn shape(&self, path: &str) -> Result<Vec<usize>, StoreError>;

    /// Element type of the dataset at `path`.
    fn dtype(&self, path: &str) -> Result<DType, StoreError>;

    /// Materialize the full dataset at `path`.
    fn read(&self, path: &str) -> Result<ArrayData, StoreError>;

    /// Materialize rows `rows` of the leading axis of the dataset at `path`.
    ///
    /// The result keeps the leading axis, so a single row has length one
    /// there. Backends that can read a hyperslab should override this; the
    /// default reads everything and slices.
    fn read_slice(&self, path: &str, rows: Range<usize>) -> Result<ArrayData, StoreError> {
        let data = self.read(path)?;
        check_rows(path, &data.shape(), &rows)?;
        Ok(data.slice_rows(rows))
    }

    /// Read a dataset holding exactly one value.
    fn read_scalar(&self, path: &str) -> Result<Scalar, StoreError> {
        let data = self.read(path)?;
        let shape = data.shape();
        data.into_scalar().ok_or_else(|| StoreError::NotScalar {
            path: path.to_string(),
            shape,
        })
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn contains(&self, path: &str) -> bool {
        (**self).contains(path)
    }

    fn shape(&self, path: &str) -> Result<Vec<usize>, StoreError> {
        (**self).shape(path)
    }

    fn dtype(&self, path: &str) -> Result<DType, StoreError> {
        (**self).dtype(path)
    }

    fn read(&self, path: &str) -> Result<ArrayData, StoreError> {
        (**self).read(path)
    }

    fn read_slice(&self, path: &str, rows: Range<usize>) -> Result<ArrayData, StoreError> {
        (**self).read_slice(path, rows)
    }

    fn read_scalar(&self, path: &str) -> Result<Scalar, StoreError> {
        (**self).read_scalar(path)
    }
}

/// Normalize a path: drop empty components, so `"/a//b/"` becomes `"a/b"`.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check that `rows` lies within the leading axis of `shape`.
pub fn check_rows(path: &str, shape: &[usize], rows: &Range<usize>) -> Result<(), StoreError> {
    let Some(&len) = shape.first() else {
        return Err(StoreError::NoLeadingAxis(normalize_path(path)));
    };
    if rows.start > rows.end || rows.end > len {
        return Err(StoreError::RowsOutOfBounds {
            path: normalize_path(path),
            start: rows.start,
            end: rows.end,
            len,
        });
    }
    Ok(())
}
