//! Lazy dataset handles.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use ndarray::ArrayD;
use tracing::trace;
use vaspout_io::{ArrayData, DType, Scalar};

use crate::container::{mismatch, Shared};
use crate::error::Error;

/// A reference to one dataset of an open [`Container`].
///
/// Creating a handle reads nothing; data is materialized on every `read*`
/// call and never cached. Handles stay valid exactly as long as the
/// container is open.
///
/// [`Container`]: crate::Container
#[derive(Clone)]
pub struct Dataset {
    shared: Rc<Shared>,
    path: String,
}

impl Dataset {
    pub(crate) fn new(shared: Rc<Shared>, path: String) -> Self {
        Self { shared, path }
    }

    /// Normalized path inside the container.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns `false` once the owning container is closed.
    pub fn is_valid(&self) -> bool {
        !self.shared.is_closed()
    }

    pub fn shape(&self) -> Result<Vec<usize>, Error> {
        self.shared.with_store(|store| store.shape(&self.path))
    }

    pub fn ndim(&self) -> Result<usize, Error> {
        Ok(self.shape()?.len())
    }

    pub fn dtype(&self) -> Result<DType, Error> {
        self.shared.with_store(|store| store.dtype(&self.path))
    }

    /// Length of the leading axis (zero for scalars).
    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.shape()?.first().copied().unwrap_or(0))
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len()? == 0)
    }

    /// Materialize the whole dataset.
    pub fn read(&self) -> Result<ArrayData, Error> {
        let data = self.shared.with_store(|store| store.read(&self.path))?;
        trace!(path = %self.path, shape = ?data.shape(), "read dataset");
        Ok(data)
    }

    /// Materialize as floats; integer data is widened.
    pub fn read_f64(&self) -> Result<ArrayD<f64>, Error> {
        let data = self.read()?;
        let actual = data.dtype();
        data.into_f64()
            .ok_or_else(|| mismatch(&self.path, DType::Float, actual))
    }

    pub fn read_i64(&self) -> Result<ArrayD<i64>, Error> {
        let data = self.read()?;
        let actual = data.dtype();
        data.into_i64()
            .ok_or_else(|| mismatch(&self.path, DType::Int, actual))
    }

    pub fn read_strings(&self) -> Result<ArrayD<String>, Error> {
        let data = self.read()?;
        let actual = data.dtype();
        data.into_strings()
            .ok_or_else(|| mismatch(&self.path, DType::String, actual))
    }

    /// Materialize rows `rows` of the leading axis; nothing else is read.
    pub fn read_rows(&self, rows: Range<usize>) -> Result<ArrayData, Error> {
        let data = self
            .shared
            .with_store(|store| store.read_slice(&self.path, rows.clone()))?;
        trace!(path = %self.path, ?rows, shape = ?data.shape(), "read rows");
        Ok(data)
    }

    /// [`read_rows`](Self::read_rows) as floats.
    pub fn read_rows_f64(&self, rows: Range<usize>) -> Result<ArrayD<f64>, Error> {
        let data = self.read_rows(rows)?;
        let actual = data.dtype();
        data.into_f64()
            .ok_or_else(|| mismatch(&self.path, DType::Float, actual))
    }

    /// Read a dataset holding exactly one value.
    pub fn read_scalar(&self) -> Result<Scalar, Error> {
        self.shared.with_store(|store| store.read_scalar(&self.path))
    }
}

impl PartialEq for Dataset {
    /// Two handles are equal when they point at the same path of the same
    /// container.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared) && self.path == other.path
    }
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("path", &self.path)
            .field("valid", &self.is_valid())
            .finish()
    }
}
