//! In-memory store.
//!
//! [`MemoryStore`] keeps every dataset in an ordered map keyed by its
//! normalized path. Groups are implicit: a group exists whenever some
//! dataset lives below it. The [`MemoryStoreBuilder`] mirrors the way an
//! HDF5 file is written, one dataset at a time:
//!
//! ```
//! use vaspout_io::{MemoryStore, Store};
//!
//! let mut b = MemoryStore::builder();
//! b.create_dataset("results/positions/scale").with_f64_scalar(1.0);
//! b.create_dataset("results/positions/lattice_vectors")
//!     .with_f64_data(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
//!     .with_shape(&[3, 3]);
//! let store = b.finish().unwrap();
//! assert!(store.contains("results/positions"));
//! assert_eq!(store.shape("results/positions/lattice_vectors").unwrap(), vec![3, 3]);
//! ```

use std::collections::BTreeMap;
use std::ops::Range;

use ndarray::{ArrayD, IxDyn};

use crate::error::StoreError;
use crate::{check_rows, normalize_path};
use crate::types::{ArrayData, DType};
use crate::Store;

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// A store backed by materialized arrays held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    datasets: BTreeMap<String, ArrayData>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a store dataset by dataset.
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::new()
    }

    /// Insert or replace the dataset at `path`, returning the previous one.
    pub fn insert(&mut self, path: &str, data: impl Into<ArrayData>) -> Option<ArrayData> {
        self.datasets.insert(normalize_path(path), data.into())
    }

    /// Remove the dataset at `path`.
    pub fn remove(&mut self, path: &str) -> Option<ArrayData> {
        self.datasets.remove(&normalize_path(path))
    }

    /// Remove a group and everything below it. Returns the number of
    /// datasets removed.
    pub fn remove_group(&mut self, path: &str) -> usize {
        let prefix = format!("{}/", normalize_path(path));
        let before = self.datasets.len();
        self.datasets.retain(|key, _| !key.starts_with(&prefix));
        before - self.datasets.len()
    }

    /// Iterate over all dataset paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Returns true if the store holds no datasets.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    fn lookup(&self, path: &str) -> Result<&ArrayData, StoreError> {
        let key = normalize_path(path);
        match self.datasets.get(&key) {
            Some(data) => Ok(data),
            None if self.contains(&key) => Err(StoreError::NotADataset(key)),
            None => Err(StoreError::NotFound(key)),
        }
    }
}

impl Store for MemoryStore {
    fn contains(&self, path: &str) -> bool {
        let key = normalize_path(path);
        if key.is_empty() || self.datasets.contains_key(&key) {
            return true;
        }
        let prefix = format!("{key}/");
        self.datasets
            .range(prefix.clone()..)
            .next()
            .map_or(false, |(k, _)| k.starts_with(&prefix))
    }

    fn shape(&self, path: &str) -> Result<Vec<usize>, StoreError> {
        Ok(self.lookup(path)?.shape())
    }

    fn dtype(&self, path: &str) -> Result<DType, StoreError> {
        Ok(self.lookup(path)?.dtype())
    }

    fn read(&self, path: &str) -> Result<ArrayData, StoreError> {
        Ok(self.lookup(path)?.clone())
    }

    fn read_slice(&self, path: &str, rows: Range<usize>) -> Result<ArrayData, StoreError> {
        let data = self.lookup(path)?;
        check_rows(path, &data.shape(), &rows)?;
        Ok(data.slice_rows(rows))
    }
}

// ---------------------------------------------------------------------------
// MemoryStoreBuilder
// ---------------------------------------------------------------------------

/// Collects dataset definitions and validates their shapes on `finish`.
#[derive(Debug, Default)]
pub struct MemoryStoreBuilder {
    datasets: Vec<DatasetBuilder>,
}

impl MemoryStoreBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a dataset at `path`. A later dataset at the same path wins.
    pub fn create_dataset(&mut self, path: &str) -> &mut DatasetBuilder {
        let index = self.datasets.len();
        self.datasets.push(DatasetBuilder::new(path));
        &mut self.datasets[index]
    }

    /// Build the store, reshaping every dataset.
    pub fn finish(self) -> Result<MemoryStore, StoreError> {
        let mut store = MemoryStore::new();
        for dataset in self.datasets {
            let (path, data) = dataset.build()?;
            store.datasets.insert(path, data);
        }
        Ok(store)
    }
}

#[derive(Debug, Clone)]
enum Values {
    Float(Vec<f64>),
    Int(Vec<i64>),
    String(Vec<String>),
}

/// Definition of one dataset inside a [`MemoryStoreBuilder`].
///
/// Without an explicit shape the data is stored as a one-dimensional array.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    path: String,
    values: Values,
    shape: Option<Vec<usize>>,
}

impl DatasetBuilder {
    fn new(path: &str) -> Self {
        Self {
            path: normalize_path(path),
            values: Values::Float(Vec::new()),
            shape: None,
        }
    }

    /// Store floating point values.
    pub fn with_f64_data(&mut self, data: &[f64]) -> &mut Self {
        self.values = Values::Float(data.to_vec());
        self
    }

    /// Store integer values.
    pub fn with_i64_data(&mut self, data: &[i64]) -> &mut Self {
        self.values = Values::Int(data.to_vec());
        self
    }

    /// Store string values.
    pub fn with_strings(&mut self, data: &[&str]) -> &mut Self {
        self.values = Values::String(data.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Store a single float as a zero-dimensional dataset.
    pub fn with_f64_scalar(&mut self, value: f64) -> &mut Self {
        self.with_f64_data(&[value]).with_shape(&[])
    }

    /// Store a single integer as a zero-dimensional dataset.
    pub fn with_i64_scalar(&mut self, value: i64) -> &mut Self {
        self.with_i64_data(&[value]).with_shape(&[])
    }

    /// Store a single string as a zero-dimensional dataset.
    pub fn with_string_scalar(&mut self, value: &str) -> &mut Self {
        self.with_strings(&[value]).with_shape(&[])
    }

    /// Set the shape of the dataset (row-major).
    pub fn with_shape(&mut self, shape: &[usize]) -> &mut Self {
        self.shape = Some(shape.to_vec());
        self
    }

    fn build(self) -> Result<(String, ArrayData), StoreError> {
        let DatasetBuilder {
            path,
            values,
            shape,
        } = self;
        let data = match values {
            Values::Float(v) => {
                let shape = shape.unwrap_or_else(|| vec![v.len()]);
                ArrayData::Float(reshape(&path, &shape, v)?)
            }
            Values::Int(v) => {
                let shape = shape.unwrap_or_else(|| vec![v.len()]);
                ArrayData::Int(reshape(&path, &shape, v)?)
            }
            Values::String(v) => {
                let shape = shape.unwrap_or_else(|| vec![v.len()]);
                ArrayData::String(reshape(&path, &shape, v)?)
            }
        };
        Ok((path, data))
    }
}

fn reshape<T>(path: &str, shape: &[usize], values: Vec<T>) -> Result<ArrayD<T>, StoreError> {
    ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|source| StoreError::Shape {
        path: path.to_string(),
        source,
    })
}
