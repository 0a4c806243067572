//! HDF5 file backend (requires the `hdf5` feature and a system libhdf5).
//!
//! Numeric datasets of any width are widened to `f64`/`i64`; fixed and
//! variable length strings are decoded and right-trimmed, the way VASP pads
//! its ion and orbital labels.

use std::ops::Range;
use std::path::{Path, PathBuf};

use ::hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use ::hdf5::H5Type;
use ndarray::{ArrayD, IxDyn, Slice, SliceInfo, SliceInfoElem};
use tracing::{debug, trace};

use crate::error::StoreError;
use crate::{check_rows, normalize_path};
use crate::types::{ArrayData, DType};
use crate::Store;

/// Longest fixed-length string decoded from a file.
const MAX_FIXED_STRING: usize = 256;

/// A read-only HDF5 file.
pub struct Hdf5Store {
    file: ::hdf5::File,
    path: PathBuf,
}

impl Hdf5Store {
    /// Open an HDF5 file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = ::hdf5::File::open(&path).map_err(backend)?;
        debug!(path = %path.display(), "opened HDF5 file");
        Ok(Self { file, path })
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dataset(&self, path: &str) -> Result<::hdf5::Dataset, StoreError> {
        let key = normalize_path(path);
        if !self.contains(&key) {
            return Err(StoreError::NotFound(key));
        }
        self.file
            .dataset(&key)
            .map_err(|_| StoreError::NotADataset(key))
    }
}

impl std::fmt::Debug for Hdf5Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hdf5Store")
            .field("path", &self.path)
            .finish()
    }
}

impl Store for Hdf5Store {
    fn contains(&self, path: &str) -> bool {
        let key = normalize_path(path);
        let parts: Vec<&str> = key.split('/').filter(|p| !p.is_empty()).collect();
        let Some((last, parents)) = parts.split_last() else {
            return true;
        };
        // Walk one link at a time: H5Lexists fails on missing intermediates.
        let mut group = match self.file.group("/") {
            Ok(group) => group,
            Err(_) => return false,
        };
        for part in parents {
            if !group.link_exists(part) {
                return false;
            }
            group = match group.group(part) {
                Ok(child) => child,
                Err(_) => return false,
            };
        }
        group.link_exists(last)
    }

    fn shape(&self, path: &str) -> Result<Vec<usize>, StoreError> {
        Ok(self.dataset(path)?.shape())
    }

    fn dtype(&self, path: &str) -> Result<DType, StoreError> {
        let ds = self.dataset(path)?;
        classify(&descriptor(&ds)?)
    }

    fn read(&self, path: &str) -> Result<ArrayData, StoreError> {
        let ds = self.dataset(path)?;
        let descriptor = descriptor(&ds)?;
        let data = match classify(&descriptor)? {
            DType::Float => ArrayData::Float(ds.read_dyn::<f64>().map_err(backend)?),
            DType::Int => ArrayData::Int(ds.read_dyn::<i64>().map_err(backend)?),
            DType::String => ArrayData::String(read_strings(&ds, &descriptor, None)?),
        };
        Ok(data)
    }

    fn read_slice(&self, path: &str, rows: Range<usize>) -> Result<ArrayData, StoreError> {
        let ds = self.dataset(path)?;
        let shape = ds.shape();
        check_rows(path, &shape, &rows)?;
        let descriptor = descriptor(&ds)?;
        let dtype = classify(&descriptor)?;
        if rows.is_empty() {
            let mut empty = shape;
            empty[0] = 0;
            return Ok(match dtype {
                DType::Float => ArrayData::Float(ArrayD::zeros(IxDyn(&empty))),
                DType::Int => ArrayData::Int(ArrayD::zeros(IxDyn(&empty))),
                DType::String => ArrayData::String(ArrayD::default(IxDyn(&empty))),
            });
        }
        trace!(path, start = rows.start, end = rows.end, "hyperslab read");
        let slab = Hyperslab::rows(path, shape.len(), rows)?;
        let selection = Some(&slab);
        let data = match dtype {
            DType::Float => ArrayData::Float(read_selected::<f64>(&ds, selection)?),
            DType::Int => ArrayData::Int(read_selected::<i64>(&ds, selection)?),
            DType::String => ArrayData::String(read_strings(&ds, &descriptor, selection)?),
        };
        Ok(data)
    }
}

/// A contiguous block of rows on the leading axis, every other axis whole.
struct Hyperslab(SliceInfo<Vec<SliceInfoElem>, IxDyn, IxDyn>);

impl Hyperslab {
    fn rows(path: &str, ndim: usize, rows: Range<usize>) -> Result<Self, StoreError> {
        let mut elems = Vec::with_capacity(ndim);
        elems.push(SliceInfoElem::from(Slice::from(rows)));
        elems.extend((1..ndim).map(|_| SliceInfoElem::from(..)));
        SliceInfo::try_from(elems)
            .map(Hyperslab)
            .map_err(|source| StoreError::Shape {
                path: normalize_path(path),
                source,
            })
    }
}

fn read_selected<T: H5Type>(
    ds: &::hdf5::Dataset,
    selection: Option<&Hyperslab>,
) -> Result<ArrayD<T>, StoreError> {
    match selection {
        Some(Hyperslab(info)) => ds
            .read_slice::<T, _, IxDyn>(info.clone())
            .map_err(backend),
        None => ds.read_dyn::<T>().map_err(backend),
    }
}

fn descriptor(ds: &::hdf5::Dataset) -> Result<TypeDescriptor, StoreError> {
    ds.dtype()
        .and_then(|dt| dt.to_descriptor())
        .map_err(backend)
}

fn classify(descriptor: &TypeDescriptor) -> Result<DType, StoreError> {
    match descriptor {
        TypeDescriptor::Float(_) => Ok(DType::Float),
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => Ok(DType::Int),
        TypeDescriptor::FixedAscii(_)
        | TypeDescriptor::FixedUnicode(_)
        | TypeDescriptor::VarLenAscii
        | TypeDescriptor::VarLenUnicode => Ok(DType::String),
        other => Err(StoreError::Backend(format!("unsupported datatype: {other}"))),
    }
}

fn read_strings(
    ds: &::hdf5::Dataset,
    descriptor: &TypeDescriptor,
    selection: Option<&Hyperslab>,
) -> Result<ArrayD<String>, StoreError> {
    let strings = match descriptor {
        TypeDescriptor::VarLenAscii => read_selected::<VarLenAscii>(ds, selection)?
            .map(|s| s.as_str().trim_end().to_string()),
        TypeDescriptor::VarLenUnicode => read_selected::<VarLenUnicode>(ds, selection)?
            .map(|s| s.as_str().trim_end().to_string()),
        TypeDescriptor::FixedUnicode(_) => {
            read_selected::<FixedUnicode<MAX_FIXED_STRING>>(ds, selection)?
                .map(|s| s.as_str().trim_end().to_string())
        }
        _ => read_selected::<FixedAscii<MAX_FIXED_STRING>>(ds, selection)?
            .map(|s| s.as_str().trim_end().to_string()),
    };
    Ok(strings)
}

fn backend(err: ::hdf5::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
