//! Container handle over one VASP output file.
//!
//! A [`Container`] owns the open [`Store`]; every [`Dataset`] handle and
//! every record assembled from it shares that store through a reference
//! counted cell. Closing the container empties the cell, so all outstanding
//! handles fail with an access error instead of reading stale data:
//!
//! - On open: resolve the filename, open the store, read the version once
//! - On `get`: check the path exists, hand out a lazy [`Dataset`]
//! - On `close` (or drop): release the store, invalidate every handle

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;
use vaspout_io::{normalize_path, DType, Scalar, Store, StoreError};

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::Error;
use crate::version::Version;

const VERSION_MAJOR: &str = "version/major";
const VERSION_MINOR: &str = "version/minor";
const VERSION_PATCH: &str = "version/patch";

/// Store shared between a container and the handles it gave out.
#[derive(Debug)]
pub(crate) struct Shared {
    store: RefCell<Option<Box<dyn Store>>>,
}

impl Shared {
    fn new(store: Box<dyn Store>) -> Self {
        Self {
            store: RefCell::new(Some(store)),
        }
    }

    /// Run `f` against the open store; fails once the store is released.
    pub(crate) fn with_store<T>(
        &self,
        f: impl FnOnce(&dyn Store) -> Result<T, StoreError>,
    ) -> Result<T, Error> {
        let guard = self.store.borrow();
        let store = guard.as_deref().ok_or_else(Error::closed)?;
        Ok(f(store)?)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.store.borrow().is_none()
    }

    fn close(&self) -> bool {
        self.store.borrow_mut().take().is_some()
    }
}

/// An open VASP output file.
///
/// ```
/// use vaspout::Container;
/// use vaspout_io::MemoryStore;
///
/// let mut b = MemoryStore::builder();
/// b.create_dataset("version/major").with_i64_scalar(6);
/// b.create_dataset("version/minor").with_i64_scalar(4);
/// b.create_dataset("version/patch").with_i64_scalar(0);
/// let container = Container::from_store(b.finish().unwrap()).unwrap();
/// assert_eq!(container.version().unwrap().to_string(), "6.4.0");
/// container.close();
/// assert!(container.version().is_err());
/// ```
#[derive(Debug)]
pub struct Container {
    shared: Rc<Shared>,
    path: Option<PathBuf>,
    version: Version,
}

impl Container {
    /// Open `path` (a file, or a directory holding `vaspout.h5`) with the
    /// HDF5 backend.
    #[cfg(feature = "hdf5")]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::open_with(path, &Config::default(), |file| {
            let store = vaspout_io::Hdf5Store::open(file)?;
            Ok(Box::new(store) as Box<dyn Store>)
        })
    }

    /// Resolve `path` with `config`, then open the resolved file with
    /// `opener`. Any failure along the way is an [`Error::Access`].
    pub fn open_with<P, F>(path: P, config: &Config, opener: F) -> Result<Self, Error>
    where
        P: AsRef<Path>,
        F: FnOnce(&Path) -> Result<Box<dyn Store>, StoreError>,
    {
        let file = config.resolve(path.as_ref())?;
        let store = opener(&file).map_err(|err| Error::open_failed(&file, &err))?;
        Self::init(Some(file), store)
    }

    /// Wrap an already open store.
    pub fn from_store<S: Store + 'static>(store: S) -> Result<Self, Error> {
        Self::init(None, Box::new(store))
    }

    fn init(path: Option<PathBuf>, store: Box<dyn Store>) -> Result<Self, Error> {
        let shared = Rc::new(Shared::new(store));
        let version = read_version(&shared)?;
        debug!(path = ?path, version = %version, "opened container");
        Ok(Self {
            shared,
            path,
            version,
        })
    }

    /// Path of the file, if the container was opened from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// VASP version that wrote the file.
    pub fn version(&self) -> Result<Version, Error> {
        self.ensure_open()?;
        Ok(self.version)
    }

    /// Returns `true` if a group or dataset exists at `key`.
    pub fn exists(&self, key: &str) -> Result<bool, Error> {
        self.shared.with_store(|store| Ok(store.contains(key)))
    }

    /// Lazy handle to the dataset at `key`. Nothing is read yet.
    pub fn get(&self, key: &str) -> Result<Dataset, Error> {
        let path = normalize_path(key);
        self.shared.with_store(|store| {
            if !store.contains(&path) {
                return Err(StoreError::NotFound(path.clone()));
            }
            store.shape(&path).map(|_| ())
        })?;
        Ok(Dataset::new(Rc::clone(&self.shared), path))
    }

    /// Like [`get`](Self::get), but a missing path yields `None`.
    pub fn safe_get(&self, key: &str) -> Result<Option<Dataset>, Error> {
        if self.exists(key)? {
            self.get(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Read a single value.
    pub fn read_scalar(&self, key: &str) -> Result<Scalar, Error> {
        self.shared.with_store(|store| store.read_scalar(key))
    }

    pub(crate) fn read_f64(&self, key: &str) -> Result<f64, Error> {
        let scalar = self.read_scalar(key)?;
        scalar
            .as_f64()
            .ok_or_else(|| mismatch(key, DType::Float, scalar.dtype()))
    }

    pub(crate) fn read_i64(&self, key: &str) -> Result<i64, Error> {
        let scalar = self.read_scalar(key)?;
        scalar
            .as_i64()
            .ok_or_else(|| mismatch(key, DType::Int, scalar.dtype()))
    }

    /// Release the store. Safe to call more than once.
    pub fn close(&self) {
        if self.shared.close() {
            debug!(path = ?self.path, "closed container");
        }
    }

    /// Returns `true` once [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.is_closed() {
            return Err(Error::closed());
        }
        Ok(())
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        self.close();
    }
}

fn read_version(shared: &Shared) -> Result<Version, Error> {
    let component = |key: &str| -> Result<u32, Error> {
        let scalar = shared.with_store(|store| store.read_scalar(key))?;
        scalar
            .as_i64()
            .and_then(|value| u32::try_from(value).ok())
            .ok_or_else(|| Error::Read {
                key: key.to_string(),
                context: "version".to_string(),
                message: format!("expected a non-negative integer, found {scalar}"),
            })
    };
    Ok(Version::new(
        component(VERSION_MAJOR)?,
        component(VERSION_MINOR)?,
        component(VERSION_PATCH)?,
    ))
}

pub(crate) fn mismatch(key: &str, expected: DType, actual: DType) -> Error {
    Error::Store(StoreError::TypeMismatch {
        path: normalize_path(key),
        expected,
        actual,
    })
}
