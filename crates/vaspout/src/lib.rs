//! Lazy, version-aware access to VASP output.
//!
//! A [`Container`] wraps one `vaspout.h5` file (or any other
//! [`vaspout_io::Store`]) and hands out typed records. Records carry scalars
//! and lazy [`Dataset`] handles; arrays are only read when asked for.
//!
//! - Mandatory records (`topology`, `cell`, `structure`) are returned
//!   directly and fail if the file lacks them
//! - Optional records are `None` when their data is missing
//! - Quantities with several sources (`band`, `dos`, `kpoints`,
//!   `projectors`) come back as [`Variants`] keyed `default` and
//!   `kpoints_opt`
//! - Quantities newer VASP releases introduced are gated on the file's
//!   version; see [`version::GATES`]
//!
//! ```
//! use vaspout::Container;
//! use vaspout_io::MemoryStore;
//!
//! let mut b = MemoryStore::builder();
//! b.create_dataset("version/major").with_i64_scalar(6);
//! b.create_dataset("version/minor").with_i64_scalar(4);
//! b.create_dataset("version/patch").with_i64_scalar(0);
//! b.create_dataset("results/positions/scale").with_f64_scalar(3.9);
//! b.create_dataset("results/positions/lattice_vectors")
//!     .with_f64_data(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
//!     .with_shape(&[3, 3]);
//! let container = Container::from_store(b.finish().unwrap()).unwrap();
//!
//! let cell = container.cell().unwrap();
//! assert_eq!(cell.scale, 3.9);
//! assert_eq!(cell.lattice_vectors.shape().unwrap(), vec![3, 3]);
//! assert!(container.density().unwrap().is_none());
//! ```
//!
//! Everything is single threaded: handles share the open store through an
//! `Rc` and become invalid when the container closes.

pub mod assemble;
pub mod config;
pub mod container;
pub mod dataset;
pub mod error;
pub mod exciton;
pub mod index;
pub mod magnetism;
pub mod records;
pub mod select;
pub mod steps;
pub mod variants;
pub mod version;

pub use assemble::Record;
pub use config::{Config, ConfigError, DEFAULT_FILENAME};
pub use container::Container;
pub use dataset::Dataset;
pub use error::Error;
pub use exciton::SelectedDensity;
pub use index::{AtomMap, Selector};
pub use magnetism::MagnetismData;
pub use records::{
    Band, Cell, Density, DielectricFunction, DielectricTensor, Dos, Energy, ExcitonDensity,
    Force, ForceConstant, Kpoints, Magnetism, Projectors, Stress, Structure, Topology,
    Trajectory,
};
pub use select::{Atom, Selection, Tree};
pub use steps::{StepReader, Steps};
pub use variants::{Variants, DEFAULT, KPOINTS_OPT};
pub use version::{Quantity, Version};

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
