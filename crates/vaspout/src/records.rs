//! Record types assembled from a container.
//!
//! Scalars are read while assembling, arrays stay as lazy [`Dataset`]
//! handles. A record is either complete or absent; nested records are
//! built by their own assembler.

use tracing::trace;
use vaspout_io::StoreError;

use crate::assemble::Record;
use crate::container::Container;
use crate::dataset::Dataset;
use crate::error::Error;
use crate::index::AtomMap;
use crate::variants::{DEFAULT, KPOINTS_OPT};
use crate::version::{Quantity, Version};

const BOTH: &[&str] = &[DEFAULT, KPOINTS_OPT];

/// Suffix of the result groups for a variant.
fn suffix(variant: &str) -> Result<&'static str, Error> {
    match variant {
        DEFAULT => Ok(""),
        KPOINTS_OPT => Ok("_kpoints_opt"),
        other => Err(Error::Key {
            key: other.to_string(),
            available: BOTH.iter().map(|k| k.to_string()).collect(),
        }),
    }
}

/// Input group holding the k-point definition for a variant.
fn kpoints_input(variant: &str) -> Result<&'static str, Error> {
    match variant {
        DEFAULT => Ok("input/kpoints"),
        KPOINTS_OPT => Ok("input/kpoints_opt"),
        other => suffix(other),
    }
}

/// `false` (with a trace) when the root of an optional record is missing.
fn present(container: &Container, quantity: Quantity, root: &str) -> Result<bool, Error> {
    let exists = container.exists(root)?;
    if !exists {
        trace!(quantity = %quantity, root, "record absent");
    }
    Ok(exists)
}

// ---------------------------------------------------------------------------
// Mandatory records
// ---------------------------------------------------------------------------

impl Record for Version {
    const QUANTITY: Quantity = Quantity::Version;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        container.version().map(Some)
    }
}

/// Ion types and how many ions of each type the cell holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    pub ion_types: Dataset,
    pub number_ion_types: Dataset,
}

impl Topology {
    pub(crate) fn read(container: &Container) -> Result<Self, Error> {
        Ok(Self {
            ion_types: container.get("results/positions/ion_types")?,
            number_ion_types: container.get("results/positions/number_ion_types")?,
        })
    }

    /// Total number of ions. A negative count is a read error.
    pub fn number_ions(&self) -> Result<usize, Error> {
        let counts = self.number_ion_types.read_i64()?;
        counts.iter().enumerate().try_fold(0usize, |total, (i, &n)| {
            let n = usize::try_from(n).map_err(|_| Error::Read {
                key: self.number_ion_types.path().to_string(),
                context: "number of ions".to_string(),
                message: format!("ion type {i} has a negative count {n}"),
            })?;
            Ok::<usize, Error>(total + n)
        })
    }
}

impl Record for Topology {
    const QUANTITY: Quantity = Quantity::Topology;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        Self::read(container).map(Some)
    }
}

/// Lattice vectors and their scaling factor.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub scale: f64,
    pub lattice_vectors: Dataset,
}

impl Cell {
    pub(crate) fn read(container: &Container) -> Result<Self, Error> {
        Ok(Self {
            scale: container.read_f64("results/positions/scale")?,
            lattice_vectors: container.get("results/positions/lattice_vectors")?,
        })
    }
}

impl Record for Cell {
    const QUANTITY: Quantity = Quantity::Cell;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        Self::read(container).map(Some)
    }
}

/// Final structure of the calculation.
///
/// `magnetic_moments` points at the raw moments when the run was spin
/// polarized; the full analysis lives on [`Magnetism`].
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub topology: Topology,
    pub cell: Cell,
    pub positions: Dataset,
    pub magnetic_moments: Option<Dataset>,
}

impl Structure {
    pub(crate) fn read(container: &Container) -> Result<Self, Error> {
        Ok(Self {
            topology: Topology::read(container)?,
            cell: Cell::read(container)?,
            positions: container.get("results/positions/position_ions")?,
            magnetic_moments: container.safe_get(Magnetism::ROOT)?,
        })
    }
}

impl Record for Structure {
    const QUANTITY: Quantity = Quantity::Structure;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        Self::read(container).map(Some)
    }
}

// ---------------------------------------------------------------------------
// Electronic structure
// ---------------------------------------------------------------------------

/// Magnetic moments along the ionic relaxation, indexed
/// `[step, component, atom, orbital]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Magnetism {
    pub structure: Structure,
    pub moments: Dataset,
}

impl Magnetism {
    pub(crate) const ROOT: &'static str = "intermediate/ion_dynamics/magnetism/moments";
}

impl Record for Magnetism {
    const QUANTITY: Quantity = Quantity::Magnetism;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        if !present(container, Self::QUANTITY, Self::ROOT)? {
            return Ok(None);
        }
        Ok(Some(Self {
            structure: Structure::read(container)?,
            moments: container.get(Self::ROOT)?,
        }))
    }
}

/// The k-point mesh or path a calculation used.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpoints {
    pub mode: String,
    pub number: i64,
    pub coordinates: Dataset,
    pub weights: Dataset,
    pub labels: Option<Dataset>,
    pub label_indices: Option<Dataset>,
    pub cell: Cell,
}

impl Record for Kpoints {
    const QUANTITY: Quantity = Quantity::Kpoints;
    const VARIANTS: &'static [&'static str] = BOTH;

    fn assemble(container: &Container, variant: &str) -> Result<Option<Self>, Error> {
        let results = format!("results/electron_eigenvalues{}", suffix(variant)?);
        let coordinates = format!("{results}/kpoint_coords");
        if !present(container, Self::QUANTITY, &coordinates)? {
            return Ok(None);
        }
        let input = kpoints_input(variant)?;
        Ok(Some(Self {
            mode: container.read_scalar(&format!("{input}/mode"))?.to_string(),
            number: container.read_i64(&format!("{input}/number_kpoints"))?,
            coordinates: container.get(&coordinates)?,
            weights: container.get(&format!("{results}/kpoints_symmetry_weight"))?,
            labels: container.safe_get(&format!("{input}/labels_kpoints"))?,
            label_indices: container.safe_get(&format!("{input}/positions_labels_kpoints"))?,
            cell: Cell::read(container)?,
        }))
    }
}

/// Orbital projectors of a projected calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectors {
    pub topology: Topology,
    pub orbital_types: Dataset,
    pub number_spins: i64,
}

impl Projectors {
    /// Named map from orbital label (`s`, `px`, ...) to its index.
    pub fn orbital_map(&self) -> Result<AtomMap, Error> {
        let labels = self.orbital_types.read_strings()?;
        Ok(AtomMap::from_names(labels.iter().map(|s| s.trim())))
    }
}

impl Record for Projectors {
    const QUANTITY: Quantity = Quantity::Projectors;
    const VARIANTS: &'static [&'static str] = BOTH;

    fn assemble(container: &Container, variant: &str) -> Result<Option<Self>, Error> {
        let s = suffix(variant)?;
        let root = format!("results/projectors{s}");
        if !present(container, Self::QUANTITY, &root)? {
            return Ok(None);
        }
        Ok(Some(Self {
            topology: Topology::read(container)?,
            orbital_types: container.get(&format!("{root}/lchar"))?,
            number_spins: container.read_i64(&format!("results/electron_eigenvalues{s}/ispin"))?,
        }))
    }
}

/// Band projections are only meaningful together with their projectors.
fn band_projections(
    container: &Container,
    variant: &str,
) -> Result<(Option<Projectors>, Option<Dataset>), Error> {
    let projectors = Projectors::assemble(container, variant)?;
    let projections = match projectors {
        Some(_) => container.safe_get(&format!("results/projectors{}/par", suffix(variant)?))?,
        None => None,
    };
    Ok((projectors, projections))
}

/// Band structure along the k-point path or mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub fermi_energy: f64,
    pub kpoints: Kpoints,
    pub eigenvalues: Dataset,
    pub occupations: Dataset,
    pub projectors: Option<Projectors>,
    pub projections: Option<Dataset>,
}

impl Record for Band {
    const QUANTITY: Quantity = Quantity::Band;
    const VARIANTS: &'static [&'static str] = BOTH;

    fn assemble(container: &Container, variant: &str) -> Result<Option<Self>, Error> {
        let s = suffix(variant)?;
        let results = format!("results/electron_eigenvalues{s}");
        let eigenvalues = format!("{results}/eigenvalues");
        if !present(container, Self::QUANTITY, &eigenvalues)? {
            return Ok(None);
        }
        let kpoints = Kpoints::assemble(container, variant)?
            .ok_or_else(|| StoreError::NotFound(format!("{results}/kpoint_coords")))?;
        let (projectors, projections) = band_projections(container, variant)?;
        Ok(Some(Self {
            fermi_energy: container.read_f64(&format!("results/electron_dos{s}/efermi"))?,
            kpoints,
            eigenvalues: container.get(&eigenvalues)?,
            occupations: container.get(&format!("{results}/fermiweights"))?,
            projectors,
            projections,
        }))
    }
}

/// Density of states, total and projected.
#[derive(Debug, Clone, PartialEq)]
pub struct Dos {
    pub fermi_energy: f64,
    pub energies: Dataset,
    pub dos: Dataset,
    pub projectors: Option<Projectors>,
    pub projections: Option<Dataset>,
}

impl Record for Dos {
    const QUANTITY: Quantity = Quantity::Dos;
    const VARIANTS: &'static [&'static str] = BOTH;

    fn assemble(container: &Container, variant: &str) -> Result<Option<Self>, Error> {
        let root = format!("results/electron_dos{}", suffix(variant)?);
        let energies = format!("{root}/energies");
        if !present(container, Self::QUANTITY, &energies)? {
            return Ok(None);
        }
        let projectors = Projectors::assemble(container, variant)?;
        let projections = match projectors {
            Some(_) => container.safe_get(&format!("{root}/dospar"))?,
            None => None,
        };
        Ok(Some(Self {
            fermi_energy: container.read_f64(&format!("{root}/efermi"))?,
            energies: container.get(&energies)?,
            dos: container.get(&format!("{root}/dos"))?,
            projectors,
            projections,
        }))
    }
}

// ---------------------------------------------------------------------------
// Ionic dynamics
// ---------------------------------------------------------------------------

/// Energies per ionic step, `values[step, label]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Energy {
    pub labels: Dataset,
    pub values: Dataset,
}

impl Record for Energy {
    const QUANTITY: Quantity = Quantity::Energy;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        const ROOT: &str = "intermediate/ion_dynamics/energies";
        if !present(container, Self::QUANTITY, ROOT)? {
            return Ok(None);
        }
        Ok(Some(Self {
            labels: container.get("intermediate/ion_dynamics/energies_tags")?,
            values: container.get(ROOT)?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub topology: Topology,
    pub positions: Dataset,
    pub lattice_vectors: Dataset,
}

impl Record for Trajectory {
    const QUANTITY: Quantity = Quantity::Trajectory;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        const ROOT: &str = "intermediate/ion_dynamics/position_ions";
        if !present(container, Self::QUANTITY, ROOT)? {
            return Ok(None);
        }
        Ok(Some(Self {
            topology: Topology::read(container)?,
            positions: container.get(ROOT)?,
            lattice_vectors: container.get("intermediate/ion_dynamics/lattice_vectors")?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Force {
    pub structure: Structure,
    pub forces: Dataset,
}

impl Record for Force {
    const QUANTITY: Quantity = Quantity::Force;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        const ROOT: &str = "intermediate/ion_dynamics/forces";
        if !present(container, Self::QUANTITY, ROOT)? {
            return Ok(None);
        }
        Ok(Some(Self {
            structure: Structure::read(container)?,
            forces: container.get(ROOT)?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stress {
    pub structure: Structure,
    pub stress: Dataset,
}

impl Record for Stress {
    const QUANTITY: Quantity = Quantity::Stress;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        const ROOT: &str = "intermediate/ion_dynamics/stress";
        if !present(container, Self::QUANTITY, ROOT)? {
            return Ok(None);
        }
        Ok(Some(Self {
            structure: Structure::read(container)?,
            stress: container.get(ROOT)?,
        }))
    }
}

// ---------------------------------------------------------------------------
// Densities
// ---------------------------------------------------------------------------

/// Charge density on the real-space grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    pub structure: Structure,
    pub charge: Dataset,
}

impl Record for Density {
    const QUANTITY: Quantity = Quantity::Density;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        const ROOT: &str = "charge/charge";
        if !present(container, Self::QUANTITY, ROOT)? {
            return Ok(None);
        }
        Ok(Some(Self {
            structure: Structure::read(container)?,
            charge: container.get(ROOT)?,
        }))
    }
}

/// Densities of the excitons of a BSE calculation, indexed
/// `[exciton, z, y, x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcitonDensity {
    pub structure: Structure,
    pub charge: Dataset,
}

impl Record for ExcitonDensity {
    const QUANTITY: Quantity = Quantity::ExcitonDensity;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        const ROOT: &str = "results/excitons/density";
        if !present(container, Self::QUANTITY, ROOT)? {
            return Ok(None);
        }
        Ok(Some(Self {
            structure: Structure::read(container)?,
            charge: container.get(ROOT)?,
        }))
    }
}

// ---------------------------------------------------------------------------
// Linear response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DielectricFunction {
    pub energies: Dataset,
    pub density_density: Dataset,
    pub current_current: Option<Dataset>,
}

impl Record for DielectricFunction {
    const QUANTITY: Quantity = Quantity::DielectricFunction;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        const ROOT: &str = "results/linear_response/density_density_dielectric_function";
        if !present(container, Self::QUANTITY, ROOT)? {
            return Ok(None);
        }
        Ok(Some(Self {
            energies: container.get("results/linear_response/energies")?,
            density_density: container.get(ROOT)?,
            current_current: container
                .safe_get("results/linear_response/current_current_dielectric_function")?,
        }))
    }
}

/// Static dielectric tensor and the method that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DielectricTensor {
    pub method: String,
    pub electron: Dataset,
    pub ion: Option<Dataset>,
    pub independent_particle: Option<Dataset>,
}

impl Record for DielectricTensor {
    const QUANTITY: Quantity = Quantity::DielectricTensor;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        const ROOT: &str = "results/linear_response/electron_dielectric_tensor";
        if !present(container, Self::QUANTITY, ROOT)? {
            return Ok(None);
        }
        Ok(Some(Self {
            method: container
                .read_scalar("results/linear_response/method")?
                .to_string(),
            electron: container.get(ROOT)?,
            ion: container.safe_get("results/linear_response/ion_dielectric_tensor")?,
            independent_particle: container
                .safe_get("results/linear_response/independent_particle_dielectric_tensor")?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForceConstant {
    pub structure: Structure,
    pub force_constants: Dataset,
}

impl Record for ForceConstant {
    const QUANTITY: Quantity = Quantity::ForceConstant;

    fn assemble(container: &Container, _variant: &str) -> Result<Option<Self>, Error> {
        const ROOT: &str = "results/linear_response/force_constants";
        if !present(container, Self::QUANTITY, ROOT)? {
            return Ok(None);
        }
        Ok(Some(Self {
            structure: Structure::read(container)?,
            force_constants: container.get(ROOT)?,
        }))
    }
}
