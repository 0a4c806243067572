//! Record assembly and version-gated access.
//!
//! Each record type knows the variants it comes in and how to build itself
//! from a [`Container`]. The container gates every variant against the
//! version table before assembling it.

use tracing::trace;

use crate::container::Container;
use crate::error::Error;
use crate::records::{
    Band, Cell, Density, DielectricFunction, DielectricTensor, Dos, Energy, ExcitonDensity,
    Force, ForceConstant, Kpoints, Magnetism, Projectors, Stress, Structure, Topology,
    Trajectory,
};
use crate::variants::{Variants, DEFAULT};
use crate::version::{self, Quantity};

/// A quantity that can be assembled from a container.
pub trait Record: Sized {
    /// Quantity used for version gating and messages.
    const QUANTITY: Quantity;

    /// Variant keys in declaration order, `default` first.
    const VARIANTS: &'static [&'static str] = &[DEFAULT];

    /// Build the record for `variant`, or `None` if the file lacks it.
    ///
    /// Callers gate first; assembling never consults the version table.
    fn assemble(container: &Container, variant: &str) -> Result<Option<Self>, Error>;
}

impl Container {
    /// Assemble every variant of `R`.
    ///
    /// Variants the file's version predates are absent without touching
    /// the file; missing data is absent too. Only I/O and decode failures
    /// are errors.
    pub fn access<R: Record>(&self) -> Result<Variants<R>, Error> {
        let version = self.version()?;
        let mut entries = Vec::with_capacity(R::VARIANTS.len());
        for &variant in R::VARIANTS {
            let value = match version::check(R::QUANTITY, variant, version) {
                Ok(()) => R::assemble(self, variant)?,
                Err(_) => {
                    trace!(quantity = %R::QUANTITY, variant, %version, "variant gated");
                    None
                }
            };
            entries.push((variant, value));
        }
        Ok(Variants::new(version, entries))
    }

    /// Assemble the default variant of `R`, surfacing a failed gate.
    pub fn require<R: Record>(&self) -> Result<Option<R>, Error> {
        self.require_variant(DEFAULT)
    }

    /// Assemble one variant of `R`, surfacing a failed gate.
    pub fn require_variant<R: Record>(&self, variant: &str) -> Result<Option<R>, Error> {
        let version = self.version()?;
        if !R::VARIANTS.iter().any(|k| *k == variant) {
            return Err(Error::Key {
                key: variant.to_string(),
                available: R::VARIANTS.iter().map(|k| k.to_string()).collect(),
            });
        }
        version::check(R::QUANTITY, variant, version)?;
        R::assemble(self, variant)
    }

    pub fn topology(&self) -> Result<Topology, Error> {
        Topology::read(self)
    }

    pub fn cell(&self) -> Result<Cell, Error> {
        Cell::read(self)
    }

    pub fn structure(&self) -> Result<Structure, Error> {
        Structure::read(self)
    }

    pub fn magnetism(&self) -> Result<Option<Magnetism>, Error> {
        self.require()
    }

    pub fn energy(&self) -> Result<Option<Energy>, Error> {
        self.require()
    }

    pub fn trajectory(&self) -> Result<Option<Trajectory>, Error> {
        self.require()
    }

    pub fn density(&self) -> Result<Option<Density>, Error> {
        self.require()
    }

    pub fn force(&self) -> Result<Option<Force>, Error> {
        self.require()
    }

    pub fn stress(&self) -> Result<Option<Stress>, Error> {
        self.require()
    }

    pub fn kpoints(&self) -> Result<Variants<Kpoints>, Error> {
        self.access()
    }

    pub fn projectors(&self) -> Result<Variants<Projectors>, Error> {
        self.access()
    }

    pub fn band(&self) -> Result<Variants<Band>, Error> {
        self.access()
    }

    pub fn dos(&self) -> Result<Variants<Dos>, Error> {
        self.access()
    }

    /// Requires VASP 6.3 or newer.
    pub fn dielectric_function(&self) -> Result<Option<DielectricFunction>, Error> {
        self.require()
    }

    /// Requires VASP 6.3 or newer.
    pub fn dielectric_tensor(&self) -> Result<Option<DielectricTensor>, Error> {
        self.require()
    }

    /// Requires VASP 6.3 or newer.
    pub fn force_constant(&self) -> Result<Option<ForceConstant>, Error> {
        self.require()
    }

    /// Requires VASP 6.4 or newer.
    pub fn exciton_density(&self) -> Result<Option<ExcitonDensity>, Error> {
        self.require()
    }
}
