//! VASP versions and the capability gate table.
//!
//! Every quantity that only newer VASP releases write is listed in
//! [`GATES`] together with the first version that provides it. Anything not
//! listed is available in every file.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::variants::{DEFAULT, KPOINTS_OPT};

/// A VASP release, compared lexicographically by (major, minor, patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = Error;

    /// Parse `"6.4.0"`; a missing patch component counts as zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| Error::Read {
            key: s.to_string(),
            context: "version".to_string(),
            message,
        };
        let parts = s
            .trim()
            .split('.')
            .map(|part| part.parse::<u32>().map_err(|e| invalid(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [major, minor] => Ok(Version::new(*major, *minor, 0)),
            [major, minor, patch] => Ok(Version::new(*major, *minor, *patch)),
            _ => Err(invalid(format!(
                "expected major.minor[.patch], found {} components",
                parts.len()
            ))),
        }
    }
}

/// Every quantity that can be read from a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Version,
    Topology,
    Cell,
    Structure,
    Magnetism,
    Kpoints,
    Projectors,
    Band,
    Dos,
    Energy,
    Trajectory,
    Density,
    Force,
    Stress,
    DielectricFunction,
    DielectricTensor,
    ForceConstant,
    ExcitonDensity,
}

impl Quantity {
    /// Human readable name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Version => "version",
            Quantity::Topology => "topology",
            Quantity::Cell => "cell",
            Quantity::Structure => "structure",
            Quantity::Magnetism => "magnetism",
            Quantity::Kpoints => "k-points",
            Quantity::Projectors => "projectors",
            Quantity::Band => "band structure",
            Quantity::Dos => "density of states",
            Quantity::Energy => "energy",
            Quantity::Trajectory => "trajectory",
            Quantity::Density => "charge density",
            Quantity::Force => "forces",
            Quantity::Stress => "stress",
            Quantity::DielectricFunction => "dielectric function",
            Quantity::DielectricTensor => "dielectric tensor",
            Quantity::ForceConstant => "force constants",
            Quantity::ExcitonDensity => "exciton density",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimum version required for one variant of a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    pub quantity: Quantity,
    pub variant: &'static str,
    pub minimum: Version,
}

impl Gate {
    const fn new(quantity: Quantity, variant: &'static str, minimum: Version) -> Self {
        Self {
            quantity,
            variant,
            minimum,
        }
    }
}

const V6_3: Version = Version::new(6, 3, 0);
const V6_4: Version = Version::new(6, 4, 0);

/// Declarative capability table.
pub const GATES: &[Gate] = &[
    Gate::new(Quantity::Kpoints, KPOINTS_OPT, V6_3),
    Gate::new(Quantity::Projectors, KPOINTS_OPT, V6_3),
    Gate::new(Quantity::Band, KPOINTS_OPT, V6_3),
    Gate::new(Quantity::Dos, KPOINTS_OPT, V6_3),
    Gate::new(Quantity::DielectricFunction, DEFAULT, V6_3),
    Gate::new(Quantity::DielectricTensor, DEFAULT, V6_3),
    Gate::new(Quantity::ForceConstant, DEFAULT, V6_3),
    Gate::new(Quantity::ExcitonDensity, DEFAULT, V6_4),
];

/// Minimum version for `(quantity, variant)`, or `None` if it is ungated.
pub fn minimum_version(quantity: Quantity, variant: &str) -> Option<Version> {
    GATES
        .iter()
        .find(|gate| gate.quantity == quantity && gate.variant == variant)
        .map(|gate| gate.minimum)
}

/// Check that a file written by `actual` provides `(quantity, variant)`.
pub fn check(quantity: Quantity, variant: &str, actual: Version) -> Result<(), Error> {
    match minimum_version(quantity, variant) {
        Some(required) if actual < required => Err(Error::Capability {
            quantity,
            variant: variant.to_string(),
            required,
            actual,
        }),
        _ => Ok(()),
    }
}
