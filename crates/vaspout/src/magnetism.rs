//! Charges and magnetic moments per ionic step.
//!
//! The raw moments are indexed `[step, component, atom, orbital]`. Component
//! 0 is the charge; a collinear run adds one moment component, a
//! noncollinear run three. Results keep the step axis unless a single step
//! is requested, and noncollinear moments carry their direction last.

use ndarray::{ArrayD, Axis, Slice};

use crate::error::Error;
use crate::records::Magnetism;
use crate::steps::{StepReader, Steps};

/// Charges and moments of the selected steps.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnetismData {
    pub charges: ArrayD<f64>,
    pub moments: Option<ArrayD<f64>>,
}

impl Magnetism {
    /// Stepwise reader over the raw moments.
    pub fn steps(&self) -> StepReader {
        StepReader::new(self.moments.clone(), "magnetic moments")
    }

    /// Number of ionic steps recorded.
    pub fn len(&self) -> Result<usize, Error> {
        self.steps().len()
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        self.steps().is_empty()
    }

    /// Charges projected on atoms and orbitals.
    pub fn charges(&self, steps: impl Into<Steps>) -> Result<ArrayD<f64>, Error> {
        let (data, axis) = self.read_components(steps.into())?;
        Ok(data.index_axis_move(Axis(axis), 0))
    }

    /// Moments projected on atoms and orbitals; `None` without spin
    /// polarization.
    pub fn moments(&self, steps: impl Into<Steps>) -> Result<Option<ArrayD<f64>>, Error> {
        let (data, axis) = self.read_components(steps.into())?;
        Ok(split_moments(data, axis))
    }

    /// Charges summed over orbitals.
    pub fn total_charges(&self, steps: impl Into<Steps>) -> Result<ArrayD<f64>, Error> {
        Ok(sum_over_orbitals(self.charges(steps)?))
    }

    /// Moments summed over orbitals; noncollinear moments keep their
    /// direction as the last axis.
    pub fn total_moments(&self, steps: impl Into<Steps>) -> Result<Option<ArrayD<f64>>, Error> {
        let (data, axis) = self.read_components(steps.into())?;
        let noncollinear = data.len_of(Axis(axis)) > 2;
        Ok(split_moments(data, axis).map(|moments| {
            if noncollinear {
                let orbital_axis = moments.ndim() - 2;
                moments.sum_axis(Axis(orbital_axis))
            } else {
                sum_over_orbitals(moments)
            }
        }))
    }

    /// Charges and moments in one read.
    pub fn read(&self, steps: impl Into<Steps>) -> Result<MagnetismData, Error> {
        let (data, axis) = self.read_components(steps.into())?;
        let charges = data.index_axis(Axis(axis), 0).to_owned();
        Ok(MagnetismData {
            charges,
            moments: split_moments(data, axis),
        })
    }

    /// Selected steps plus the position of the component axis in them.
    fn read_components(&self, steps: Steps) -> Result<(ArrayD<f64>, usize), Error> {
        let reader = self.steps();
        let data = reader.read(steps)?;
        let (expected, axis) = match steps {
            Steps::Index(_) => (3, 0),
            _ => (4, 1),
        };
        if data.ndim() != expected {
            return Err(Error::Read {
                key: steps.to_string(),
                context: "magnetic moments".to_string(),
                message: format!(
                    "expected axes (step, component, atom, orbital), found {} axes",
                    data.ndim() + 4 - expected
                ),
            });
        }
        if data.len_of(Axis(axis)) == 0 {
            return Err(Error::Read {
                key: steps.to_string(),
                context: "magnetic moments".to_string(),
                message: "no charge component".to_string(),
            });
        }
        Ok((data, axis))
    }
}

fn split_moments(data: ArrayD<f64>, axis: usize) -> Option<ArrayD<f64>> {
    match data.len_of(Axis(axis)) {
        0 | 1 => None,
        2 => Some(data.index_axis_move(Axis(axis), 1)),
        _ => {
            let moments = data.slice_axis(Axis(axis), Slice::from(1..)).to_owned();
            Some(move_axis_last(moments, axis))
        }
    }
}

fn move_axis_last(data: ArrayD<f64>, axis: usize) -> ArrayD<f64> {
    let mut order: Vec<usize> = (0..data.ndim()).filter(|&i| i != axis).collect();
    order.push(axis);
    data.permuted_axes(order)
}

fn sum_over_orbitals(data: ArrayD<f64>) -> ArrayD<f64> {
    let last = data.ndim() - 1;
    data.sum_axis(Axis(last))
}
