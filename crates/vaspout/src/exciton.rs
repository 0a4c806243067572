//! Selecting and summing exciton densities.

use ndarray::ArrayD;

use crate::error::Error;
use crate::index::{AtomMap, Selector};
use crate::records::ExcitonDensity;
use crate::select::Tree;

/// One selection of excitons, summed on the real-space grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedDensity {
    /// Selected excitons joined by `+`, e.g. `"1+3"`.
    pub label: String,
    /// Density indexed `[x, y, z]`.
    pub density: ArrayD<f64>,
}

impl ExcitonDensity {
    /// Selection used for a blank expression: the lowest exciton.
    pub const DEFAULT_SELECTION: &'static str = "1";

    /// Number of excitons stored.
    pub fn number_excitons(&self) -> Result<usize, Error> {
        self.charge.len()
    }

    /// All densities indexed `[exciton, x, y, z]`.
    pub fn to_array(&self) -> Result<ArrayD<f64>, Error> {
        let charge = self.charge.read_f64()?;
        let mut order = vec![0];
        order.extend((1..charge.ndim()).rev());
        Ok(charge.permuted_axes(order))
    }

    /// Sum the densities named by `expression`; excitons are numbered
    /// from 1 and a blank expression picks the first one.
    pub fn select(&self, expression: &str) -> Result<Vec<SelectedDensity>, Error> {
        let tree = Tree::parse_or(expression, Self::DEFAULT_SELECTION)?;
        let charge = self.charge.read_f64()?;
        let count = charge.shape().first().copied().unwrap_or(0);
        let selector = Selector::new(0, AtomMap::numbered(count), charge)?;
        selector
            .select_tree(&tree)
            .map(|selected| {
                selected
                    .into_iter()
                    .map(|(label, density)| SelectedDensity {
                        label,
                        density: density.reversed_axes(),
                    })
                    .collect()
            })
    }
}
