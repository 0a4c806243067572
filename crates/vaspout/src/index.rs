//! Resolving selections against one axis of an array.

use ndarray::{ArrayD, Axis};

use crate::error::Error;
use crate::select::{Atom, Selection, Tree};

/// Ordered mapping from atom text to a zero-based index along one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomMap {
    entries: Vec<(String, usize)>,
    numbered: bool,
}

impl AtomMap {
    /// `"1"` to `"count"`, mapping to indices `0..count`.
    pub fn numbered(count: usize) -> Self {
        Self {
            entries: (0..count).map(|i| ((i + 1).to_string(), i)).collect(),
            numbered: true,
        }
    }

    /// Names in axis order; the first occurrence of a repeated name wins.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_pairs(names.into_iter().enumerate().map(|(i, name)| (name, i)))
    }

    /// Explicit `(name, index)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(name, index)| (name.into(), index))
                .collect(),
            numbered: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|&(_, index)| index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Indices an atom stands for; ranges expand inclusively.
    pub fn resolve(&self, atom: &Atom) -> Result<Vec<usize>, Error> {
        match atom {
            Atom::Single(name) => Ok(vec![self.lookup(name)?]),
            Atom::Range(start, end) => {
                let (first, last) = (self.lookup(start)?, self.lookup(end)?);
                if first > last {
                    return Err(Error::Selection {
                        atom: atom.to_string(),
                        reason: format!("range start `{start}` comes after its end `{end}`"),
                    });
                }
                Ok((first..=last).collect())
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<usize, Error> {
        self.get(name).ok_or_else(|| Error::Selection {
            atom: name.to_string(),
            reason: self.valid(),
        })
    }

    fn valid(&self) -> String {
        if self.numbered {
            format!("valid range is [1,{}]", self.len())
        } else {
            format!(
                "valid choices are {}",
                self.names().collect::<Vec<_>>().join(", ")
            )
        }
    }
}

/// Sums slices of `data` along `axis` according to parsed selections.
///
/// ```
/// use ndarray::{arr1, arr2};
/// use vaspout::index::{AtomMap, Selector};
/// use vaspout::select::Tree;
///
/// let data = arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).into_dyn();
/// let selector = Selector::new(0, AtomMap::numbered(3), data).unwrap();
/// let tree = Tree::parse("1+3").unwrap();
/// let summed = selector.select(&tree.selections()[0]).unwrap();
/// assert_eq!(summed, arr1(&[6.0, 8.0]).into_dyn());
/// ```
#[derive(Debug, Clone)]
pub struct Selector {
    axis: usize,
    map: AtomMap,
    data: ArrayD<f64>,
}

impl Selector {
    pub fn new(axis: usize, map: AtomMap, data: ArrayD<f64>) -> Result<Self, Error> {
        if axis >= data.ndim() {
            return Err(Error::Selection {
                atom: axis.to_string(),
                reason: format!("axis out of bounds for an array with {} axes", data.ndim()),
            });
        }
        Ok(Self { axis, map, data })
    }

    pub fn map(&self) -> &AtomMap {
        &self.map
    }

    /// Extent of the selected axis.
    pub fn axis_len(&self) -> usize {
        self.data.len_of(Axis(self.axis))
    }

    /// Element-wise sum of every slice the selection names.
    pub fn select(&self, selection: &Selection) -> Result<ArrayD<f64>, Error> {
        let extent = self.axis_len();
        let mut total: Option<ArrayD<f64>> = None;
        for atom in selection.atoms() {
            for index in self.map.resolve(atom)? {
                if index >= extent {
                    return Err(Error::Selection {
                        atom: atom.to_string(),
                        reason: format!("valid range is [1,{extent}]"),
                    });
                }
                let slice = self.data.index_axis(Axis(self.axis), index);
                match total.as_mut() {
                    Some(sum) => *sum += &slice,
                    None => total = Some(slice.to_owned()),
                }
            }
        }
        total.ok_or_else(|| Error::Selection {
            atom: selection.to_string(),
            reason: "selection is empty".to_string(),
        })
    }

    /// Every selection of `tree` as `(label, sum)`, in order.
    pub fn select_tree(&self, tree: &Tree) -> Result<Vec<(String, ArrayD<f64>)>, Error> {
        tree.selections()
            .iter()
            .map(|selection| Ok((self.label(selection), self.select(selection)?)))
            .collect()
    }

    /// Atom texts joined by `+`.
    pub fn label(&self, selection: &Selection) -> String {
        selection.to_string()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2, Array3};

    use super::*;

    fn first(expression: &str) -> Selection {
        Tree::parse(expression).unwrap().selections()[0].clone()
    }

    #[test]
    fn numbered_map() {
        let map = AtomMap::numbered(3);
        assert_eq!(map.get("1"), Some(0));
        assert_eq!(map.get("3"), Some(2));
        assert_eq!(map.get("0"), None);
        assert_eq!(map.names().collect::<Vec<_>>(), ["1", "2", "3"]);
    }

    #[test]
    fn named_map_first_occurrence_wins() {
        let map = AtomMap::from_names(["s", "p", "s"]);
        assert_eq!(map.get("s"), Some(0));
        assert_eq!(map.get("p"), Some(1));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn ranges_expand_inclusively() {
        let map = AtomMap::numbered(5);
        let atom = Atom::Range("2".into(), "4".into());
        assert_eq!(map.resolve(&atom).unwrap(), vec![1, 2, 3]);
        let backwards = Atom::Range("4".into(), "2".into());
        assert!(matches!(map.resolve(&backwards), Err(Error::Selection { .. })));
    }

    #[test]
    fn unknown_numbered_atom_reports_range() {
        let map = AtomMap::numbered(3);
        match map.resolve(&Atom::Single("5".into())) {
            Err(Error::Selection { atom, reason }) => {
                assert_eq!(atom, "5");
                assert!(reason.contains("[1,3]"));
            }
            other => panic!("expected selection error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_named_atom_lists_names() {
        let map = AtomMap::from_pairs([("Sr", 0), ("Ti", 1)]);
        let err = map.resolve(&Atom::Single("O".into())).unwrap_err();
        assert!(err.to_string().contains("Sr, Ti"));
    }

    #[test]
    fn sums_along_axis() {
        let data = Array3::from_shape_fn((2, 3, 2), |(i, j, k)| (i * 100 + j * 10 + k) as f64).into_dyn();
        let selector = Selector::new(1, AtomMap::numbered(3), data).unwrap();
        let sum = selector.select(&first("1+3")).unwrap();
        assert_eq!(sum, arr2(&[[20.0, 22.0], [220.0, 222.0]]).into_dyn());
        assert_eq!(selector.label(&first("1 + 3")), "1+3");
    }

    #[test]
    fn index_beyond_axis_is_rejected() {
        let data = arr1(&[1.0, 2.0]).into_dyn();
        let selector = Selector::new(0, AtomMap::numbered(3), data).unwrap();
        match selector.select(&first("3")) {
            Err(Error::Selection { atom, reason }) => {
                assert_eq!(atom, "3");
                assert!(reason.contains("[1,2]"));
            }
            other => panic!("expected selection error, got {other:?}"),
        }
    }

    #[test]
    fn axis_must_exist() {
        let data = arr1(&[1.0]).into_dyn();
        assert!(Selector::new(1, AtomMap::numbered(1), data).is_err());
    }

    #[test]
    fn tree_keeps_order() {
        let data = arr1(&[1.0, 2.0, 4.0]).into_dyn();
        let selector = Selector::new(0, AtomMap::numbered(3), data).unwrap();
        let tree = Tree::parse("3, 1:2").unwrap();
        let result = selector.select_tree(&tree).unwrap();
        assert_eq!(result[0].0, "3");
        assert_eq!(result[0].1.sum(), 4.0);
        assert_eq!(result[1].0, "1:2");
        assert_eq!(result[1].1.sum(), 3.0);
    }
}
