//! Keyed results for quantities with more than one source.

use crate::error::Error;
use crate::version::Version;

/// Key of the variant every quantity has.
pub const DEFAULT: &str = "default";

/// Key of quantities computed on the optional k-point mesh.
pub const KPOINTS_OPT: &str = "kpoints_opt";

/// Variant results of one quantity, in declaration order.
///
/// A `None` entry means the file lacks that variant: either the data is
/// absent or the VASP version predates it. The `default` key is always
/// present.
#[derive(Debug, Clone, PartialEq)]
pub struct Variants<T> {
    version: Version,
    entries: Vec<(String, Option<T>)>,
}

impl<T> Variants<T> {
    /// Collect entries; a repeated key replaces the earlier value in place.
    pub fn new<I, K>(version: Version, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<T>)>,
        K: Into<String>,
    {
        let mut collected: Vec<(String, Option<T>)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            match collected.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => collected.push((key, value)),
            }
        }
        if !collected.iter().any(|(k, _)| k == DEFAULT) {
            collected.insert(0, (DEFAULT.to_string(), None));
        }
        Self {
            version,
            entries: collected,
        }
    }

    /// A result with only the default variant.
    pub fn single(version: Version, value: Option<T>) -> Self {
        Self::new(version, [(DEFAULT, value)])
    }

    /// Version of the file the result was read from.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Value under `key`. Unknown keys are an error, absent values are not.
    pub fn get(&self, key: &str) -> Result<Option<&T>, Error> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_ref())
            .ok_or_else(|| Error::Key {
                key: key.to_string(),
                available: self.keys().map(str::to_string).collect(),
            })
    }

    /// Value of the default variant.
    pub fn default(&self) -> Option<&T> {
        self.entries
            .iter()
            .find(|(k, _)| k == DEFAULT)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Consume the result, keeping only the default variant.
    pub fn into_default(self) -> Option<T> {
        self.entries
            .into_iter()
            .find(|(k, _)| k == DEFAULT)
            .and_then(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&T>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Number of keys, including absent variants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: the default key is never missing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
