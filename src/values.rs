//! Named parameter values and labeled sample columns.

use std::collections::BTreeMap;
use std::collections::btree_map;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An ordered mapping from parameter name to value.
///
/// This is the argument to every density evaluation. Keys the distribution
/// does not declare are ignored.
///
/// # Examples
///
/// ```
/// use priors::ParamValues;
///
/// let values = ParamValues::from([("mass1", 25.0), ("mass2", 10.0)]);
/// assert_eq!(values.get("mass1"), Some(25.0));
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ParamValues(BTreeMap<String, f64>);

impl ParamValues {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets the value of `name`, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(name.into(), value)
    }

    /// Returns the value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Returns the value of `name` or [`Error::MissingParameter`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if `name` is absent.
    pub fn require(&self, name: &str) -> Result<f64> {
        self.get(name)
            .ok_or_else(|| Error::MissingParameter(name.to_owned()))
    }

    /// Whether `name` is present.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Copies every entry of `other` into `self`, overwriting duplicates.
    pub fn extend_from(&mut self, other: &ParamValues) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), *v);
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ParamValues {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for ParamValues {
    fn from(entries: [(K, f64); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for ParamValues {
    type Item = (String, f64);
    type IntoIter = btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Random draws labeled by parameter name.
///
/// Every column has the same length: the number of draws.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SamplesRepr"))]
pub struct Samples {
    columns: BTreeMap<String, Vec<f64>>,
    len: usize,
}

impl Samples {
    /// Creates an empty collection that will hold `len` draws per parameter.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            columns: BTreeMap::new(),
            len,
        }
    }

    /// Adds a column of draws for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleLengthMismatch`] if `values` does not hold
    /// exactly [`len`](Self::len) draws, or [`Error::DuplicateParameter`] if
    /// `name` already has a column.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if values.len() != self.len {
            return Err(Error::SampleLengthMismatch {
                param: name,
                expected: self.len,
                got: values.len(),
            });
        }
        if self.columns.contains_key(&name) {
            return Err(Error::DuplicateParameter(name));
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Moves every column of `other` into `self`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`insert`](Self::insert).
    pub fn merge(&mut self, other: Samples) -> Result<()> {
        for (name, values) in other.columns {
            self.insert(name, values)?;
        }
        Ok(())
    }

    /// Returns the draws of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Number of draws per parameter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no draws.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Parameter names, in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Returns draw `index` across all parameters.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<ParamValues> {
        if index >= self.len {
            return None;
        }
        self.columns
            .iter()
            .map(|(name, values)| values.get(index).map(|&v| (name.as_str(), v)))
            .collect()
    }

    /// Iterates over draws as [`ParamValues`].
    pub fn rows(&self) -> impl Iterator<Item = ParamValues> + '_ {
        (0..self.len).filter_map(|i| self.row(i))
    }
}

/// Unvalidated wire form of [`Samples`]; columns are replayed through
/// [`Samples::insert`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct SamplesRepr {
    columns: BTreeMap<String, Vec<f64>>,
    len: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<SamplesRepr> for Samples {
    type Error = Error;

    fn try_from(repr: SamplesRepr) -> Result<Self> {
        let mut samples = Samples::new(repr.len);
        for (name, values) in repr.columns {
            samples.insert(name, values)?;
        }
        Ok(samples)
    }
}
