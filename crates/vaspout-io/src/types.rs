//! Value types shared by every backend.

use std::fmt;
use std::ops::Range;

use ndarray::{ArrayD, Axis, Slice};

/// Semantic element type of a dataset.
///
/// Backends fold the many on-disk integer and float widths into these three
/// kinds; records only care whether a field is numeric or textual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Float,
    Int,
    String,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::Float => write!(f, "float"),
            DType::Int => write!(f, "int"),
            DType::String => write!(f, "string"),
        }
    }
}

/// A fully materialized n-dimensional dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Float(ArrayD<f64>),
    Int(ArrayD<i64>),
    String(ArrayD<String>),
}

impl ArrayData {
    /// Element type of the array.
    pub fn dtype(&self) -> DType {
        match self {
            ArrayData::Float(_) => DType::Float,
            ArrayData::Int(_) => DType::Int,
            ArrayData::String(_) => DType::String,
        }
    }

    /// Shape of the array.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            ArrayData::Float(a) => a.shape().to_vec(),
            ArrayData::Int(a) => a.shape().to_vec(),
            ArrayData::String(a) => a.shape().to_vec(),
        }
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Float(a) => a.len(),
            ArrayData::Int(a) => a.len(),
            ArrayData::String(a) => a.len(),
        }
    }

    /// Returns true if the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy rows `rows` of the leading axis.
    ///
    /// Panics if the array is zero-dimensional or `rows` is out of bounds;
    /// see [`check_rows`](crate::check_rows).
    pub fn slice_rows(&self, rows: Range<usize>) -> ArrayData {
        let slice = Slice::from(rows);
        match self {
            ArrayData::Float(a) => ArrayData::Float(a.slice_axis(Axis(0), slice).to_owned()),
            ArrayData::Int(a) => ArrayData::Int(a.slice_axis(Axis(0), slice).to_owned()),
            ArrayData::String(a) => ArrayData::String(a.slice_axis(Axis(0), slice).to_owned()),
        }
    }

    /// Extract the single element of a scalar (or one-element) array.
    pub fn into_scalar(self) -> Option<Scalar> {
        if self.len() != 1 {
            return None;
        }
        match self {
            ArrayData::Float(a) => a.iter().next().cloned().map(Scalar::Float),
            ArrayData::Int(a) => a.iter().next().cloned().map(Scalar::Int),
            ArrayData::String(a) => a.iter().next().cloned().map(Scalar::String),
        }
    }

    /// Convert to `f64`, widening integers. Strings yield `None`.
    pub fn into_f64(self) -> Option<ArrayD<f64>> {
        match self {
            ArrayData::Float(a) => Some(a),
            ArrayData::Int(a) => Some(a.mapv(|v| v as f64)),
            ArrayData::String(_) => None,
        }
    }

    /// Convert to `i64`. Only integer data converts.
    pub fn into_i64(self) -> Option<ArrayD<i64>> {
        match self {
            ArrayData::Int(a) => Some(a),
            _ => None,
        }
    }

    /// Convert to strings. Only string data converts.
    pub fn into_strings(self) -> Option<ArrayD<String>> {
        match self {
            ArrayData::String(a) => Some(a),
            _ => None,
        }
    }
}

impl From<ArrayD<f64>> for ArrayData {
    fn from(a: ArrayD<f64>) -> Self {
        ArrayData::Float(a)
    }
}

impl From<ArrayD<i64>> for ArrayData {
    fn from(a: ArrayD<i64>) -> Self {
        ArrayData::Int(a)
    }
}

impl From<ArrayD<String>> for ArrayData {
    fn from(a: ArrayD<String>) -> Self {
        ArrayData::String(a)
    }
}

/// A single value read eagerly from a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Float(f64),
    Int(i64),
    String(String),
}

impl Scalar {
    /// Element type of the value.
    pub fn dtype(&self) -> DType {
        match self {
            Scalar::Float(_) => DType::Float,
            Scalar::Int(_) => DType::Int,
            Scalar::String(_) => DType::String,
        }
    }

    /// Numeric value as `f64`, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            Scalar::Int(v) => Some(*v as f64),
            Scalar::String(_) => None,
        }
    }

    /// Integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// String value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::String(s) => write!(f, "{s}"),
        }
    }
}
