//! Step selection along the leading axis of per-step data.
//!
//! Quantities recorded during an ionic relaxation store one entry per step
//! on axis 0. [`StepReader`] picks steps out of such a dataset the way a
//! sequence index would: negative indices count from the end, ranges are
//! half open, and anything out of range is an error rather than clamped.

use std::fmt;
use std::ops::{Range, RangeFull};
use std::str::FromStr;

use ndarray::{ArrayD, Axis};

use crate::dataset::Dataset;
use crate::error::Error;

/// Which steps to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steps {
    /// Every step.
    #[default]
    All,
    /// A single step; the step axis is dropped from the result.
    Index(isize),
    /// Steps `start..end`; a missing bound extends to that end.
    Range {
        start: Option<isize>,
        end: Option<isize>,
    },
}

impl From<isize> for Steps {
    fn from(index: isize) -> Self {
        Steps::Index(index)
    }
}

impl From<i32> for Steps {
    fn from(index: i32) -> Self {
        Steps::Index(index as isize)
    }
}

impl From<Range<isize>> for Steps {
    fn from(range: Range<isize>) -> Self {
        Steps::Range {
            start: Some(range.start),
            end: Some(range.end),
        }
    }
}

impl From<Range<i32>> for Steps {
    fn from(range: Range<i32>) -> Self {
        Steps::Range {
            start: Some(range.start as isize),
            end: Some(range.end as isize),
        }
    }
}

impl From<RangeFull> for Steps {
    fn from(_: RangeFull) -> Self {
        Steps::All
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: &Option<isize>| b.map(|v| v.to_string()).unwrap_or_default();
        match self {
            Steps::All => f.write_str(":"),
            Steps::Index(index) => write!(f, "{index}"),
            Steps::Range { start, end } => write!(f, "{}:{}", bound(start), bound(end)),
        }
    }
}

impl FromStr for Steps {
    type Err = Error;

    /// Parse `"3"`, `"-1"`, `"1:4"`, `":2"` or `":"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        let invalid = |message: String| Error::Read {
            key: s.to_string(),
            context: "steps".to_string(),
            message,
        };
        let parse = |text: &str| -> Result<Option<isize>, Error> {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<isize>()
                .map(Some)
                .map_err(|e| invalid(format!("`{text}`: {e}")))
        };
        if key.is_empty() {
            return Ok(Steps::All);
        }
        let parts: Vec<&str> = key.split(':').collect();
        match parts.as_slice() {
            [index] => parse(*index)?
                .map(Steps::Index)
                .ok_or_else(|| invalid("empty step index".to_string())),
            [start, end] => match (parse(*start)?, parse(*end)?) {
                (None, None) => Ok(Steps::All),
                (start, end) => Ok(Steps::Range { start, end }),
            },
            _ => Err(invalid(format!(
                "expected `index` or `start:end`, found {} components",
                parts.len()
            ))),
        }
    }
}

/// Reads selected steps from a dataset whose axis 0 is the step axis.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReader {
    dataset: Dataset,
    context: String,
}

impl StepReader {
    /// `context` names the quantity in error messages ("magnetic moments").
    pub fn new(dataset: Dataset, context: impl Into<String>) -> Self {
        Self {
            dataset,
            context: context.into(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Number of steps.
    pub fn len(&self) -> Result<usize, Error> {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len()? == 0)
    }

    /// Materialize the selected steps.
    ///
    /// Only the requested rows are read from the store.
    pub fn read(&self, steps: impl Into<Steps>) -> Result<ArrayD<f64>, Error> {
        let steps = steps.into();
        let Some(&count) = self.dataset.shape()?.first() else {
            return Err(self.error(steps, "dataset has no step axis".to_string()));
        };
        match steps {
            Steps::All => self.dataset.read_f64(),
            Steps::Index(index) => {
                let at = self.index(steps, index, count)?;
                let row = self.dataset.read_rows_f64(at..at + 1)?;
                Ok(row.index_axis_move(Axis(0), 0))
            }
            Steps::Range { start, end } => {
                let first = match start {
                    Some(bound) => self.bound(steps, bound, count)?,
                    None => 0,
                };
                let last = match end {
                    Some(bound) => self.bound(steps, bound, count)?,
                    None => count,
                };
                if first > last {
                    return Err(self.error(
                        steps,
                        format!("slice start {first} is greater than its end {last}"),
                    ));
                }
                self.dataset.read_rows_f64(first..last)
            }
        }
    }

    /// Parse `key` (see [`Steps::from_str`]) and read those steps.
    pub fn read_key(&self, key: &str) -> Result<ArrayD<f64>, Error> {
        let steps = key.parse::<Steps>().map_err(|err| match err {
            Error::Read { key, message, .. } => Error::Read {
                key,
                context: self.context.clone(),
                message,
            },
            other => other,
        })?;
        self.read(steps)
    }

    fn index(&self, steps: Steps, index: isize, count: usize) -> Result<usize, Error> {
        let resolved = if index < 0 {
            count as isize + index
        } else {
            index
        };
        if resolved < 0 || resolved >= count as isize {
            return Err(self.error(
                steps,
                format!("index {index} is out of bounds for axis 0 with size {count}"),
            ));
        }
        Ok(resolved as usize)
    }

    fn bound(&self, steps: Steps, bound: isize, count: usize) -> Result<usize, Error> {
        let resolved = if bound < 0 {
            count as isize + bound
        } else {
            bound
        };
        if resolved < 0 || resolved > count as isize {
            return Err(self.error(
                steps,
                format!("slice bound {bound} is out of bounds for axis 0 with size {count}"),
            ));
        }
        Ok(resolved as usize)
    }

    fn error(&self, steps: Steps, message: String) -> Error {
        Error::Read {
            key: steps.to_string(),
            context: self.context.clone(),
            message,
        }
    }
}
