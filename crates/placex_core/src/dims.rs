use crate::error::{Error, Result};
use std::{fmt, ops::Index};

/// Ordered, non-negative extents of a tensor.
///
/// The default value is the rank-0 shape, whose product is 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dims(Vec<usize>);

impl Dims {
    pub fn new(extents: &[usize]) -> Self {
        Self(extents.to_vec())
    }

    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn product(&self) -> usize {
        Self::compute_size(&self.0)
    }

    pub fn first(&self) -> Option<usize> {
        self.0.first().copied()
    }

    /// Replaces the leading extent. A rank-0 shape is left untouched.
    pub fn set_first(&mut self, extent: usize) {
        if let Some(first) = self.0.first_mut() {
            *first = extent;
        }
    }

    /// Collapses the extents into `[prod(dims[..num_col_dims]), prod(dims[num_col_dims..])]`.
    pub fn flatten_to_2d(&self, num_col_dims: usize) -> Result<Dims> {
        if num_col_dims > self.ndim() {
            return Err(Error::InvalidSplit {
                dims: self.clone(),
                num_col_dims,
            });
        }
        let (rows, cols) = self.0.split_at(num_col_dims);
        Ok(Dims(vec![Self::compute_size(rows), Self::compute_size(cols)]))
    }

    // helper

    pub fn compute_size(extents: &[usize]) -> usize {
        extents.iter().product()
    }
}

impl Index<usize> for Dims {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.0[index]
    }
}

impl From<Vec<usize>> for Dims {
    fn from(extents: Vec<usize>) -> Self {
        Self(extents)
    }
}

impl From<&[usize]> for Dims {
    fn from(extents: &[usize]) -> Self {
        Self::new(extents)
    }
}

impl<const N: usize> From<[usize; N]> for Dims {
    fn from(extents: [usize; N]) -> Self {
        Self(extents.to_vec())
    }
}

impl From<&Dims> for Dims {
    fn from(dims: &Dims) -> Self {
        dims.clone()
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
