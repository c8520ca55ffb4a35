use super::grid::VoxelGrid;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("Data length {actual} does not match shape {shape:?} ({expected} elements)")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("Expected a tensor of rank at least {min_rank}, got shape {shape:?}")]
    RankTooLow { min_rank: usize, shape: Vec<usize> },
    #[error("Cannot slice {channels} channels at slice point {slice_point}")]
    TooFewChannels { channels: usize, slice_point: usize },
    #[error("Shapes {left:?} and {right:?} differ outside the concatenation axis")]
    Incompatible { left: Vec<usize>, right: Vec<usize> },
    #[error("Cannot stack grids of shape {first:?} and {other:?}")]
    NonUniformGrids { first: [usize; 4], other: [usize; 4] },
    #[error("Cannot stack an empty list of grids")]
    EmptyStack,
}

/// A dense row-major `f32` tensor of arbitrary rank.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Tensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self, ShapeError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(ShapeError::LengthMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![0.0; len],
        }
    }

    /// Stacks equally shaped grids along a new leading batch axis, giving
    /// `[batch, channels, x, y, z]`.
    pub fn stack_grids(grids: Vec<VoxelGrid>) -> Result<Self, ShapeError> {
        let first = grids.first().ok_or(ShapeError::EmptyStack)?.shape();
        if let Some(other) = grids.iter().map(VoxelGrid::shape).find(|s| *s != first) {
            return Err(ShapeError::NonUniformGrids { first, other });
        }

        let mut shape = Vec::with_capacity(5);
        shape.push(grids.len());
        shape.extend_from_slice(&first);

        let mut data = Vec::with_capacity(shape.iter().product());
        for grid in grids {
            data.extend(grid.into_data());
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.shape.get(axis).copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Returns the contiguous block for one index of the leading axis.
    pub fn outer(&self, index: usize) -> Option<&[f32]> {
        let outer = *self.shape.first()?;
        if index >= outer {
            return None;
        }
        let stride = self.data.len() / outer;
        Some(&self.data[index * stride..(index + 1) * stride])
    }
}
