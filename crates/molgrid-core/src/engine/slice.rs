use crate::core::models::tensor::{ShapeError, Tensor};

/// Channel index where ligand channels start for the standard 16-channel receptor map.
pub const DEFAULT_SLICE_POINT: usize = 16;

/// Receptor and ligand halves of a batch tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SlicedChannels {
    pub rec: Tensor,
    pub lig: Tensor,
}

/// Splits `tensor` along axis 1: channels `[0, slice_point)` become `rec`, the rest `lig`.
pub fn slice_channels(tensor: &Tensor, slice_point: usize) -> Result<SlicedChannels, ShapeError> {
    let shape = tensor.shape();
    if shape.len() < 2 {
        return Err(ShapeError::RankTooLow {
            min_rank: 2,
            shape: shape.to_vec(),
        });
    }
    let channels = shape[1];
    if channels < slice_point {
        return Err(ShapeError::TooFewChannels {
            channels,
            slice_point,
        });
    }

    let outer = shape[0];
    let inner: usize = shape[2..].iter().product();
    let rec_len = slice_point * inner;
    let lig_len = (channels - slice_point) * inner;

    let mut rec = Vec::with_capacity(outer * rec_len);
    let mut lig = Vec::with_capacity(outer * lig_len);
    let data = tensor.data();
    for item in 0..outer {
        let start = item * (rec_len + lig_len);
        rec.extend_from_slice(&data[start..start + rec_len]);
        lig.extend_from_slice(&data[start + rec_len..start + rec_len + lig_len]);
    }

    let mut rec_shape = shape.to_vec();
    rec_shape[1] = slice_point;
    let mut lig_shape = shape.to_vec();
    lig_shape[1] = channels - slice_point;

    Ok(SlicedChannels {
        rec: Tensor::new(rec_shape, rec)?,
        lig: Tensor::new(lig_shape, lig)?,
    })
}

/// Joins two tensors along axis 1; the inverse of [`slice_channels`].
pub fn concat_channels(rec: &Tensor, lig: &Tensor) -> Result<Tensor, ShapeError> {
    for tensor in [rec, lig] {
        if tensor.rank() < 2 {
            return Err(ShapeError::RankTooLow {
                min_rank: 2,
                shape: tensor.shape().to_vec(),
            });
        }
    }
    let (left, right) = (rec.shape(), lig.shape());
    if left.len() != right.len() || left[0] != right[0] || left[2..] != right[2..] {
        return Err(ShapeError::Incompatible {
            left: left.to_vec(),
            right: right.to_vec(),
        });
    }

    let inner: usize = left[2..].iter().product();
    let rec_len = left[1] * inner;
    let lig_len = right[1] * inner;
    let mut data = Vec::with_capacity(rec.len() + lig.len());
    for item in 0..left[0] {
        data.extend_from_slice(&rec.data()[item * rec_len..(item + 1) * rec_len]);
        data.extend_from_slice(&lig.data()[item * lig_len..(item + 1) * lig_len]);
    }

    let mut shape = left.to_vec();
    shape[1] = left[1] + right[1];
    Tensor::new(shape, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_tensor(shape: Vec<usize>) -> Tensor {
        let len = shape.iter().product();
        Tensor::new(shape, (0..len).map(|v| v as f32).collect()).unwrap()
    }

    #[test]
    fn default_slice_point_splits_rec_and_lig() {
        let batch = counting_tensor(vec![2, 28, 3, 3, 3]);
        let sliced = slice_channels(&batch, DEFAULT_SLICE_POINT).unwrap();
        assert_eq!(sliced.rec.shape(), &[2, 16, 3, 3, 3]);
        assert_eq!(sliced.lig.shape(), &[2, 12, 3, 3, 3]);

        // First ligand value of the second example is channel 16 of item 1.
        let item_len = 28 * 27;
        assert_eq!(sliced.lig.outer(1).unwrap()[0], (item_len + 16 * 27) as f32);
        assert_eq!(sliced.rec.outer(1).unwrap()[0], item_len as f32);
    }

    #[test]
    fn concat_restores_the_original() {
        let batch = counting_tensor(vec![3, 20, 2, 2, 2]);
        let sliced = slice_channels(&batch, 16).unwrap();
        assert_eq!(concat_channels(&sliced.rec, &sliced.lig).unwrap(), batch);
    }

    #[test]
    fn slicing_at_the_channel_count_leaves_lig_empty() {
        let batch = counting_tensor(vec![1, 16, 2, 2, 2]);
        let sliced = slice_channels(&batch, 16).unwrap();
        assert_eq!(sliced.lig.shape(), &[1, 0, 2, 2, 2]);
        assert!(sliced.lig.is_empty());
    }

    #[test]
    fn too_few_channels_is_a_shape_error() {
        let batch = counting_tensor(vec![1, 15, 2, 2, 2]);
        assert_eq!(
            slice_channels(&batch, 16),
            Err(ShapeError::TooFewChannels {
                channels: 15,
                slice_point: 16
            })
        );
    }

    #[test]
    fn rank_one_is_a_shape_error() {
        let tensor = counting_tensor(vec![32]);
        assert!(matches!(
            slice_channels(&tensor, 16),
            Err(ShapeError::RankTooLow { min_rank: 2, .. })
        ));
    }

    #[test]
    fn concat_rejects_mismatched_spatial_dims() {
        let rec = counting_tensor(vec![1, 2, 2, 2, 2]);
        let lig = counting_tensor(vec![1, 2, 3, 3, 3]);
        assert!(matches!(
            concat_channels(&rec, &lig),
            Err(ShapeError::Incompatible { .. })
        ));
    }
}
