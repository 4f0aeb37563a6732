//! Input structures for curve processing.
//!
//! [`SampleArrays`] is the host-side form every operation consumes.
//! [`SegmentationInput`] accepts batched Burn tensors, as produced by a model
//! forward pass, and splits them into one [`SampleArrays`] per batch item.

use burn::tensor::{backend::Backend, Bool, Tensor, TensorData};
use derive_new::new;

use crate::error::{EvalError, EvalResult};

/// The three aligned, flattened arrays of one sample.
///
/// Immutable once constructed: edge-case repair during evaluation works on
/// copies.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleArrays {
    prediction: Vec<f32>,
    binarized: Vec<bool>,
    ground_truth: Vec<bool>,
}

impl SampleArrays {
    /// Bundles one sample's arrays.
    ///
    /// # Errors
    ///
    /// - [`EvalError::EmptyInput`] if the ground truth is empty.
    /// - [`EvalError::LengthMismatch`] if the three arrays differ in length.
    /// - [`EvalError::NonFiniteValue`] if the probabilistic prediction holds NaN or infinity.
    pub fn new(
        prediction: Vec<f32>,
        binarized: Vec<bool>,
        ground_truth: Vec<bool>,
    ) -> EvalResult<Self> {
        if ground_truth.is_empty() {
            return Err(EvalError::EmptyInput {
                context: "ground truth",
            });
        }
        if prediction.len() != ground_truth.len() {
            return Err(EvalError::LengthMismatch {
                context: "probabilistic prediction vs ground truth",
                expected: ground_truth.len(),
                actual: prediction.len(),
            });
        }
        if binarized.len() != ground_truth.len() {
            return Err(EvalError::LengthMismatch {
                context: "binarized prediction vs ground truth",
                expected: ground_truth.len(),
                actual: binarized.len(),
            });
        }
        if let Some(index) = prediction.iter().position(|p| !p.is_finite()) {
            return Err(EvalError::NonFiniteValue {
                context: "probabilistic prediction",
                index,
            });
        }

        Ok(Self {
            prediction,
            binarized,
            ground_truth,
        })
    }

    /// Probabilistic prediction, conventionally in [0, 1].
    pub fn prediction(&self) -> &[f32] {
        &self.prediction
    }

    /// Binarized prediction.
    pub fn binarized(&self) -> &[bool] {
        &self.binarized
    }

    /// Binary ground truth.
    pub fn ground_truth(&self) -> &[bool] {
        &self.ground_truth
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.ground_truth.len()
    }

    /// Always false for a constructed sample; provided for API completeness.
    pub fn is_empty(&self) -> bool {
        self.ground_truth.is_empty()
    }
}

/// Batched segmentation output and ground truth.
#[derive(new, Debug, Clone)]
pub struct SegmentationInput<B: Backend> {
    /// Probabilistic predictions with shape `[batch_size, channels, height, width]`.
    pub predictions: Tensor<B, 4>,
    /// Binarized predictions with shape `[batch_size, channels, height, width]`.
    pub binarized: Tensor<B, 4, Bool>,
    /// Ground truth with shape `[batch_size, channels, height, width]`.
    pub targets: Tensor<B, 4, Bool>,
}

impl<B: Backend> SegmentationInput<B> {
    /// Splits the batch into one [`SampleArrays`] per item, flattening
    /// channels and pixels in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::LengthMismatch`] if the three tensors differ in shape,
    /// [`EvalError::EmptyInput`] for an empty batch, and
    /// [`EvalError::TensorConversion`] if tensor data cannot be read back.
    pub fn into_samples(self) -> EvalResult<Vec<SampleArrays>> {
        let dims = self.predictions.dims();
        for (context, other) in [
            ("binarized tensor shape", self.binarized.dims()),
            ("target tensor shape", self.targets.dims()),
        ] {
            if let Some(axis) = (0..4).find(|&axis| dims[axis] != other[axis]) {
                return Err(EvalError::LengthMismatch {
                    context,
                    expected: dims[axis],
                    actual: other[axis],
                });
            }
        }

        let [batch_size, channels, height, width] = dims;
        let item_len = channels * height * width;
        if batch_size == 0 || item_len == 0 {
            return Err(EvalError::EmptyInput {
                context: "segmentation batch",
            });
        }

        let predictions = float_values(self.predictions.into_data())?;
        let binarized = mask_values(self.binarized.float().into_data())?;
        let targets = mask_values(self.targets.float().into_data())?;

        predictions
            .chunks(item_len)
            .zip(binarized.chunks(item_len))
            .zip(targets.chunks(item_len))
            .map(|((pred, bin), gt)| SampleArrays::new(pred.to_vec(), bin.to_vec(), gt.to_vec()))
            .collect()
    }
}

fn float_values(data: TensorData) -> EvalResult<Vec<f32>> {
    data.convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| EvalError::TensorConversion {
            reason: format!("{e:?}"),
        })
}

fn mask_values(data: TensorData) -> EvalResult<Vec<bool>> {
    Ok(float_values(data)?.into_iter().map(|v| v > 0.5).collect())
}
