use crate::engine::config::MolGridConfig;
use crate::engine::error::LoaderError;
use crate::engine::loader::{Batch, MolGridLoader};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::slice::slice_channels;
use tracing::{info, instrument};

/// What one drawn batch looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub batch: u64,
    /// Completed epochs after this batch was drawn.
    pub epoch: u64,
    pub shape: Vec<usize>,
    pub example_indices: Vec<usize>,
    pub positives: usize,
    pub negatives: usize,
    pub mean_affinity: Option<f32>,
    /// L2 norm of each example's grid.
    pub density_norms: Vec<f64>,
    /// Sum of each example's grid.
    pub density_sums: Vec<f64>,
    pub rec_shape: Vec<usize>,
    pub lig_shape: Vec<usize>,
}

impl BatchSummary {
    fn from_batch(batch: &Batch, index: u64, epoch: u64, slice_point: usize) -> Result<Self, LoaderError> {
        let sliced = slice_channels(&batch.grids, slice_point)?;
        let positives = batch.labels.iter().filter(|&&label| label > 0.0).count();

        let mean_affinity = batch.affinities.as_ref().and_then(|values| {
            (!values.is_empty()).then(|| values.iter().sum::<f32>() / values.len() as f32)
        });

        let (density_norms, density_sums) = (0..batch.example_indices.len())
            .filter_map(|i| batch.grids.outer(i))
            .map(|values| {
                let (squares, sum) = values.iter().fold((0.0f64, 0.0f64), |(sq, s), &v| {
                    let v = v as f64;
                    (sq + v * v, s + v)
                });
                (squares.sqrt(), sum)
            })
            .unzip();

        Ok(Self {
            batch: index,
            epoch,
            shape: batch.grids.shape().to_vec(),
            example_indices: batch.example_indices.clone(),
            positives,
            negatives: batch.labels.len() - positives,
            mean_affinity,
            density_norms,
            density_sums,
            rec_shape: sliced.rec.shape().to_vec(),
            lig_shape: sliced.lig.shape().to_vec(),
        })
    }
}

/// Builds a loader, draws `n_batches` batches and summarizes each one, slicing channels at
/// `slice_point`.
#[instrument(skip_all, name = "inspect_workflow", fields(n_batches = n_batches))]
pub fn run(
    config: MolGridConfig,
    n_batches: usize,
    slice_point: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<BatchSummary>, LoaderError> {
    let mut loader = MolGridLoader::new(config, reporter)?;

    reporter.report(Progress::PhaseStart {
        name: "Drawing Batches",
    });
    let mut summaries = Vec::with_capacity(n_batches);
    reporter.report(Progress::TaskStart {
        total_steps: n_batches as u64,
    });
    for _ in 0..n_batches {
        let batch = loader.next_batch()?;
        let index = loader.batches_drawn();
        let epoch = loader.epoch();
        summaries.push(BatchSummary::from_batch(&batch, index, epoch, slice_point)?);
        reporter.report(Progress::BatchReady {
            batch: index,
            epoch,
        });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    info!(
        batches = summaries.len(),
        epochs = loader.epoch(),
        "Batch inspection finished."
    );
    Ok(summaries)
}
