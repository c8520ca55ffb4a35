use crate::cli::BatchesArgs;
use crate::config::PartialGridConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use itertools::Itertools;
use molgrid::engine::progress::ProgressReporter;
use molgrid::workflows::{self, inspect::BatchSummary};
use tracing::info;

pub async fn run(args: BatchesArgs) -> Result<()> {
    let partial_config = PartialGridConfig::from_file(&args.config.config)?;
    info!("Merging configuration from file and CLI arguments...");
    let resolved = partial_config.merge_with_cli(&args.config)?;
    let slice_point = args.slice_point.unwrap_or(resolved.slice_point);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Drawing {} batch(es)...", args.batches);
    let summaries = tokio::task::block_in_place(|| {
        workflows::inspect::run(resolved.loader, args.batches, slice_point, &reporter)
    })?;

    for summary in &summaries {
        println!("{}", format_summary(summary));
    }
    Ok(())
}

fn format_summary(summary: &BatchSummary) -> String {
    let affinity = summary
        .mean_affinity
        .map(|a| format!(", mean affinity {:.3}", a))
        .unwrap_or_default();
    format!(
        "Batch {} (epoch {}): grids {:?}, rec {:?}, lig {:?}\n  {} positive / {} negative{}\n  examples [{}]\n  channel sums [{}]",
        summary.batch,
        summary.epoch,
        summary.shape,
        summary.rec_shape,
        summary.lig_shape,
        summary.positives,
        summary.negatives,
        affinity,
        summary.example_indices.iter().join(", "),
        summary
            .density_sums
            .iter()
            .map(|s| format!("{:.2}", s))
            .join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_counts_and_channels() {
        let summary = BatchSummary {
            batch: 2,
            epoch: 1,
            shape: vec![2, 3, 4, 4, 4],
            example_indices: vec![3, 0],
            positives: 1,
            negatives: 1,
            mean_affinity: Some(-1.5),
            density_norms: vec![1.0, 0.0, 2.0],
            density_sums: vec![1.0, 0.0, 2.25],
            rec_shape: vec![2, 2, 4, 4, 4],
            lig_shape: vec![2, 1, 4, 4, 4],
        };
        let text = format_summary(&summary);
        assert!(text.starts_with("Batch 2 (epoch 1): grids [2, 3, 4, 4, 4]"));
        assert!(text.contains("1 positive / 1 negative, mean affinity -1.500"));
        assert!(text.contains("examples [3, 0]"));
        assert!(text.contains("channel sums [1.00, 0.00, 2.25]"));
    }
}
