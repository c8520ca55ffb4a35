use crate::cli::ExportArgs;
use crate::config::PartialGridConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use molgrid::engine::progress::ProgressReporter;
use molgrid::workflows;
use tracing::info;

pub async fn run(args: ExportArgs) -> Result<()> {
    let partial_config = PartialGridConfig::from_file(&args.config.config)?;
    let resolved = partial_config.merge_with_cli(&args.config)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Exporting example {} to prefix {:?}", args.line, &args.output);
    let result = tokio::task::block_in_place(|| {
        workflows::export::run(resolved.loader, args.line, &args.output, &reporter)
    })?;

    println!(
        "✓ Wrote {} map(s) centered at ({:.3}, {:.3}, {:.3})",
        result.dx_files.len(),
        result.center.x,
        result.center.y,
        result.center.z
    );
    println!("  PyMOL script: {}", result.pymol_file.display());
    Ok(())
}
