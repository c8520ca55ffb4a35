use crate::cli::{CacheArgs, CacheKind};
use crate::config::PartialGridConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use molgrid::engine::loader::Part;
use molgrid::engine::progress::ProgressReporter;
use molgrid::workflows;
use tracing::info;

impl From<CacheKind> for Part {
    fn from(kind: CacheKind) -> Self {
        match kind {
            CacheKind::Rec => Part::Receptor,
            CacheKind::Lig => Part::Ligand,
        }
    }
}

pub async fn run(args: CacheArgs) -> Result<()> {
    let partial_config = PartialGridConfig::from_file(&args.config.config)?;
    let resolved = partial_config.merge_with_cli(&args.config)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let part = Part::from(args.kind);
    info!("Building {:?} molcache at {:?}", part, &args.output);
    let summary = tokio::task::block_in_place(|| {
        workflows::cache::run(resolved.loader, part, &args.output, &reporter)
    })?;

    println!(
        "✓ Cached {} grid(s) of shape {:?} to {}",
        summary.entries,
        summary.grid_shape,
        args.output.display()
    );
    Ok(())
}
