use anyhow::Context;
use clap::Parser;
use raw2dng::batch::BatchConverter;
use raw2dng::cli::Cli;
use raw2dng::logger::{self, error, info};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(if cli.verbose { "debug" } else { "info" });

    info!("Starting raw2dng...");

    let config = cli.conversion_config();
    info!("Demosaic: {:?}", config.demosaic);
    info!("Preview sizes: {} / {}", config.preview_size, config.thumbnail_size);

    if let Some(dir) = &cli.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output folder {}", dir.display()))?;
    }

    let files = cli.collect_inputs()?;
    let summary = BatchConverter::new(config, cli.output_dir.clone())
        .show_progress(!cli.no_progress)
        .run(&files)?;

    println!("Converted: {}, Failed: {}", summary.converted, summary.failed.len());

    if !summary.is_success() {
        error!("{} of {} files failed", summary.failed.len(), summary.total());
        std::process::exit(1);
    }
    Ok(())
}
