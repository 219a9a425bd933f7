mod cli;

use vidcarve::{config, extract::Extractor, input, output::OutputRoot};
use vidcarve_assets::DumperStore;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vidcarve=debug,vidcarve_assets=debug,vidcarve_media=trace".to_string()
        } else {
            "vidcarve=info,vidcarve_assets=info,vidcarve_media=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    if !cli.input.exists() {
        anyhow::bail!("Input path does not exist: {:?}", cli.input);
    }

    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    if let Some(dumper) = cli.dumper {
        config.assets.dumper = Some(dumper);
    }

    let output = OutputRoot::create(&cli.out)
        .with_context(|| format!("Failed to create output directory: {:?}", cli.out))?;

    let files = input::collect_input_files(&cli.input);
    println!("Found {} files", files.len());

    let mut extractor = Extractor::new(output, config.extract.limits())
        .with_data_fields(config.assets.data_fields.clone());

    if let Some(dumper) = &config.assets.dumper {
        match DumperStore::new(dumper, config.assets.args.clone()) {
            Ok(store) => {
                tracing::info!("Using asset dumper {:?}", store.program());
                extractor = extractor.with_store(Box::new(store));
            }
            Err(e) => {
                tracing::warn!("Asset dumper unavailable, using signature scan only: {}", e);
            }
        }
    }

    let summary = extractor.run(&files);

    for report in &summary.reports {
        match &report.error {
            Some(error) => println!("  {}: failed ({})", report.path.display(), error),
            None => println!(
                "  {}: {} videos ({})",
                report.path.display(),
                report.extracted(),
                report.strategy
            ),
        }
    }

    println!(
        "Extracted {} videos from {} files into {}",
        summary.total_extracted(),
        summary.reports.len(),
        cli.out.display()
    );

    Ok(())
}
