use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cardiovar_features::{FeatureConfig, FeatureInputs, build_features};

pub fn run_features(matches: &ArgMatches) -> Result<()> {
    let annotated = matches
        .get_one::<String>("annotated")
        .context("A path to an annotated variant file is required.")?;
    let output = matches
        .get_one::<String>("output")
        .context("An output path is required.")?;

    let config = match matches.get_one::<String>("config") {
        Some(path) => FeatureConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load feature config from {path}"))?,
        None => FeatureConfig::default(),
    };

    let inputs = FeatureInputs {
        expression: matches.get_one::<String>("expression").map(PathBuf::from),
        clinical: matches.get_one::<String>("clinvar").map(PathBuf::from),
        config,
        ..FeatureInputs::new(Path::new(annotated), Path::new(output))
    };

    let run = build_features(&inputs)
        .with_context(|| format!("Failed to build features from {annotated}"))?;

    info!(
        "Wrote {} rows to {} ({} labelled, {} duplicates skipped)",
        run.rows_written, output, run.labelled, run.duplicates_skipped
    );

    Ok(())
}
