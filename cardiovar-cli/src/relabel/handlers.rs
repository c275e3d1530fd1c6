use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cardiovar_features::{ClinicalSignificanceIndex, relabel};

pub fn run_relabel(matches: &ArgMatches) -> Result<()> {
    let features = matches
        .get_one::<String>("features")
        .context("A path to a feature table is required.")?;
    let clinvar = matches
        .get_one::<String>("clinvar")
        .context("A path to a clinical significance file is required.")?;
    let output = matches
        .get_one::<String>("output")
        .context("An output path is required.")?;

    let index = ClinicalSignificanceIndex::from_path(Path::new(clinvar))
        .with_context(|| format!("Failed to index clinical significance from {clinvar}"))?;
    let summary = relabel(Path::new(features), Path::new(output), &index)
        .with_context(|| format!("Failed to relabel {features}"))?;

    info!(
        "Saved {} with {} rows ({} labelled)",
        output, summary.rows, summary.labelled
    );
    Ok(())
}
