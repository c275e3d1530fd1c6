use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cardiovar_core::models::{BedWrite, GenePanel};

pub fn run_panel(matches: &ArgMatches) -> Result<()> {
    let output = matches
        .get_one::<String>("output")
        .context("An output path is required.")?;

    let panel = GenePanel::cardiac();
    let written = match output.ends_with(".gz") {
        true => panel.write_bed_gz(output),
        false => panel.write_bed(output),
    };
    written.with_context(|| format!("Failed to write {output}"))?;

    info!("Wrote {} panel genes to {}", panel.spans.len(), output);
    Ok(())
}
