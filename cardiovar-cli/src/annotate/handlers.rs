use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cardiovar_vep::{Annotator, CommandAnnotator};

pub fn run_annotate(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .context("A path to a variant file is required.")?;
    let program = matches
        .get_one::<String>("program")
        .context("An annotation program is required.")?;
    let output_dir = matches
        .get_one::<String>("output-dir")
        .context("An output directory is required.")?;
    let args: Vec<String> = matches
        .get_many::<String>("tool_args")
        .map(|args| args.cloned().collect())
        .unwrap_or_default();

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {output_dir}"))?;

    let annotator = CommandAnnotator::new(program, args, Path::new(output_dir));
    let annotated = annotator.annotate(Path::new(input))?;

    info!("Annotated variants written to {:?}", annotated);
    Ok(())
}
