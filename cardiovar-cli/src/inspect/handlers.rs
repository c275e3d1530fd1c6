use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use cardiovar_vep::AnnotatedVcf;
use cardiovar_vep::inspect::{FIELDS_OF_INTEREST, InspectionReport, inspect_annotations};

use super::cli::DEFAULT_MAX_EXAMPLES;

fn render(report: &InspectionReport) -> String {
    let mut out = format!(
        "Fields present in CSQ header: {}\n",
        report.present_fields.join(", ")
    );
    if report.examples.is_empty() {
        out.push_str("No variants with populated fields of interest\n");
    }
    for example in &report.examples {
        let values: Vec<String> = example
            .values
            .iter()
            .map(|(field, value)| format!("{field}={value}"))
            .collect();
        out.push_str(&format!("{}\t{}\n", example.key, values.join(" ")));
    }
    out
}

pub fn run_inspect(matches: &ArgMatches) -> Result<()> {
    let annotated = matches
        .get_one::<String>("annotated")
        .context("A path to an annotated variant file is required.")?;
    let max_examples = matches
        .get_one::<usize>("max-examples")
        .copied()
        .unwrap_or(DEFAULT_MAX_EXAMPLES);

    let vcf = AnnotatedVcf::open(Path::new(annotated))
        .with_context(|| format!("Failed to open {annotated}"))?;
    let report = inspect_annotations(&vcf, &FIELDS_OF_INTEREST, max_examples)
        .with_context(|| format!("Failed to inspect {annotated}"))?;

    print!("{}", render(&report));
    Ok(())
}
