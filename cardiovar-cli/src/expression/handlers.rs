use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cardiovar_core::models::GenePanel;
use cardiovar_features::gtex::extract_heart_expression;

pub fn run_expression(matches: &ArgMatches) -> Result<()> {
    let gct = matches
        .get_one::<String>("gct")
        .context("A path to a GTEx GCT file is required.")?;
    let output = matches
        .get_one::<String>("output")
        .context("An output path is required.")?;
    let attrs = matches.get_one::<String>("attrs").map(Path::new);

    let panel = GenePanel::cardiac();
    let genes: Vec<&str> = match matches.get_many::<String>("gene") {
        Some(genes) => genes.map(String::as_str).collect(),
        None => panel.genes(),
    };

    let summary = extract_heart_expression(Path::new(gct), attrs, &genes, Path::new(output))
        .with_context(|| format!("Failed to extract heart expression from {gct}"))?;

    info!(
        "Saved {} ({} of {} genes found, medians: {})",
        output,
        summary.genes_found,
        genes.len(),
        summary.medians
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::expression::cli::create_expression_cli;

    #[rstest]
    fn test_run_expression_without_attributes() {
        let dir = tempfile::tempdir().unwrap();
        let gct = dir.path().join("gene_tpm.gct");
        std::fs::write(
            &gct,
            "#1.2\n2\t2\nName\tDescription\tS1\tS2\nENSG00000092054.12\tMYH7\t800\t900\nENSG00000000003.14\tTSPAN6\t1\t2\n",
        )
        .unwrap();
        let output = dir.path().join("gtex_heart.csv");

        let matches = create_expression_cli().get_matches_from([
            "expression",
            gct.to_str().unwrap(),
            "--gene",
            "MYH7",
            "--gene",
            "TTN",
            "--output",
            output.to_str().unwrap(),
        ]);
        run_expression(&matches).unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "Name,Description,S1,S2\nENSG00000092054.12,MYH7,800,900\n"
        );
    }

    #[rstest]
    fn test_missing_matrix_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("gtex_heart.csv");
        let matches = create_expression_cli().get_matches_from([
            "expression",
            dir.path().join("absent.gct.gz").to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);
        assert_eq!(run_expression(&matches).is_err(), true);
    }
}
