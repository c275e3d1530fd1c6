use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cardiovar_core::models::VariantKey;
use cardiovar_features::{LogisticScorer, predict_variant, read_feature_table};

pub fn run_predict(matches: &ArgMatches) -> Result<()> {
    let features = matches
        .get_one::<String>("features")
        .context("A path to a feature table is required.")?;
    let model = matches
        .get_one::<String>("model")
        .context("A path to model weights is required.")?;
    let variant = matches
        .get_one::<String>("variant")
        .context("A variant (chrom:pos:ref:alt) is required.")?;

    let key: VariantKey = variant
        .parse()
        .with_context(|| format!("Invalid variant {variant}"))?;
    let rows = read_feature_table(Path::new(features))
        .with_context(|| format!("Failed to read feature table {features}"))?;
    let scorer = LogisticScorer::from_path(Path::new(model))?;

    let prediction = predict_variant(&scorer, &rows, &key)?;
    let json = serde_json::to_string_pretty(&prediction)?;

    match matches.get_one::<String>("output") {
        Some(output) => {
            std::fs::write(output, &json).with_context(|| format!("Failed to write {output}"))?;
            info!(
                "Predicted pathogenicity probability for {}: {:.1}% ({})",
                key,
                prediction.prob_pathogenic * 100.0,
                output
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
