use clap::{Arg, Command, arg};

pub const FEATURES_CMD: &str = "features";
pub const DEFAULT_OUT: &str = "features.csv";

pub fn create_features_cli() -> Command {
    Command::new(FEATURES_CMD)
        .about("Build the feature table from a VEP-annotated variant file.")
        .arg(Arg::new("annotated").required(true).help("Annotated variant file (.vcf or .vcf.gz)"))
        .arg(arg!(--expression <expression> "Heart expression table (gene, tissue TPM columns)"))
        .arg(arg!(--clinvar <clinvar> "Variant file with CLNSIG used to set training labels"))
        .arg(arg!(--config <config> "TOML file overriding the evidence thresholds"))
        .arg(arg!(--output <output> "Output CSV").default_value(DEFAULT_OUT))
}
