use clap::{Arg, Command, arg};

pub const RELABEL_CMD: &str = "relabel";
pub const DEFAULT_OUT: &str = "features_labeled.csv";

pub fn create_relabel_cli() -> Command {
    Command::new(RELABEL_CMD)
        .about("Rewrite the label column of a feature table from a ClinVar-style variant file.")
        .arg(Arg::new("features").required(true).help("Feature table written by `features`"))
        .arg(Arg::new("clinvar").required(true).help("Variant file with CLNSIG in INFO"))
        .arg(arg!(--output <output> "Output CSV").default_value(DEFAULT_OUT))
}
