use clap::{Arg, Command, arg};

pub const PREDICT_CMD: &str = "predict";

pub fn create_predict_cli() -> Command {
    Command::new(PREDICT_CMD)
        .about("Score one variant from a precomputed feature table and print the prediction as JSON.")
        .arg(Arg::new("features").required(true).help("Feature table written by `features`"))
        .arg(arg!(--model <model> "Logistic model weights (JSON)").required(true))
        .arg(arg!(--variant <variant> "Variant as chrom:pos:ref:alt").required(true))
        .arg(arg!(--output <output> "Write the prediction JSON here instead of stdout"))
}
