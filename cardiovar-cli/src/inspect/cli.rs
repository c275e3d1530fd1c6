use clap::{Arg, Command, arg, value_parser};

pub const INSPECT_CMD: &str = "inspect";
pub const DEFAULT_MAX_EXAMPLES: usize = 10;

pub fn create_inspect_cli() -> Command {
    Command::new(INSPECT_CMD)
        .about("Report which dbNSFP-derived fields an annotated variant file carries, with examples.")
        .arg(Arg::new("annotated").required(true).help("Annotated variant file (.vcf or .vcf.gz)"))
        .arg(
            arg!(--"max-examples" <n> "Number of example variants to print")
                .value_parser(value_parser!(usize))
                .default_value("10"),
        )
}
