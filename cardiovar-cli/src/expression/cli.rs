use clap::{Arg, ArgAction, Command, arg};

pub const EXPRESSION_CMD: &str = "expression";
pub const DEFAULT_OUT: &str = "gtex_heart.csv";

pub fn create_expression_cli() -> Command {
    Command::new(EXPRESSION_CMD)
        .about("Extract heart expression for the target genes from a GTEx gene TPM matrix.")
        .arg(Arg::new("gct").required(true).help("GTEx gene TPM matrix (.gct or .gct.gz)"))
        .arg(arg!(--attrs <attrs> "GTEx sample attributes; if given, per-tissue medians are computed"))
        .arg(
            arg!(--gene <gene> "Target gene symbol; may be repeated (default: cardiac panel)")
                .action(ArgAction::Append),
        )
        .arg(arg!(--output <output> "Output CSV").default_value(DEFAULT_OUT))
}
