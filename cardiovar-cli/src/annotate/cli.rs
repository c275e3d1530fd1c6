use clap::{Arg, ArgAction, Command, arg};

pub const ANNOTATE_CMD: &str = "annotate";
pub const DEFAULT_PROGRAM: &str = "vep";
pub const DEFAULT_OUTPUT_DIR: &str = "results";

pub fn create_annotate_cli() -> Command {
    Command::new(ANNOTATE_CMD)
        .about("Run an external annotation tool over a variant file.")
        .long_about(
            "Run an external annotation tool over a variant file. Tool arguments may use \
             {input} and {output}, which are replaced with the input path and \
             <output-dir>/<stem>.vep.vcf.",
        )
        .arg(Arg::new("input").required(true).help("Variant file to annotate"))
        .arg(arg!(--program <program> "Annotation tool to run").default_value(DEFAULT_PROGRAM))
        .arg(arg!(--"output-dir" <dir> "Directory for the annotated file").default_value(DEFAULT_OUTPUT_DIR))
        .arg(
            Arg::new("tool_args")
                .num_args(0..)
                .last(true)
                .action(ArgAction::Append)
                .allow_hyphen_values(true)
                .help("Arguments passed to the tool, after `--`"),
        )
}
