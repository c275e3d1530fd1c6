use clap::{Arg, ArgAction, Command, arg};

pub const SUBSET_CMD: &str = "subset";
pub const DEFAULT_OUT: &str = "dbNSFP4.4a.txt.gz";

/// Exit status when the variant file holds no variants.
pub const NO_VARIANTS_STATUS: i32 = 1;
/// Exit status when no reference row matched any variant.
pub const NO_MATCHING_RECORDS_STATUS: i32 = 2;

pub fn create_subset_cli() -> Command {
    Command::new(SUBSET_CMD)
        .about("Extract the reference rows needed by a variant file into one bgzipped, tabix-indexed file.")
        .arg(Arg::new("vcf").required(true).help("Variant file (.vcf or .vcf.gz)"))
        .arg(arg!(--"reference-dir" <dir> "Directory holding the per-chromosome reference shards").required(true))
        .arg(
            arg!(--template <template> "Shard file name template relative to the reference dir, with {chrom}; may be repeated")
                .action(ArgAction::Append),
        )
        .arg(arg!(--output <output> "Output path (bgzipped)").default_value(DEFAULT_OUT))
        .arg(arg!(--progress "Show a spinner while scanning shards").action(ArgAction::SetTrue))
}
