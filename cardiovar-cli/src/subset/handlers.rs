use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{error, info, warn};

use cardiovar_subset::{ReferenceShardCatalog, ReferenceSubsetExtractor, SubsetError};

use super::cli::{NO_MATCHING_RECORDS_STATUS, NO_VARIANTS_STATUS};

///
/// Run the extraction and return the process exit status. The two "nothing to
/// write" outcomes get distinct non-zero statuses; every other failure is an error.
///
pub fn run_subset(matches: &ArgMatches) -> Result<i32> {
    let vcf = matches
        .get_one::<String>("vcf")
        .context("A path to a variant file is required.")?;
    let reference_dir = matches
        .get_one::<String>("reference-dir")
        .context("A reference shard directory is required.")?;
    let output = matches
        .get_one::<String>("output")
        .context("An output path is required.")?;

    let catalog = match matches.get_many::<String>("template") {
        Some(templates) => {
            ReferenceShardCatalog::with_templates(Path::new(reference_dir), templates.cloned().collect())
        }
        None => ReferenceShardCatalog::new(Path::new(reference_dir)),
    };

    let output = Path::new(output);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {parent:?}"))?;
    }

    let extractor = ReferenceSubsetExtractor::new(catalog).with_progress(matches.get_flag("progress"));
    match extractor.extract_from_vcf(Path::new(vcf), output) {
        Ok(report) => {
            for missing in &report.missing_shards {
                warn!("Chromosome {} skipped: no shard among {:?}", missing.chrom, missing.searched);
            }
            for failed in &report.failed_shards {
                warn!("Chromosome {} skipped: {:?} unreadable ({})", failed.chrom, failed.shard, failed.reason);
            }
            let malformed_rows: usize = report.scans.iter().map(|s| s.malformed_rows).sum();
            info!(
                "Wrote {:?} with {} records ({} malformed reference rows skipped)",
                report.output, report.rows_written, malformed_rows
            );
            Ok(0)
        }
        Err(e @ SubsetError::NoVariants { .. }) => {
            error!("{e}");
            Ok(NO_VARIANTS_STATUS)
        }
        Err(e @ SubsetError::NoMatchingRecords { .. }) => {
            error!("{e}");
            Ok(NO_MATCHING_RECORDS_STATUS)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to subset reference shards for {vcf}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::subset::cli::create_subset_cli;

    struct Inputs {
        dir: tempfile::TempDir,
        vcf: PathBuf,
    }

    #[fixture]
    fn inputs() -> Inputs {
        let dir = tempfile::tempdir().unwrap();
        let vcf = dir.path().join("cardiac_genes.vcf");
        std::fs::write(&vcf, "#CHROM\tPOS\tID\tREF\tALT\n11\t100\t.\tC\tT\n").unwrap();

        let shard = dir.path().join("ref.11.tsv.gz");
        let mut encoder = GzEncoder::new(File::create(shard).unwrap(), Compression::default());
        encoder
            .write_all(b"#chr\tpos\tref\talt\n11\t100\tC\tT\n11\t150\tG\tA\n")
            .unwrap();
        encoder.finish().unwrap();

        Inputs { dir, vcf }
    }

    fn run(inputs: &Inputs, vcf: &Path) -> Result<i32> {
        let matches = create_subset_cli().get_matches_from([
            "subset",
            vcf.to_str().unwrap(),
            "--reference-dir",
            inputs.dir.path().to_str().unwrap(),
            "--template",
            "ref.{chrom}.tsv.gz",
            "--output",
            inputs.dir.path().join("out/subset.txt.gz").to_str().unwrap(),
        ]);
        run_subset(&matches)
    }

    #[rstest]
    fn test_subset_success(inputs: Inputs) {
        assert_eq!(run(&inputs, &inputs.vcf).unwrap(), 0);
        assert_eq!(inputs.dir.path().join("out/subset.txt.gz.tbi").exists(), true);
    }

    #[rstest]
    fn test_no_variants_status(inputs: Inputs) {
        let empty = inputs.dir.path().join("empty.vcf");
        std::fs::write(&empty, "#CHROM\tPOS\tID\tREF\tALT\n").unwrap();
        assert_eq!(run(&inputs, &empty).unwrap(), NO_VARIANTS_STATUS);
    }

    #[rstest]
    fn test_no_matching_records_status(inputs: Inputs) {
        let vcf = inputs.dir.path().join("other.vcf");
        std::fs::write(&vcf, "11\t999\t.\tC\tT\n").unwrap();
        assert_eq!(run(&inputs, &vcf).unwrap(), NO_MATCHING_RECORDS_STATUS);
    }

    #[rstest]
    fn test_missing_shard_is_an_error(inputs: Inputs) {
        let vcf = inputs.dir.path().join("chr5.vcf");
        std::fs::write(&vcf, "5\t10\t.\tC\tT\n").unwrap();
        assert_eq!(run(&inputs, &vcf).is_err(), true);
    }
}
