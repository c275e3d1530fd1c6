use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use cardiovar_core::utils::RecordStream;

use crate::catalog::ReferenceShardCatalog;
use crate::consts::{SHARD_ALT_COLUMN, SHARD_POS_COLUMN, SHARD_REF_COLUMN};
use crate::error::{Result, SubsetError};
use crate::index::{IndexedTsvWriter, index_path_for};
use crate::needed::{NeededVariants, PositionIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeScan {
    pub chrom: String,
    pub shard: PathBuf,
    pub needed: usize,
    pub scanned_rows: usize,
    pub retained: usize,
    /// Rows with fewer than four columns or a non-integer position.
    pub malformed_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingShard {
    pub chrom: String,
    pub searched: Vec<PathBuf>,
}

/// A shard that exists but could not be read to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedShard {
    pub chrom: String,
    pub shard: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetReport {
    pub output: PathBuf,
    pub index: PathBuf,
    /// Header line of the first readable shard, written once at the top of the output.
    pub header: String,
    pub rows_written: usize,
    pub scans: Vec<ChromosomeScan>,
    /// Chromosomes whose variants were left out because no shard exists for them.
    pub missing_shards: Vec<MissingShard>,
    /// Chromosomes whose variants were left out because their shard is empty, has no
    /// header or is corrupt.
    pub failed_shards: Vec<FailedShard>,
}

/// Rows retained from one shard, held until the shard has been read to the end.
struct ShardScan {
    scan: ChromosomeScan,
    header: String,
    rows: Vec<(String, u64, String)>,
}

///
/// Pulls the rows a variant file needs out of a per-chromosome reference resource
/// into one bgzipped, tabix-indexed file.
///
/// Shards are scanned one at a time in the order their chromosome first appears in
/// the variant file. A missing or unreadable shard only drops that chromosome's
/// variants; zero retained rows overall is an error, and no partial output is left
/// behind when the run fails.
///
#[derive(Debug, Clone)]
pub struct ReferenceSubsetExtractor {
    catalog: ReferenceShardCatalog,
    progress: bool,
}

fn scan_spinner(progress: bool) -> ProgressBar {
    if !progress {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg} ({pos} rows)")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb
}

/// The shard row's `(pos, ref, alt)` if it parses.
fn row_triple(columns: &[&str]) -> Option<(u64, String, String)> {
    if columns.len() <= SHARD_ALT_COLUMN {
        return None;
    }
    let pos = columns[SHARD_POS_COLUMN].trim().parse::<u64>().ok()?;
    Some((
        pos,
        columns[SHARD_REF_COLUMN].to_string(),
        columns[SHARD_ALT_COLUMN].to_string(),
    ))
}

fn remove_partial_output(output: &Path) {
    for path in [output.to_path_buf(), index_path_for(output)] {
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!("Could not remove partial output {:?}: {}", path, e);
            }
        }
    }
}

impl ReferenceSubsetExtractor {
    pub fn new(catalog: ReferenceShardCatalog) -> Self {
        ReferenceSubsetExtractor {
            catalog,
            progress: false,
        }
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn catalog(&self) -> &ReferenceShardCatalog {
        &self.catalog
    }

    ///
    /// Collect the needed variants from `vcf`, then [`extract`](Self::extract) them.
    ///
    pub fn extract_from_vcf(&self, vcf: &Path, output: &Path) -> Result<SubsetReport> {
        let needed = NeededVariants::from_path(vcf)?;
        self.extract(&needed, output)
    }

    pub fn extract(&self, needed: &NeededVariants, output: &Path) -> Result<SubsetReport> {
        if needed.is_empty() {
            return Err(SubsetError::NoVariants {
                path: needed.source().unwrap_or(output).to_path_buf(),
            });
        }

        let mut created = false;
        let result = self.extract_into(needed, output, &mut created);
        if result.is_err() && created {
            remove_partial_output(output);
        }
        result
    }

    fn extract_into(
        &self,
        needed: &NeededVariants,
        output: &Path,
        created: &mut bool,
    ) -> Result<SubsetReport> {
        let mut header: Option<String> = None;
        let mut sink: Option<IndexedTsvWriter> = None;
        let mut scans = Vec::new();
        let mut missing_shards = Vec::new();
        let mut failed_shards = Vec::new();
        let mut first_failure: Option<SubsetError> = None;

        for chrom in needed.chromosomes() {
            let shard = match self.catalog.resolve(chrom) {
                Ok(shard) => shard,
                Err(SubsetError::ShardNotFound { chrom, searched }) => {
                    warn!(
                        "No reference shard for chromosome {}; its {} variants are skipped",
                        chrom,
                        needed.count(&chrom)
                    );
                    missing_shards.push(MissingShard { chrom, searched });
                    continue;
                }
                Err(e) => return Err(e),
            };
            let Some(positions) = needed.positions(chrom) else {
                continue;
            };

            let ShardScan {
                scan,
                header: shard_header,
                rows,
            } = match self.scan_shard(chrom, &shard, positions, needed.count(chrom)) {
                Ok(scanned) => scanned,
                Err(e) => {
                    warn!(
                        "Skipping reference shard {:?} for chromosome {}: {}",
                        shard, chrom, e
                    );
                    failed_shards.push(FailedShard {
                        chrom: chrom.to_string(),
                        shard: shard.clone(),
                        reason: e.to_string(),
                    });
                    first_failure.get_or_insert(e);
                    continue;
                }
            };
            info!(
                "Scanned {:?}: {} of {} needed variants found in {} rows ({} malformed rows skipped)",
                shard.file_name().unwrap_or_default(),
                scan.retained,
                scan.needed,
                scan.scanned_rows,
                scan.malformed_rows
            );

            // the first readable shard supplies the header; later ones are not checked against it
            let header = header.get_or_insert(shard_header);
            for (row_chrom, pos, line) in rows {
                if sink.is_none() {
                    let mut writer = IndexedTsvWriter::create(output)?;
                    *created = true;
                    writer.write_header(header.as_str())?;
                    sink = Some(writer);
                }
                if let Some(writer) = sink.as_mut() {
                    writer.write_record(&row_chrom, pos, &line)?;
                }
            }
            scans.push(scan);
        }

        let (Some(sink), Some(header)) = (sink, header) else {
            if scans.is_empty() {
                if let Some(e) = first_failure {
                    return Err(e);
                }
                if let Some(first) = missing_shards.into_iter().next() {
                    return Err(SubsetError::ShardNotFound {
                        chrom: first.chrom,
                        searched: first.searched,
                    });
                }
            }
            return Err(SubsetError::NoMatchingRecords {
                shards_scanned: scans.len(),
            });
        };

        let rows_written = sink.records();
        let index = sink.finish()?;
        let malformed_rows: usize = scans.iter().map(|s| s.malformed_rows).sum();
        info!(
            "Wrote {:?} with {} records (index {:?}); {} malformed rows, {} missing and {} unreadable shards skipped",
            output,
            rows_written,
            index,
            malformed_rows,
            missing_shards.len(),
            failed_shards.len()
        );

        Ok(SubsetReport {
            output: output.to_path_buf(),
            index,
            header,
            rows_written,
            scans,
            missing_shards,
            failed_shards,
        })
    }

    ///
    /// Stream one shard to the end, keeping every row whose `(pos, ref, alt)` is needed.
    /// Nothing is written here, so a shard that fails partway contributes no rows.
    ///
    fn scan_shard(
        &self,
        chrom: &str,
        shard: &Path,
        positions: &PositionIndex,
        needed: usize,
    ) -> Result<ShardScan> {
        let mut lines = RecordStream::from_path(shard)?;
        let header = match lines.next() {
            Some(line) => line?,
            None => String::new(),
        };
        if !header.contains('\t') {
            return Err(SubsetError::InvalidHeader {
                path: shard.to_path_buf(),
            });
        }

        let mut scan = ChromosomeScan {
            chrom: chrom.to_string(),
            shard: shard.to_path_buf(),
            needed,
            scanned_rows: 0,
            retained: 0,
            malformed_rows: 0,
        };
        let mut rows = Vec::new();

        let pb = scan_spinner(self.progress);
        pb.set_message(format!("Scanning {:?}", shard.file_name().unwrap_or_default()));

        for line in lines {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            scan.scanned_rows += 1;
            pb.inc(1);

            let columns: Vec<&str> = line.splitn(SHARD_ALT_COLUMN + 2, '\t').collect();
            let Some((pos, ref_allele, alt_allele)) = row_triple(&columns) else {
                scan.malformed_rows += 1;
                continue;
            };
            let wanted = positions
                .get(&pos)
                .is_some_and(|pairs| pairs.contains(&(ref_allele, alt_allele)));
            if !wanted {
                continue;
            }

            let row_chrom = columns[0].to_string();
            rows.push((row_chrom, pos, line));
            scan.retained += 1;
        }
        pb.finish_and_clear();

        Ok(ShardScan { scan, header, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::io::{Read, Write};

    use flate2::Compression;
    use flate2::read::MultiGzDecoder;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const SHARD_HEADER: &str = "#chr\tpos(1-based)\tref\talt\taaref\tSIFT_score";

    struct Resource {
        dir: tempfile::TempDir,
    }

    impl Resource {
        fn shard(&self, chrom: &str, rows: &[&str]) {
            let path = self.dir.path().join(format!("dbNSFP4.4a_variant.chr{chrom}.gz"));
            let mut encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
            writeln!(encoder, "{SHARD_HEADER}").unwrap();
            for row in rows {
                writeln!(encoder, "{row}").unwrap();
            }
            encoder.finish().unwrap();
        }

        fn empty_shard(&self, chrom: &str) {
            let path = self.dir.path().join(format!("dbNSFP4.4a_variant.chr{chrom}.gz"));
            GzEncoder::new(File::create(path).unwrap(), Compression::default())
                .finish()
                .unwrap();
        }

        fn output(&self) -> PathBuf {
            self.dir.path().join("out/dbNSFP4.4a.txt.gz")
        }

        fn extractor(&self) -> ReferenceSubsetExtractor {
            std::fs::create_dir_all(self.dir.path().join("out")).unwrap();
            ReferenceSubsetExtractor::new(ReferenceShardCatalog::new(self.dir.path()))
        }
    }

    #[fixture]
    fn resource() -> Resource {
        Resource {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn gunzip(path: &Path) -> String {
        let mut contents = String::new();
        MultiGzDecoder::new(File::open(path).unwrap())
            .read_to_string(&mut contents)
            .unwrap();
        contents
    }

    #[rstest]
    fn test_retains_only_needed_rows(resource: Resource) {
        resource.shard("11", &["11\t100\tC\tT\tR\t0.01", "11\t150\tG\tA\tQ\t0.5"]);
        let mut needed = NeededVariants::new();
        needed.insert("chr11", 100, "C", "T");
        needed.insert("chr11", 200, "C", "G");

        let report = resource.extractor().extract(&needed, &resource.output()).unwrap();

        assert_eq!(report.rows_written, 1);
        assert_eq!(report.header, SHARD_HEADER);
        assert_eq!(report.scans[0].scanned_rows, 2);
        assert_eq!(report.scans[0].needed, 2);
        assert_eq!(report.missing_shards.is_empty(), true);
        assert_eq!(
            gunzip(&report.output),
            format!("{SHARD_HEADER}\n11\t100\tC\tT\tR\t0.01\n")
        );
        assert_eq!(report.index.exists(), true);
    }

    #[rstest]
    fn test_allele_must_match_at_position(resource: Resource) {
        resource.shard("11", &["11\t100\tC\tA\tR\t0.01", "11\t100\tC\tT\tR\t0.02"]);
        let mut needed = NeededVariants::new();
        needed.insert("11", 100, "C", "T");

        let report = resource.extractor().extract(&needed, &resource.output()).unwrap();
        assert_eq!(
            gunzip(&report.output),
            format!("{SHARD_HEADER}\n11\t100\tC\tT\tR\t0.02\n")
        );
    }

    #[rstest]
    fn test_missing_shard_does_not_abort_other_chromosomes(resource: Resource) {
        resource.shard("14", &["14\t23885000\tG\tA\tR\t0.0", "14\t23885001\tbad"]);
        let mut needed = NeededVariants::new();
        needed.insert("X", 5, "A", "G");
        needed.insert("14", 23885000, "G", "A");

        let report = resource.extractor().extract(&needed, &resource.output()).unwrap();

        assert_eq!(report.rows_written, 1);
        assert_eq!(report.scans.len(), 1);
        assert_eq!(report.scans[0].malformed_rows, 1);
        assert_eq!(report.missing_shards.len(), 1);
        assert_eq!(report.missing_shards[0].chrom, "X");
    }

    #[rstest]
    fn test_rows_follow_variant_file_chromosome_order(resource: Resource) {
        resource.shard("1", &["1\t10\tA\tG\tR\t0.1"]);
        resource.shard("2", &["2\t20\tC\tT\tR\t0.2"]);
        let mut needed = NeededVariants::new();
        needed.insert("2", 20, "C", "T");
        needed.insert("1", 10, "A", "G");

        let report = resource.extractor().extract(&needed, &resource.output()).unwrap();
        assert_eq!(
            gunzip(&report.output),
            format!("{SHARD_HEADER}\n2\t20\tC\tT\tR\t0.2\n1\t10\tA\tG\tR\t0.1\n")
        );
    }

    #[rstest]
    fn test_no_matching_records(resource: Resource) {
        resource.shard("11", &["11\t150\tG\tA\tQ\t0.5"]);
        let mut needed = NeededVariants::new();
        needed.insert("11", 100, "C", "T");

        let result = resource.extractor().extract(&needed, &resource.output());
        assert_eq!(
            matches!(result, Err(SubsetError::NoMatchingRecords { shards_scanned: 1 })),
            true
        );
        assert_eq!(resource.output().exists(), false);
    }

    #[rstest]
    fn test_no_variants(resource: Resource) {
        let vcf = resource.dir.path().join("empty.vcf");
        std::fs::write(&vcf, "##fileformat=VCFv4.2\n").unwrap();

        let result = resource.extractor().extract_from_vcf(&vcf, &resource.output());
        match result {
            Err(SubsetError::NoVariants { path }) => assert_eq!(path, vcf),
            other => panic!("expected NoVariants, got {:?}", other),
        }
    }

    #[rstest]
    fn test_every_shard_missing(resource: Resource) {
        let mut needed = NeededVariants::new();
        needed.insert("22", 1, "A", "C");

        let result = resource.extractor().extract(&needed, &resource.output());
        assert_eq!(
            matches!(result, Err(SubsetError::ShardNotFound { ref chrom, .. }) if chrom == "22"),
            true
        );
    }

    #[rstest]
    fn test_empty_shard_only_drops_its_chromosome(resource: Resource) {
        resource.shard("11", &["11\t100\tC\tT\tR\t0.01"]);
        resource.empty_shard("14");
        let mut needed = NeededVariants::new();
        needed.insert("11", 100, "C", "T");
        needed.insert("14", 5, "A", "G");

        let report = resource.extractor().extract(&needed, &resource.output()).unwrap();

        assert_eq!(report.rows_written, 1);
        assert_eq!(report.scans.len(), 1);
        assert_eq!(report.failed_shards.len(), 1);
        assert_eq!(report.failed_shards[0].chrom, "14");
        assert_eq!(
            gunzip(&report.output),
            format!("{SHARD_HEADER}\n11\t100\tC\tT\tR\t0.01\n")
        );
        assert_eq!(report.index.exists(), true);
    }

    #[rstest]
    fn test_unreadable_first_shard_does_not_supply_header(resource: Resource) {
        resource.empty_shard("14");
        resource.shard("11", &["11\t100\tC\tT\tR\t0.01"]);
        let mut needed = NeededVariants::new();
        needed.insert("14", 5, "A", "G");
        needed.insert("11", 100, "C", "T");

        let report = resource.extractor().extract(&needed, &resource.output()).unwrap();
        assert_eq!(report.header, SHARD_HEADER);
        assert_eq!(report.failed_shards[0].chrom, "14");
    }

    #[rstest]
    fn test_every_shard_unreadable(resource: Resource) {
        resource.empty_shard("14");
        let mut needed = NeededVariants::new();
        needed.insert("14", 5, "A", "G");

        let result = resource.extractor().extract(&needed, &resource.output());
        assert_eq!(matches!(result, Err(SubsetError::InvalidHeader { .. })), true);
        assert_eq!(resource.output().exists(), false);
    }

    #[rstest]
    fn test_failed_run_removes_partial_output(resource: Resource) {
        resource.shard("11", &["11\t100\tC\tT\tR\t0.01"]);
        resource.shard("1", &["1\t0\tA\tC\tR\t0.5"]);
        let mut needed = NeededVariants::new();
        needed.insert("11", 100, "C", "T");
        needed.insert("1", 0, "A", "C");

        let result = resource.extractor().extract(&needed, &resource.output());

        assert_eq!(
            matches!(result, Err(SubsetError::InvalidIndexPosition { pos: 0, .. })),
            true
        );
        assert_eq!(resource.output().exists(), false);
        assert_eq!(index_path_for(&resource.output()).exists(), false);
    }
}
