use std::path::{Path, PathBuf};

use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info};

use cardiovar_core::consts::COMMENT_PREFIX;
use cardiovar_core::utils::{RecordStream, normalize_chrom};

use crate::error::Result;

/// Position to the acceptable `(ref, alt)` pairs at that position.
pub type PositionIndex = FxHashMap<u64, FxHashSet<(String, String)>>;

///
/// The `(pos, ref, alt)` triples a variant file needs, grouped by normalized
/// chromosome. Chromosomes keep the order in which they first appear in the file,
/// which is the order shards are scanned and rows are written.
///
#[derive(Debug, Clone, Default)]
pub struct NeededVariants {
    source: Option<PathBuf>,
    order: Vec<String>,
    by_chrom: FxHashMap<String, PositionIndex>,
    malformed_lines: usize,
}

impl NeededVariants {
    pub fn new() -> Self {
        NeededVariants::default()
    }

    ///
    /// Collect needed triples from the data lines of a (possibly gzipped) variant file.
    ///
    /// A comma separated ALT contributes one triple per allele. Lines with fewer than
    /// five columns or a non-integer position are counted and skipped.
    ///
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut needed = NeededVariants {
            source: Some(path.to_path_buf()),
            ..NeededVariants::default()
        };

        for line in RecordStream::from_path(path)? {
            let line = line?;
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }
            let columns: Vec<&str> = line.splitn(6, '\t').collect();
            if columns.len() < 5 {
                needed.malformed_lines += 1;
                continue;
            }
            let Ok(pos) = columns[1].trim().parse::<u64>() else {
                debug!("Skipping line with position {:?}", columns[1]);
                needed.malformed_lines += 1;
                continue;
            };
            for alt in columns[4].split(',') {
                needed.insert(columns[0], pos, columns[3], alt);
            }
        }

        info!(
            "{} variants needed across {} chromosomes from {:?} ({} malformed lines)",
            needed.len(),
            needed.order.len(),
            path,
            needed.malformed_lines
        );
        Ok(needed)
    }

    pub fn insert(&mut self, chrom: &str, pos: u64, ref_allele: &str, alt_allele: &str) {
        let chrom = normalize_chrom(chrom);
        if !self.by_chrom.contains_key(&chrom) {
            self.order.push(chrom.clone());
        }
        self.by_chrom
            .entry(chrom)
            .or_default()
            .entry(pos)
            .or_default()
            .insert((ref_allele.to_string(), alt_allele.to_string()));
    }

    /// Chromosomes in first-seen order.
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn positions(&self, chrom: &str) -> Option<&PositionIndex> {
        self.by_chrom.get(&normalize_chrom(chrom))
    }

    pub fn contains(&self, chrom: &str, pos: u64, ref_allele: &str, alt_allele: &str) -> bool {
        self.positions(chrom)
            .and_then(|index| index.get(&pos))
            .is_some_and(|pairs| pairs.contains(&(ref_allele.to_string(), alt_allele.to_string())))
    }

    /// Number of distinct triples on `chrom`.
    pub fn count(&self, chrom: &str) -> usize {
        self.positions(chrom)
            .map(|index| index.values().map(FxHashSet::len).sum())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.iter().map(|c| self.count(c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn malformed_lines(&self) -> usize {
        self.malformed_lines
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
