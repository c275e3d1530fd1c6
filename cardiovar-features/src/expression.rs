use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use fxhash::FxHashMap;
use log::{debug, info, warn};
use thiserror::Error;

use crate::candidate::CandidateRow;
use crate::consts::{ATRIAL_APPENDAGE_PREFIX, GENE_COLUMN, LEFT_VENTRICLE_PREFIX};

/// Fallback gene symbol columns, in preference order, when no `gene` column exists.
const GENE_COLUMN_FALLBACKS: [&str; 2] = ["Description", "Name"];

///
/// The expression table could not be used. The pipeline recovers by running
/// without expression features.
///
#[derive(Error, Debug)]
pub enum ExpressionError {
    #[error("Expression table {path:?} could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Expression table {path:?} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Expression table {0:?} has no gene, Description or Name column")]
    MissingGeneColumn(PathBuf),

    #[error("Expression table {0:?} has no heart left ventricle or atrial appendage column")]
    MissingTissueColumns(PathBuf),
}

///
/// Heart expression for one gene, in TPM.
///
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExpressionLevels {
    pub left_ventricle: Option<f64>,
    pub atrial_appendage: Option<f64>,
}

///
/// Gene symbol to heart expression levels; at most one entry per gene (first row wins).
///
#[derive(Debug, Clone, Default)]
pub struct ExpressionTable {
    genes: FxHashMap<String, ExpressionLevels>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinSummary {
    pub matched: usize,
    pub unmatched: usize,
}

fn sniff_delimiter(path: &Path) -> Result<u8, ExpressionError> {
    let file = File::open(path).map_err(|source| ExpressionError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let mut header = String::new();
    BufReader::new(file)
        .read_line(&mut header)
        .map_err(|source| ExpressionError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(if header.contains('\t') { b'\t' } else { b',' })
}

fn parse_tpm(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

impl ExpressionTable {
    pub fn new() -> Self {
        ExpressionTable::default()
    }

    ///
    /// Load a delimited expression table (comma or tab, sniffed from the header).
    ///
    /// The gene column is `gene`, else `Description`, else `Name`. Tissue columns are
    /// matched by case-insensitive prefix: `heart - left ventricle...` and
    /// `heart - atrial appendage...`. Duplicate gene symbols keep their first row.
    ///
    pub fn from_path(path: &Path) -> Result<Self, ExpressionError> {
        let malformed = |source| ExpressionError::Malformed {
            path: path.to_path_buf(),
            source,
        };

        let delimiter = sniff_delimiter(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_path(path)
            .map_err(malformed)?;

        let headers = reader.headers().map_err(malformed)?.clone();
        let column = |name: &str| headers.iter().position(|h| h.trim() == name);

        let gene_idx = column(GENE_COLUMN)
            .or_else(|| GENE_COLUMN_FALLBACKS.iter().find_map(|name| column(*name)))
            .ok_or_else(|| ExpressionError::MissingGeneColumn(path.to_path_buf()))?;

        let tissue = |prefix: &str| {
            headers
                .iter()
                .position(|h| h.trim().to_lowercase().starts_with(prefix))
        };
        let lv_idx = tissue(LEFT_VENTRICLE_PREFIX);
        let aa_idx = tissue(ATRIAL_APPENDAGE_PREFIX);
        if lv_idx.is_none() && aa_idx.is_none() {
            return Err(ExpressionError::MissingTissueColumns(path.to_path_buf()));
        }

        let mut table = ExpressionTable::new();
        let mut duplicates = 0;
        for record in reader.records() {
            let record = record.map_err(malformed)?;
            let gene = match record.get(gene_idx).map(str::trim) {
                Some(gene) if !gene.is_empty() => gene,
                _ => continue,
            };
            if table.genes.contains_key(gene) {
                duplicates += 1;
                continue;
            }
            let levels = ExpressionLevels {
                left_ventricle: parse_tpm(lv_idx.and_then(|i| record.get(i))),
                atrial_appendage: parse_tpm(aa_idx.and_then(|i| record.get(i))),
            };
            table.genes.insert(gene.to_string(), levels);
        }

        if duplicates > 0 {
            debug!("Dropped {} duplicate gene rows from {:?}", duplicates, path);
        }
        info!("Loaded expression for {} genes from {:?}", table.len(), path);

        Ok(table)
    }

    ///
    /// Load the table, or fall back to an empty one (no expression features) with a warning.
    ///
    pub fn from_path_or_empty(path: &Path) -> (Self, bool) {
        match ExpressionTable::from_path(path) {
            Ok(table) => (table, true),
            Err(e) => {
                warn!("{}; continuing without expression features", e);
                (ExpressionTable::new(), false)
            }
        }
    }

    pub fn insert(&mut self, gene: &str, levels: ExpressionLevels) {
        self.genes.entry(gene.to_string()).or_insert(levels);
    }

    pub fn get(&self, gene: &str) -> Option<&ExpressionLevels> {
        self.genes.get(gene)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

///
/// Left join expression levels onto `rows` by gene symbol.
///
/// Row count and order never change. Rows whose symbol is absent from the table keep
/// `expression == None`; filling with zeros is the matrix builder's job.
///
pub fn join_expression(rows: &mut [CandidateRow], table: &ExpressionTable) -> JoinSummary {
    let mut summary = JoinSummary::default();
    for row in rows.iter_mut() {
        row.expression = row.symbol.as_deref().and_then(|s| table.get(s)).copied();
        match row.expression {
            Some(_) => summary.matched += 1,
            None => summary.unmatched += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    use cardiovar_core::models::VariantKey;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn write_table(contents: &str, name: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    fn row(symbol: Option<&str>, pos: u64) -> CandidateRow {
        CandidateRow {
            symbol: symbol.map(String::from),
            ..CandidateRow::new(VariantKey::new("1", pos, "A", "G"))
        }
    }

    #[rstest]
    fn test_load_with_gene_column_and_dedup() {
        let (_dir, path) = write_table(
            "gene,Heart - Left Ventricle,Heart - Atrial Appendage\n\
             MYH7,812.5,240.1\n\
             TTN,95.0,\n\
             MYH7,1.0,1.0\n",
            "gtex.csv",
        );
        let table = ExpressionTable::from_path(&path).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get("MYH7"),
            Some(&ExpressionLevels {
                left_ventricle: Some(812.5),
                atrial_appendage: Some(240.1)
            })
        );
        assert_eq!(table.get("TTN").unwrap().atrial_appendage, None);
    }

    #[rstest]
    #[case("Name\tDescription\tHEART - LEFT VENTRICLE (median)\nENSG1\tTNNT2\t300\n")]
    #[case("Name\tHeart - Left Ventricle\nTNNT2\t300\n")]
    fn test_gene_column_fallbacks(#[case] contents: &str) {
        let (_dir, path) = write_table(contents, "gtex.tsv");
        let table = ExpressionTable::from_path(&path).unwrap();

        assert_eq!(table.get("TNNT2").unwrap().left_ventricle, Some(300.0));
        assert_eq!(table.get("TNNT2").unwrap().atrial_appendage, None);
    }

    #[rstest]
    fn test_missing_gene_column() {
        let (_dir, path) = write_table("symbol,Heart - Left Ventricle\nMYH7,1\n", "gtex.csv");
        let result = ExpressionTable::from_path(&path);
        assert_eq!(matches!(result, Err(ExpressionError::MissingGeneColumn(_))), true);
    }

    #[rstest]
    fn test_missing_tissue_columns() {
        let (_dir, path) = write_table("gene,Liver\nMYH7,1\n", "gtex.csv");
        let result = ExpressionTable::from_path(&path);
        assert_eq!(matches!(result, Err(ExpressionError::MissingTissueColumns(_))), true);
    }

    #[rstest]
    fn test_missing_file_degrades_to_empty() {
        let (table, available) = ExpressionTable::from_path_or_empty(Path::new("no/such/gtex.csv"));
        assert_eq!(available, false);
        assert_eq!(table.is_empty(), true);
    }

    #[rstest]
    fn test_join_is_left_join() {
        let mut table = ExpressionTable::new();
        table.insert(
            "MYH7",
            ExpressionLevels {
                left_ventricle: Some(10.0),
                atrial_appendage: Some(2.0),
            },
        );
        let mut rows = vec![row(Some("MYH7"), 1), row(Some("OTHER"), 2), row(None, 3)];

        let summary = join_expression(&mut rows, &table);

        assert_eq!(rows.len(), 3);
        assert_eq!(summary, JoinSummary { matched: 1, unmatched: 2 });
        assert_eq!(rows[0].heart_lv_tpm(), Some(10.0));
        assert_eq!(rows[1].expression, None);
        assert_eq!(rows[1].heart_lv_tpm(), None);
        assert_eq!(rows[2].heart_aa_tpm(), None);
        assert_eq!(rows.iter().map(|r| r.key.pos).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
