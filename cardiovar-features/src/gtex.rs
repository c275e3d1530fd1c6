//! Heart subset of a GTEx gene TPM matrix.
//!
//! The GCT matrix has two metadata lines (`#1.2`, then the dimensions), a tab
//! separated header `Name Description <SAMPID>...` and one row per gene. The sample
//! attribute table maps each `SAMPID` to its detailed tissue (`SMTSD`).

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use fxhash::{FxHashMap, FxHashSet};
use log::{info, warn};

use cardiovar_core::utils::get_dynamic_reader;

use crate::consts::GENE_COLUMN;
use crate::error::{FeatureError, Result};

pub const HEART_TISSUES: [&str; 2] = ["Heart - Atrial Appendage", "Heart - Left Ventricle"];

const GCT_METADATA_LINES: usize = 2;
const SAMPLE_ID_COLUMN: &str = "SAMPID";
const TISSUE_DETAIL_COLUMN: &str = "SMTSD";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GtexSummary {
    /// Target genes with at least one row in the matrix.
    pub genes_found: usize,
    /// Heart samples that went into the medians; zero when no attributes were used.
    pub heart_samples: usize,
    pub medians: bool,
}

fn table_error(path: &Path) -> impl Fn(csv::Error) -> FeatureError + '_ {
    move |source| FeatureError::Table {
        path: path.to_path_buf(),
        source,
    }
}

fn missing_column(path: &Path, column: &str) -> FeatureError {
    FeatureError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    }
}

///
/// Map heart sample ids to their tissue name.
///
fn heart_samples(path: &Path) -> Result<FxHashMap<String, &'static str>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(path)
        .map_err(table_error(path))?;
    let headers = reader.headers().map_err(table_error(path))?.clone();
    let sample_idx = headers
        .iter()
        .position(|h| h == SAMPLE_ID_COLUMN)
        .ok_or_else(|| missing_column(path, SAMPLE_ID_COLUMN))?;
    let tissue_idx = headers
        .iter()
        .position(|h| h == TISSUE_DETAIL_COLUMN)
        .ok_or_else(|| missing_column(path, TISSUE_DETAIL_COLUMN))?;

    let mut samples = FxHashMap::default();
    for record in reader.records() {
        let record = record.map_err(table_error(path))?;
        let (Some(sample), Some(tissue)) = (record.get(sample_idx), record.get(tissue_idx)) else {
            continue;
        };
        if let Some(tissue) = HEART_TISSUES.iter().find(|t| **t == tissue) {
            samples.insert(sample.to_string(), *tissue);
        }
    }
    Ok(samples)
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(match values.len() % 2 {
        0 => (values[mid - 1] + values[mid]) / 2.0,
        _ => values[mid],
    })
}

///
/// Keep the rows of a GTEx GCT matrix whose `Description` is one of `genes`.
///
/// With a sample attribute file, write `gene` plus the median TPM of each heart
/// tissue, one row per target gene in `genes` order (empty cells when a gene has no
/// heart samples). Without one, or when the attribute file does not exist, the
/// filtered matrix is written unchanged.
///
pub fn extract_heart_expression(
    gct: &Path,
    attributes: Option<&Path>,
    genes: &[&str],
    output: &Path,
) -> Result<GtexSummary> {
    let mut reader = get_dynamic_reader(gct)?;
    let mut skipped = String::new();
    for _ in 0..GCT_METADATA_LINES {
        skipped.clear();
        reader.read_line(&mut skipped)?;
    }

    let mut matrix = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);
    let headers = matrix.headers().map_err(table_error(gct))?.clone();
    if headers.len() < 2 {
        return Err(missing_column(gct, "Description"));
    }
    let name_idx = headers.iter().position(|h| h == "Name").unwrap_or(0);
    let desc_idx = headers.iter().position(|h| h == "Description").unwrap_or(1);

    let targets: FxHashSet<&str> = genes.iter().copied().collect();
    let mut rows = Vec::new();
    for record in matrix.records() {
        let record = record.map_err(table_error(gct))?;
        if record.get(desc_idx).is_some_and(|g| targets.contains(g)) {
            rows.push(record);
        }
    }
    let found: FxHashSet<&str> = rows.iter().filter_map(|r| r.get(desc_idx)).collect();

    let mut summary = GtexSummary {
        genes_found: found.len(),
        ..GtexSummary::default()
    };

    let attributes = match attributes {
        Some(path) if path.exists() => Some(path),
        Some(path) => {
            warn!("Sample attributes {:?} not found; writing unsummarised rows", path);
            None
        }
        None => None,
    };

    let mut writer = csv::Writer::from_path(output).map_err(table_error(output))?;

    match attributes {
        Some(path) => {
            let samples = heart_samples(path)?;
            let sample_columns: Vec<(usize, &str)> = headers
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != name_idx && *i != desc_idx)
                .filter_map(|(i, sample)| samples.get(sample).map(|tissue| (i, *tissue)))
                .collect();
            summary.heart_samples = sample_columns.len();
            summary.medians = true;

            let mut tpm: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
            for row in &rows {
                let Some(gene) = row.get(desc_idx) else {
                    continue;
                };
                for (i, tissue) in &sample_columns {
                    if let Some(value) = row.get(*i).and_then(|v| v.trim().parse::<f64>().ok()) {
                        tpm.entry((gene, *tissue)).or_default().push(value);
                    }
                }
            }

            let mut header = vec![GENE_COLUMN];
            header.extend(HEART_TISSUES);
            writer.write_record(&header).map_err(table_error(output))?;

            for gene in genes {
                let mut record = vec![gene.to_string()];
                for tissue in HEART_TISSUES {
                    let cell = tpm
                        .get_mut(&(*gene, tissue))
                        .and_then(|values| median(values))
                        .map(|m| m.to_string())
                        .unwrap_or_default();
                    record.push(cell);
                }
                writer.write_record(&record).map_err(table_error(output))?;
            }
        }
        None => {
            writer.write_record(&headers).map_err(table_error(output))?;
            for row in &rows {
                writer.write_record(row).map_err(table_error(output))?;
            }
        }
    }
    writer.flush()?;

    info!(
        "Extracted heart expression for {} of {} genes into {:?}",
        summary.genes_found,
        genes.len(),
        output
    );
    Ok(summary)
}
