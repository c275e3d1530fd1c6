use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use cardiovar_core::models::{Label, VariantFeatureRow, VariantKey};

use crate::consts::EVIDENCE_SEPARATOR;
use crate::error::{FeatureError, Result};
use crate::labels::ClinicalSignificanceIndex;

/// Column order of the feature table.
pub const FEATURE_TABLE_COLUMNS: [&str; 18] = [
    "chrom",
    "pos",
    "ref",
    "alt",
    "id",
    "Consequence",
    "IMPACT",
    "SYMBOL",
    "gnomADg_AF",
    "heart_lv_tpm",
    "heart_aa_tpm",
    "GERP++_RS",
    "phyloP100way_vertebrate",
    "SIFT_pred",
    "Polyphen2_HVAR_pred",
    "Polyphen2_HDIV_pred",
    "label",
    "evidence",
];

///
/// One line of the feature table as it sits on disk. An absent label is an empty cell.
///
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub chrom: String,
    pub pos: u64,
    #[serde(rename = "ref")]
    pub ref_allele: String,
    #[serde(rename = "alt")]
    pub alt_allele: String,
    pub id: String,
    #[serde(rename = "Consequence")]
    pub consequence: String,
    #[serde(rename = "IMPACT")]
    pub impact: String,
    #[serde(rename = "SYMBOL")]
    pub symbol: String,
    #[serde(rename = "gnomADg_AF")]
    pub gnomad_af: f64,
    pub heart_lv_tpm: f64,
    pub heart_aa_tpm: f64,
    #[serde(rename = "GERP++_RS")]
    pub gerp_rs: f64,
    #[serde(rename = "phyloP100way_vertebrate")]
    pub phylop: f64,
    #[serde(rename = "SIFT_pred")]
    pub sift_pred: u8,
    #[serde(rename = "Polyphen2_HVAR_pred")]
    pub polyphen_hvar_pred: u8,
    #[serde(rename = "Polyphen2_HDIV_pred")]
    pub polyphen_hdiv_pred: u8,
    pub label: Option<u8>,
    pub evidence: String,
}

impl From<&VariantFeatureRow> for FeatureRecord {
    fn from(row: &VariantFeatureRow) -> Self {
        FeatureRecord {
            chrom: row.key.chrom.clone(),
            pos: row.key.pos,
            ref_allele: row.key.ref_allele.clone(),
            alt_allele: row.key.alt_allele.clone(),
            id: row.id.clone(),
            consequence: row.consequence.clone(),
            impact: row.impact.clone(),
            symbol: row.symbol.clone(),
            gnomad_af: row.gnomad_af,
            heart_lv_tpm: row.heart_lv_tpm,
            heart_aa_tpm: row.heart_aa_tpm,
            gerp_rs: row.gerp_rs,
            phylop: row.phylop,
            sift_pred: row.sift_pred,
            polyphen_hvar_pred: row.polyphen_hvar_pred,
            polyphen_hdiv_pred: row.polyphen_hdiv_pred,
            label: row.label.map(Label::as_u8),
            evidence: row.evidence.join(EVIDENCE_SEPARATOR),
        }
    }
}

impl FeatureRecord {
    pub fn key(&self) -> VariantKey {
        VariantKey::new(&self.chrom, self.pos, &self.ref_allele, &self.alt_allele)
    }

    fn into_row(self, path: &Path) -> Result<VariantFeatureRow> {
        let label = match self.label {
            None => None,
            Some(value) => Some(Label::from_u8(value).ok_or_else(|| {
                FeatureError::InvalidTableValue {
                    path: path.to_path_buf(),
                    column: "label".to_string(),
                    value: value.to_string(),
                }
            })?),
        };
        let evidence = self
            .evidence
            .split(EVIDENCE_SEPARATOR)
            .filter(|e| !e.is_empty())
            .map(String::from)
            .collect();

        Ok(VariantFeatureRow {
            key: self.key(),
            id: self.id,
            consequence: self.consequence,
            impact: self.impact,
            symbol: self.symbol,
            gnomad_af: self.gnomad_af,
            heart_lv_tpm: self.heart_lv_tpm,
            heart_aa_tpm: self.heart_aa_tpm,
            gerp_rs: self.gerp_rs,
            phylop: self.phylop,
            sift_pred: self.sift_pred,
            polyphen_hvar_pred: self.polyphen_hvar_pred,
            polyphen_hdiv_pred: self.polyphen_hdiv_pred,
            label,
            evidence,
        })
    }
}

fn table_error(path: &Path) -> impl Fn(csv::Error) -> FeatureError + '_ {
    move |source| FeatureError::Table {
        path: path.to_path_buf(),
        source,
    }
}

///
/// Write feature rows as CSV. The header is always written, so an empty matrix
/// still produces a readable table.
///
pub fn write_feature_table<'a, I>(path: &Path, rows: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a VariantFeatureRow>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(table_error(path))?;
    writer
        .write_record(FEATURE_TABLE_COLUMNS)
        .map_err(table_error(path))?;

    let mut written = 0;
    for row in rows {
        writer
            .serialize(FeatureRecord::from(row))
            .map_err(table_error(path))?;
        written += 1;
    }
    writer.flush()?;

    info!("Wrote {} feature rows to {:?}", written, path);
    Ok(written)
}

///
/// Read a feature table written by [`write_feature_table`].
///
pub fn read_feature_table(path: &Path) -> Result<Vec<VariantFeatureRow>> {
    let mut reader = csv::Reader::from_path(path).map_err(table_error(path))?;
    reader
        .deserialize::<FeatureRecord>()
        .map(|record| record.map_err(table_error(path))?.into_row(path))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelabelSummary {
    pub rows: usize,
    pub labelled: usize,
}

///
/// Rewrite the label column of an existing feature table from a clinical
/// significance index. Rows missing from the index lose any previous label.
///
pub fn relabel(
    input: &Path,
    output: &Path,
    index: &ClinicalSignificanceIndex,
) -> Result<RelabelSummary> {
    let mut rows = read_feature_table(input)?;
    let mut summary = RelabelSummary {
        rows: rows.len(),
        labelled: 0,
    };

    for row in rows.iter_mut() {
        row.label = index.get(&row.key);
        if row.label.is_some() {
            summary.labelled += 1;
        }
    }

    write_feature_table(output, &rows)?;
    info!(
        "Relabelled {} rows ({} with a label) into {:?}",
        summary.rows, summary.labelled, output
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn rows() -> Vec<VariantFeatureRow> {
        vec![
            VariantFeatureRow {
                key: VariantKey::new("14", 23885000, "G", "A"),
                id: "rs121913625".to_string(),
                consequence: "missense_variant".to_string(),
                impact: "MODERATE".to_string(),
                symbol: "MYH7".to_string(),
                gnomad_af: 3.2e-6,
                heart_lv_tpm: 812.5,
                heart_aa_tpm: 240.1,
                gerp_rs: 5.1,
                phylop: 7.9,
                sift_pred: 1,
                polyphen_hvar_pred: 1,
                polyphen_hdiv_pred: 0,
                label: Some(Label::Pathogenic),
                evidence: vec![
                    "Ultra-rare population AF".to_string(),
                    "SIFT damaging".to_string(),
                ],
            },
            VariantFeatureRow {
                key: VariantKey::new("1", 10, "A", "T"),
                id: ".".to_string(),
                consequence: String::new(),
                impact: String::new(),
                symbol: String::new(),
                gnomad_af: 0.0,
                heart_lv_tpm: 0.0,
                heart_aa_tpm: 0.0,
                gerp_rs: 0.0,
                phylop: 0.0,
                sift_pred: 0,
                polyphen_hvar_pred: 0,
                polyphen_hdiv_pred: 0,
                label: None,
                evidence: vec![],
            },
        ]
    }

    #[rstest]
    fn test_write_then_read(rows: Vec<VariantFeatureRow>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");

        let written = write_feature_table(&path, &rows).unwrap();
        assert_eq!(written, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(header, FEATURE_TABLE_COLUMNS.join(","));
        // absent label is an empty cell
        assert_eq!(contents.lines().nth(2).unwrap().ends_with(",0,0,0,,"), true);

        let back = read_feature_table(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[rstest]
    fn test_empty_table_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");

        write_feature_table(&path, &Vec::<VariantFeatureRow>::new()).unwrap();
        let back = read_feature_table(&path).unwrap();

        assert_eq!(back.is_empty(), true);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap().trim_end(),
            FEATURE_TABLE_COLUMNS.join(",")
        );
    }

    #[rstest]
    fn test_invalid_label_is_rejected(rows: Vec<VariantFeatureRow>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");
        write_feature_table(&path, &rows[..1]).unwrap();

        let contents = std::fs::read_to_string(&path)
            .unwrap()
            .replace(",1,Ultra-rare", ",7,Ultra-rare");
        std::fs::write(&path, contents).unwrap();

        let result = read_feature_table(&path);
        assert_eq!(
            matches!(result, Err(FeatureError::InvalidTableValue { .. })),
            true
        );
    }

    #[rstest]
    fn test_relabel(rows: Vec<VariantFeatureRow>) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("features.csv");
        let output = dir.path().join("relabelled.csv");
        write_feature_table(&input, &rows).unwrap();

        let mut index = ClinicalSignificanceIndex::default();
        index.insert(VariantKey::new("1", 10, "A", "T"), Label::Benign);

        let summary = relabel(&input, &output, &index).unwrap();
        assert_eq!(summary, RelabelSummary { rows: 2, labelled: 1 });

        let back = read_feature_table(&output).unwrap();
        assert_eq!(back[0].label, None);
        assert_eq!(back[1].label, Some(Label::Benign));
        assert_eq!(back[0].evidence, rows[0].evidence);
    }
}
