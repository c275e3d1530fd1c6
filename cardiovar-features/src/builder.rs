use fxhash::FxHashSet;
use log::debug;

use cardiovar_core::models::{VariantFeatureRow, VariantKey};

use crate::candidate::CandidateRow;
use crate::config::{EvidenceThresholds, FeatureConfig};

///
/// Encode an effect prediction: `D`, `P`, `A` are damaging (1); `T`, `B`, `N` are
/// tolerated (0). Anything else, including a missing value, is 0.
///
pub fn encode_prediction(value: Option<&str>) -> u8 {
    match value.map(str::trim) {
        Some("D") | Some("P") | Some("A") => 1,
        Some("T") | Some("B") | Some("N") => 0,
        _ => 0,
    }
}

///
/// Parse a numeric annotation value. Non-numeric, non-finite and missing values are `None`.
///
pub fn parse_numeric(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

///
/// Rows of the finished feature table, one per variant key.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    pub rows: Vec<VariantFeatureRow>,
    /// Rows dropped because an earlier row had the same key.
    pub duplicates_skipped: usize,
}

impl FeatureMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labelled(&self) -> usize {
        self.rows.iter().filter(|r| r.label.is_some()).count()
    }
}

///
/// Combines a candidate's annotation fields, expression levels and label into a
/// [`VariantFeatureRow`]. This is the only place where missing values are filled.
///
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrixBuilder {
    config: FeatureConfig,
}

impl FeatureMatrixBuilder {
    pub fn new(config: FeatureConfig) -> Self {
        FeatureMatrixBuilder { config }
    }

    pub fn thresholds(&self) -> &EvidenceThresholds {
        &self.config.evidence
    }

    pub fn build_row(&self, row: CandidateRow) -> VariantFeatureRow {
        let gnomad_af = parse_numeric(row.gnomad_af.as_deref());
        let gerp_rs = parse_numeric(row.gerp_rs.as_deref());
        let phylop = parse_numeric(row.phylop.as_deref());

        let sift_pred = encode_prediction(row.sift_pred.as_deref());
        let polyphen_hvar_pred = encode_prediction(row.polyphen_hvar_pred.as_deref());
        let polyphen_hdiv_pred = encode_prediction(row.polyphen_hdiv_pred.as_deref());

        let evidence = self.evidence(
            gnomad_af,
            gerp_rs,
            phylop,
            [sift_pred, polyphen_hvar_pred, polyphen_hdiv_pred],
        );

        VariantFeatureRow {
            heart_lv_tpm: row.heart_lv_tpm().unwrap_or(0.0),
            heart_aa_tpm: row.heart_aa_tpm().unwrap_or(0.0),
            key: row.key,
            id: row.id,
            consequence: row.consequence.unwrap_or_default(),
            impact: row.impact.unwrap_or_default(),
            symbol: row.symbol.unwrap_or_default(),
            gnomad_af: gnomad_af.unwrap_or(0.0),
            gerp_rs: gerp_rs.unwrap_or(0.0),
            phylop: phylop.unwrap_or(0.0),
            sift_pred,
            polyphen_hvar_pred,
            polyphen_hdiv_pred,
            label: row.label,
            evidence,
        }
    }

    ///
    /// Qualitative signals for human review, from observed values only: a missing AF
    /// or conservation score contributes no signal.
    ///
    fn evidence(
        &self,
        gnomad_af: Option<f64>,
        gerp_rs: Option<f64>,
        phylop: Option<f64>,
        [sift, hvar, hdiv]: [u8; 3],
    ) -> Vec<String> {
        let t = self.thresholds();
        let mut evidence = Vec::new();

        if let Some(af) = gnomad_af {
            if af < t.ultra_rare_af {
                evidence.push("Ultra-rare population AF".to_string());
            } else if af < t.very_low_af {
                evidence.push("Very low population AF".to_string());
            } else if af < t.low_af {
                evidence.push("Low population AF (possibly common)".to_string());
            }
        }
        if phylop.is_some_and(|p| p > t.conservation) {
            evidence.push("High phyloP conservation".to_string());
        }
        if gerp_rs.is_some_and(|g| g > t.conservation) {
            evidence.push("High GERP++ constraint".to_string());
        }
        if sift == 1 {
            evidence.push("SIFT damaging".to_string());
        }
        if hvar == 1 {
            evidence.push("PolyPhen2 (HVAR) possibly/probably damaging".to_string());
        }
        if hdiv == 1 {
            evidence.push("PolyPhen2 (HDIV) possibly/probably damaging".to_string());
        }

        evidence
    }

    ///
    /// Build the matrix from candidates, in input order.
    ///
    pub fn build<I>(&self, rows: I) -> FeatureMatrix
    where
        I: IntoIterator<Item = CandidateRow>,
    {
        collect_rows(rows.into_iter().map(|row| self.build_row(row)))
    }
}

///
/// Assemble finished rows into a matrix, keeping the first row for each key.
///
pub fn collect_rows<I>(rows: I) -> FeatureMatrix
where
    I: IntoIterator<Item = VariantFeatureRow>,
{
    let mut seen: FxHashSet<VariantKey> = FxHashSet::default();
    let mut matrix = FeatureMatrix::default();

    for row in rows {
        if seen.contains(&row.key) {
            debug!("Duplicate variant {} skipped", row.key);
            matrix.duplicates_skipped += 1;
            continue;
        }
        seen.insert(row.key.clone());
        matrix.rows.push(row);
    }

    matrix
}
