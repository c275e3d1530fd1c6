use std::path::Path;

use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info};

use cardiovar_core::consts::{COMMENT_PREFIX, INFO_COLUMN, MIN_VCF_COLUMNS};
use cardiovar_core::models::{Label, VariantKey};
use cardiovar_core::utils::{RecordStream, info_value};

use crate::candidate::CandidateRow;
use crate::consts::CLNSIG_INFO_KEY;
use crate::error::Result;

const PATHOGENIC_TERMS: [&str; 2] = ["Pathogenic", "Likely_pathogenic"];
const BENIGN_TERMS: [&str; 2] = ["Benign", "Likely_benign"];

///
/// Resolve a set of clinical significance terms to a label.
///
/// This is a set-membership test, not first-match: any pathogenic term gives
/// [`Label::Pathogenic`]; otherwise any benign term gives [`Label::Benign`]; otherwise
/// no label. A set holding both pathogenic and benign terms resolves to pathogenic.
///
pub fn resolve_significance(terms: &FxHashSet<&str>) -> Option<Label> {
    if PATHOGENIC_TERMS.iter().any(|t| terms.contains(t)) {
        Some(Label::Pathogenic)
    } else if BENIGN_TERMS.iter().any(|t| terms.contains(t)) {
        Some(Label::Benign)
    } else {
        None
    }
}

///
/// Split a raw `CLNSIG` value (`Pathogenic,Benign`) into its term set.
///
pub fn significance_terms(value: &str) -> FxHashSet<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelReport {
    pub data_lines: usize,
    pub malformed_lines: usize,
    pub without_significance: usize,
    /// Lines whose terms resolved to no label (uncertain significance, conflicting, ...).
    pub unresolved: usize,
    /// Keys seen again later in the file; the later line wins.
    pub overwritten: usize,
}

///
/// Variant key to training label, built once from a clinical significance file.
///
#[derive(Debug, Default, Clone)]
pub struct ClinicalSignificanceIndex {
    labels: FxHashMap<VariantKey, Label>,
    report: LabelReport,
}

impl ClinicalSignificanceIndex {
    ///
    /// Build the index from a variant file whose INFO column carries `CLNSIG`.
    ///
    /// Only resolved labels are stored; uncertain variants stay out of the index.
    /// For a key repeated across lines the last resolved line wins.
    ///
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut index = ClinicalSignificanceIndex::default();

        for line in RecordStream::from_path(path)? {
            let line = line?;
            if line.starts_with(COMMENT_PREFIX) || line.is_empty() {
                continue;
            }
            index.report.data_lines += 1;

            let columns: Vec<&str> = line.splitn(MIN_VCF_COLUMNS + 1, '\t').collect();
            if columns.len() < MIN_VCF_COLUMNS {
                index.report.malformed_lines += 1;
                continue;
            }
            let key = match VariantKey::from_columns(&columns) {
                Ok(key) => key,
                Err(e) => {
                    debug!("Skipping clinical significance line: {}", e);
                    index.report.malformed_lines += 1;
                    continue;
                }
            };
            let Some(value) = info_value(columns[INFO_COLUMN], CLNSIG_INFO_KEY) else {
                index.report.without_significance += 1;
                continue;
            };

            match resolve_significance(&significance_terms(value)) {
                Some(label) => index.insert(key, label),
                None => index.report.unresolved += 1,
            }
        }

        info!(
            "Indexed {} labelled variants from {:?} ({} unresolved, {} malformed lines)",
            index.len(),
            path,
            index.report.unresolved,
            index.report.malformed_lines
        );

        Ok(index)
    }

    pub fn insert(&mut self, key: VariantKey, label: Label) {
        if self.labels.insert(key, label).is_some() {
            self.report.overwritten += 1;
        }
    }

    pub fn get(&self, key: &VariantKey) -> Option<Label> {
        self.labels.get(key).copied()
    }

    pub fn report(&self) -> &LabelReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

///
/// Set each row's label by exact key lookup. Returns the number of labelled rows;
/// rows absent from the index stay unlabelled.
///
pub fn attach_labels(rows: &mut [CandidateRow], index: &ClinicalSignificanceIndex) -> usize {
    let mut labelled = 0;
    for row in rows.iter_mut() {
        row.label = index.get(&row.key);
        if row.label.is_some() {
            labelled += 1;
        }
    }
    labelled
}
