use std::path::{Path, PathBuf};

use log::{info, warn};

use cardiovar_vep::{AnnotatedVcf, ParseReport};

use crate::builder::FeatureMatrixBuilder;
use crate::candidate::CandidateRow;
use crate::config::FeatureConfig;
use crate::error::Result;
use crate::expression::{ExpressionTable, JoinSummary, join_expression};
use crate::labels::{ClinicalSignificanceIndex, LabelReport, attach_labels};
use crate::table::write_feature_table;

///
/// Inputs of one feature-table build. Expression and clinical significance sources
/// are optional; without them the matching columns are default-filled and no
/// label is set.
///
#[derive(Debug, Clone)]
pub struct FeatureInputs {
    pub annotated: PathBuf,
    pub expression: Option<PathBuf>,
    pub clinical: Option<PathBuf>,
    pub output: PathBuf,
    pub config: FeatureConfig,
}

impl FeatureInputs {
    pub fn new(annotated: &Path, output: &Path) -> Self {
        FeatureInputs {
            annotated: annotated.to_path_buf(),
            expression: None,
            clinical: None,
            output: output.to_path_buf(),
            config: FeatureConfig::default(),
        }
    }
}

/// What happened during a feature-table build.
#[derive(Debug, Clone, Default)]
pub struct FeatureRun {
    pub parse: ParseReport,
    pub expression_available: bool,
    pub join: JoinSummary,
    pub labels: Option<LabelReport>,
    pub labelled: usize,
    pub duplicates_skipped: usize,
    pub rows_written: usize,
}

///
/// Stream every annotated variant into a [`CandidateRow`], keeping the reader's
/// parse report.
///
pub fn collect_candidates(vcf: &AnnotatedVcf) -> Result<(Vec<CandidateRow>, ParseReport)> {
    let mut reader = vcf.variants()?;
    let mut rows = Vec::new();
    for variant in reader.by_ref() {
        rows.push(CandidateRow::from(&variant?));
    }
    Ok((rows, reader.report().clone()))
}

///
/// Build the feature table: parse, join expression, attach labels, encode and
/// write. Each cache (expression table, clinical index) is built once here and
/// handed to the step that needs it.
///
pub fn build_features(inputs: &FeatureInputs) -> Result<FeatureRun> {
    let mut run = FeatureRun::default();

    let vcf = AnnotatedVcf::open(&inputs.annotated)?;
    let (mut rows, parse) = collect_candidates(&vcf)?;
    if parse.skipped_units() > 0 {
        warn!("{}", parse);
    } else {
        info!("{}", parse);
    }
    run.parse = parse;

    let table = match &inputs.expression {
        Some(path) => {
            let (table, available) = ExpressionTable::from_path_or_empty(path);
            run.expression_available = available;
            table
        }
        None => ExpressionTable::new(),
    };
    run.join = join_expression(&mut rows, &table);
    info!(
        "Expression joined for {} of {} variants",
        run.join.matched,
        rows.len()
    );

    if let Some(path) = &inputs.clinical {
        let index = ClinicalSignificanceIndex::from_path(path)?;
        run.labelled = attach_labels(&mut rows, &index);
        run.labels = Some(index.report().clone());
        info!("Labelled {} of {} variants", run.labelled, rows.len());
    }

    let matrix = FeatureMatrixBuilder::new(inputs.config.clone()).build(rows);
    if matrix.duplicates_skipped > 0 {
        warn!(
            "Skipped {} duplicate variant rows (first occurrence kept)",
            matrix.duplicates_skipped
        );
    }
    run.duplicates_skipped = matrix.duplicates_skipped;
    run.rows_written = write_feature_table(&inputs.output, &matrix.rows)?;

    Ok(run)
}
