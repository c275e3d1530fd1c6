use cardiovar_core::models::{Label, VariantKey};
use cardiovar_vep::AnnotatedVariant;

use crate::expression::ExpressionLevels;

/// Annotation field names read from the canonical transcript annotation.
pub mod fields {
    pub const CONSEQUENCE: &str = "Consequence";
    pub const IMPACT: &str = "IMPACT";
    pub const SYMBOL: &str = "SYMBOL";
    pub const GNOMAD_AF: &str = "gnomADg_AF";
    pub const SIFT_PRED: &str = "SIFT_pred";
    pub const POLYPHEN_HVAR_PRED: &str = "Polyphen2_HVAR_pred";
    pub const POLYPHEN_HDIV_PRED: &str = "Polyphen2_HDIV_pred";
    pub const GERP_RS: &str = "GERP++_RS";
    pub const PHYLOP: &str = "phyloP100way_vertebrate";
}

///
/// A variant on its way into the feature matrix.
///
/// Every field keeps its absence: `None` means the annotation, expression table
/// or label source had nothing for this variant.
///
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    pub key: VariantKey,
    pub id: String,

    pub consequence: Option<String>,
    pub impact: Option<String>,
    pub symbol: Option<String>,

    pub gnomad_af: Option<String>,
    pub gerp_rs: Option<String>,
    pub phylop: Option<String>,

    pub sift_pred: Option<String>,
    pub polyphen_hvar_pred: Option<String>,
    pub polyphen_hdiv_pred: Option<String>,

    pub expression: Option<ExpressionLevels>,
    pub label: Option<Label>,
}

impl CandidateRow {
    pub fn new(key: VariantKey) -> Self {
        CandidateRow {
            key,
            id: String::new(),
            consequence: None,
            impact: None,
            symbol: None,
            gnomad_af: None,
            gerp_rs: None,
            phylop: None,
            sift_pred: None,
            polyphen_hvar_pred: None,
            polyphen_hdiv_pred: None,
            expression: None,
            label: None,
        }
    }

    pub fn heart_lv_tpm(&self) -> Option<f64> {
        self.expression.and_then(|e| e.left_ventricle)
    }

    pub fn heart_aa_tpm(&self) -> Option<f64> {
        self.expression.and_then(|e| e.atrial_appendage)
    }
}

impl From<&AnnotatedVariant<'_>> for CandidateRow {
    fn from(variant: &AnnotatedVariant<'_>) -> Self {
        let a = &variant.annotation;
        let take = |name: &str| a.get(name).map(str::to_string);

        CandidateRow {
            id: variant.id.clone(),
            consequence: take(fields::CONSEQUENCE),
            impact: take(fields::IMPACT),
            symbol: take(fields::SYMBOL),
            gnomad_af: take(fields::GNOMAD_AF),
            gerp_rs: take(fields::GERP_RS),
            phylop: take(fields::PHYLOP),
            sift_pred: take(fields::SIFT_PRED),
            polyphen_hvar_pred: take(fields::POLYPHEN_HVAR_PRED),
            polyphen_hdiv_pred: take(fields::POLYPHEN_HDIV_PRED),
            ..CandidateRow::new(variant.key.clone())
        }
    }
}
