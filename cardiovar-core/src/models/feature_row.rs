use std::fmt::{self, Display};

use super::variant::VariantKey;

///
/// Training label derived from clinical significance. Variants without a label are
/// variants of uncertain significance.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub enum Label {
    Benign = 0,
    Pathogenic = 1,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Label::Benign),
            1 => Some(Label::Pathogenic),
            _ => None,
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

///
/// One finished row of the feature table.
///
/// Numeric features are default-filled (missing became `0.0`) and the effect
/// predictions are encoded to `0`/`1`. Built once by the feature matrix builder,
/// then only serialized.
///
#[derive(Debug, Clone, PartialEq)]
pub struct VariantFeatureRow {
    pub key: VariantKey,
    pub id: String,

    pub consequence: String,
    pub impact: String,
    pub symbol: String,

    pub gnomad_af: f64,
    pub heart_lv_tpm: f64,
    pub heart_aa_tpm: f64,
    pub gerp_rs: f64,
    pub phylop: f64,

    pub sift_pred: u8,
    pub polyphen_hvar_pred: u8,
    pub polyphen_hdiv_pred: u8,

    pub label: Option<Label>,
    pub evidence: Vec<String>,
}

impl VariantFeatureRow {
    /// Model input in fixed order: numeric features then encoded predictions.
    pub fn model_inputs(&self) -> [f64; 8] {
        [
            self.gnomad_af,
            self.heart_lv_tpm,
            self.heart_aa_tpm,
            self.gerp_rs,
            self.phylop,
            f64::from(self.sift_pred),
            f64::from(self.polyphen_hvar_pred),
            f64::from(self.polyphen_hdiv_pred),
        ]
    }
}
