use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cardiovar_core::models::{VariantFeatureRow, VariantKey};

/// Model input names, in the order of [`FeatureVector::values`].
pub const MODEL_FEATURES: [&str; 8] = [
    "gnomADg_AF",
    "heart_lv_tpm",
    "heart_aa_tpm",
    "GERP++_RS",
    "phyloP100way_vertebrate",
    "SIFT_pred",
    "Polyphen2_HVAR_pred",
    "Polyphen2_HDIV_pred",
];

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Variant {0} not found in precomputed features")]
    VariantNotFound(VariantKey),

    #[error("Model weights are missing feature {0}")]
    MissingWeight(String),

    #[error("Scorer does not provide explanations")]
    ExplanationUnavailable,

    #[error("Could not load model from {path:?}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

///
/// Fixed-order model input: five numeric features followed by the three encoded
/// predictions, all default-filled.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub values: [f64; 8],
}

impl From<&VariantFeatureRow> for FeatureVector {
    fn from(row: &VariantFeatureRow) -> Self {
        FeatureVector {
            values: row.model_inputs(),
        }
    }
}

impl FeatureVector {
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        MODEL_FEATURES.iter().copied().zip(self.values.iter().copied())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Contribution {
    pub feature: String,
    pub value: f64,
}

///
/// The pathogenicity model, seen from the outside: a probability for a feature
/// vector and, when the model supports it, per-feature contributions.
///
pub trait Scorer {
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError>;

    fn explain(&self, _features: &FeatureVector) -> Result<Vec<Contribution>, ScoringError> {
        Err(ScoringError::ExplanationUnavailable)
    }
}

///
/// Logistic model over [`MODEL_FEATURES`], loaded from JSON:
///
/// ```json
/// { "intercept": -2.0, "weights": { "gnomADg_AF": -40.0, "SIFT_pred": 1.2, ... } }
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LogisticScorer {
    pub intercept: f64,
    pub weights: FxHashMap<String, f64>,
}

impl LogisticScorer {
    pub fn from_path(path: &Path) -> Result<Self, ScoringError> {
        let contents = read_to_string(path)?;
        let scorer: LogisticScorer =
            serde_json::from_str(&contents).map_err(|source| ScoringError::Model {
                path: path.to_path_buf(),
                source,
            })?;
        scorer.ordered_weights()?;
        Ok(scorer)
    }

    fn ordered_weights(&self) -> Result<[f64; 8], ScoringError> {
        let mut ordered = [0.0; 8];
        for (slot, name) in ordered.iter_mut().zip(MODEL_FEATURES) {
            *slot = *self
                .weights
                .get(name)
                .ok_or_else(|| ScoringError::MissingWeight(name.to_string()))?;
        }
        Ok(ordered)
    }
}

impl Scorer for LogisticScorer {
    fn score(&self, features: &FeatureVector) -> Result<f64, ScoringError> {
        let weights = self.ordered_weights()?;
        let z = self.intercept
            + weights
                .iter()
                .zip(features.values.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        Ok(1.0 / (1.0 + (-z).exp()))
    }

    /// Contributions are `weight * value`, largest magnitude first.
    fn explain(&self, features: &FeatureVector) -> Result<Vec<Contribution>, ScoringError> {
        let weights = self.ordered_weights()?;
        let mut contributions: Vec<Contribution> = features
            .named()
            .zip(weights)
            .map(|((feature, x), w)| Contribution {
                feature: feature.to_string(),
                value: w * x,
            })
            .collect();
        contributions.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));
        Ok(contributions)
    }
}

///
/// Prediction record for one variant, serialised as JSON.
///
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Prediction {
    pub chrom: String,
    pub pos: u64,
    #[serde(rename = "ref")]
    pub ref_allele: String,
    #[serde(rename = "alt")]
    pub alt_allele: String,
    pub prob_pathogenic: f64,
    pub features_used: Vec<String>,
    pub evidence: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributions: Option<Vec<Contribution>>,
}

///
/// Find a precomputed feature row by exact key.
///
pub fn lookup<'a>(rows: &'a [VariantFeatureRow], key: &VariantKey) -> Option<&'a VariantFeatureRow> {
    rows.iter().find(|row| &row.key == key)
}

///
/// Score the row for `key`. Contributions are attached when the scorer can explain
/// itself; a scorer without explanations still yields a prediction.
///
pub fn predict_variant<S: Scorer + ?Sized>(
    scorer: &S,
    rows: &[VariantFeatureRow],
    key: &VariantKey,
) -> Result<Prediction, ScoringError> {
    let row = lookup(rows, key).ok_or_else(|| ScoringError::VariantNotFound(key.clone()))?;
    let features = FeatureVector::from(row);
    let prob_pathogenic = scorer.score(&features)?;
    let contributions = match scorer.explain(&features) {
        Ok(contributions) => Some(contributions),
        Err(ScoringError::ExplanationUnavailable) => None,
        Err(e) => return Err(e),
    };

    Ok(Prediction {
        chrom: row.key.chrom.clone(),
        pos: row.key.pos,
        ref_allele: row.key.ref_allele.clone(),
        alt_allele: row.key.alt_allele.clone(),
        prob_pathogenic,
        features_used: MODEL_FEATURES.iter().map(|f| f.to_string()).collect(),
        evidence: row.evidence.clone(),
        contributions,
    })
}
