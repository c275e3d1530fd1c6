//! # cardiovar-features
//!
//! Turns annotated variants into a row-per-variant feature table.
//!
//! ## Pipeline
//!
//! 1. [`CandidateRow`]: the canonical annotation's raw fields, one per variant
//! 2. [`join_expression`]: left join of heart expression levels by gene symbol
//! 3. [`attach_labels`]: training label from a [`ClinicalSignificanceIndex`]
//! 4. [`FeatureMatrixBuilder`]: encoding, default fill and evidence signals
//! 5. [`write_feature_table`]: CSV output
//!
//! Absent values stay absent through steps 1-3. Only the matrix builder fills
//! missing numerics with `0.0` and unknown predictions with `0`.
//!
pub mod builder;
pub mod candidate;
pub mod config;
pub mod error;
pub mod expression;
pub mod gtex;
pub mod labels;
pub mod pipeline;
pub mod scoring;
pub mod table;

// re-exports
pub use builder::*;
pub use candidate::*;
pub use config::*;
pub use error::*;
pub use expression::*;
pub use labels::*;
pub use pipeline::*;
pub use scoring::*;
pub use table::*;

pub mod consts {
    /// INFO key holding ClinVar clinical significance terms.
    pub const CLNSIG_INFO_KEY: &str = "CLNSIG";
    pub const GENE_COLUMN: &str = "gene";
    pub const LEFT_VENTRICLE_PREFIX: &str = "heart - left ventricle";
    pub const ATRIAL_APPENDAGE_PREFIX: &str = "heart - atrial appendage";
    pub const EVIDENCE_SEPARATOR: &str = ";";
}
