//! # cardiovar-core
//!
//! Shared data model and line readers for the cardiovar crates.
//!
//! - [`models::VariantKey`]: the `(chrom, pos, ref, alt)` join key used across every component
//! - [`models::AnnotationSchema`] / [`models::AnnotationRecord`]: header-declared annotation fields
//!   and one transcript-level annotation decoded against them
//! - [`models::VariantFeatureRow`]: one finished row of the feature table
//! - [`utils::RecordStream`]: lossy line reader over plain or gzip compressed files
//!
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::*;

pub mod consts {
    /// Comment/header prefix of variant files.
    pub const COMMENT_PREFIX: char = '#';
    /// Minimum number of tab-separated columns in a variant data line (through INFO).
    pub const MIN_VCF_COLUMNS: usize = 8;
    /// Zero-based index of the INFO column.
    pub const INFO_COLUMN: usize = 7;
    pub const MISSING_VALUE: &str = ".";
}
