//! # cardiovar-subset
//!
//! Builds a small, indexed extract of a large per-chromosome reference resource
//! (dbNSFP and friends) holding only the rows an input variant file needs.
//!
//! 1. [`NeededVariants`]: `(pos, ref, alt)` triples per chromosome, from the variant file
//! 2. [`ReferenceShardCatalog`]: chromosome to shard file
//! 3. [`ReferenceSubsetExtractor`]: scan each shard once, keep matching rows
//! 4. [`IndexedTsvWriter`]: bgzip the merged rows and write a tabix index next to them
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use cardiovar_subset::{NeededVariants, ReferenceShardCatalog, ReferenceSubsetExtractor};
//!
//! let needed = NeededVariants::from_path(Path::new("cardiac_genes.vcf.gz")).unwrap();
//! let catalog = ReferenceShardCatalog::new(Path::new("resources/dbnsfp"));
//! let report = ReferenceSubsetExtractor::new(catalog)
//!     .extract(&needed, Path::new("resources/dbNSFP4.4a.txt.gz"))
//!     .unwrap();
//! println!("{} rows written", report.rows_written);
//! ```
//!
pub mod catalog;
pub mod error;
pub mod extract;
pub mod index;
pub mod needed;

// re-exports
pub use catalog::*;
pub use error::*;
pub use extract::*;
pub use index::*;
pub use needed::*;

pub mod consts {
    /// Placeholder for the normalized chromosome name in shard file name templates.
    pub const CHROM_PLACEHOLDER: &str = "{chrom}";
    pub const DEFAULT_SHARD_TEMPLATES: [&str; 2] = [
        "dbNSFP4.4a_variant.chr{chrom}.gz",
        "dbNSFP4.4a/dbNSFP4.4a_variant.chr{chrom}.gz",
    ];
    /// Shard columns (0-based): chromosome, position, reference, alternate.
    pub const SHARD_CHROM_COLUMN: usize = 0;
    pub const SHARD_POS_COLUMN: usize = 1;
    pub const SHARD_REF_COLUMN: usize = 2;
    pub const SHARD_ALT_COLUMN: usize = 3;
    pub const TABIX_EXTENSION: &str = "tbi";
}
