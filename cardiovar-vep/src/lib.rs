//! # cardiovar-vep
//!
//! Reads variant files annotated by an external consequence predictor (Ensembl VEP
//! or anything emitting the same `CSQ` layout) and reduces each variant to one
//! representative transcript annotation.
//!
//! The annotation subfield names are not known at compile time: they are declared by a
//! header line such as
//!
//! ```text
//! ##INFO=<ID=CSQ,Number=.,Type=String,Description="Consequence annotations from Ensembl VEP. Format: Allele|Consequence|SYMBOL|CANONICAL">
//! ```
//!
//! and every data line carries `CSQ=` with one comma separated block per transcript, each
//! block pipe separated in header order.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use cardiovar_vep::AnnotatedVcf;
//!
//! let vcf = AnnotatedVcf::open(Path::new("annotated.vep.vcf.gz")).unwrap();
//! let mut reader = vcf.variants().unwrap();
//! for variant in reader.by_ref() {
//!     let variant = variant.unwrap();
//!     println!("{} {:?}", variant.key, variant.annotation.get("SYMBOL"));
//! }
//! println!("{}", reader.report());
//! ```
//!
pub mod annotator;
pub mod canonical;
pub mod decode;
pub mod error;
pub mod inspect;
pub mod reader;
pub mod schema;

// re-exports
pub use annotator::*;
pub use canonical::*;
pub use decode::*;
pub use error::*;
pub use reader::*;
pub use schema::*;

pub mod consts {
    /// Header line prefix declaring the CSQ subfield list.
    pub const CSQ_HEADER_MARKER: &str = "##INFO=<ID=CSQ";
    /// INFO key carrying the annotation payload.
    pub const CSQ_INFO_KEY: &str = "CSQ";
    /// Header line that ends the meta-information section.
    pub const COLUMN_HEADER_PREFIX: &str = "#CHROM";
    pub const CANONICAL_FIELD: &str = "CANONICAL";
    pub const CANONICAL_FLAG: &str = "YES";
}
