pub mod annotation;
pub mod feature_row;
pub mod panel;
pub mod variant;

// re-export for cleaner imports
pub use self::annotation::{AnnotationRecord, AnnotationSchema};
pub use self::feature_row::{Label, VariantFeatureRow};
pub use self::panel::{BedWrite, GenePanel, GeneSpan};
pub use self::variant::VariantKey;
