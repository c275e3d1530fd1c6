//! # cardiovar
//!
//! Umbrella crate over the cardiovar components. Each component sits behind a
//! feature of the same name:
//!
//! - `core`: variant keys, annotation records, feature rows, the cardiac gene panel
//! - `vep`: annotated variant file reading and canonical transcript selection
//! - `features`: feature matrix construction, labels, expression joins, scoring
//! - `subset`: per-chromosome reference shard subsetting with tabix output
//!
#[cfg(feature = "core")]
#[doc(inline)]
pub use cardiovar_core as core;

#[cfg(feature = "vep")]
#[doc(inline)]
pub use cardiovar_vep as vep;

#[cfg(feature = "features")]
#[doc(inline)]
pub use cardiovar_features as features;

#[cfg(feature = "subset")]
#[doc(inline)]
pub use cardiovar_subset as subset;
