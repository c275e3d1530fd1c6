use std::path::PathBuf;

use thiserror::Error;

use cardiovar_core::CoreError;

#[derive(Error, Debug)]
pub enum SubsetError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("No reference shard for chromosome {chrom}; searched {searched:?}")]
    ShardNotFound { chrom: String, searched: Vec<PathBuf> },

    #[error("No variants found in {path:?}; nothing to do")]
    NoVariants { path: PathBuf },

    #[error(
        "No matching reference records found in {shards_scanned} shard(s); check chromosome naming and allele representation"
    )]
    NoMatchingRecords { shards_scanned: usize },

    #[error("Reference shard {path:?} has no tab-delimited header line")]
    InvalidHeader { path: PathBuf },

    #[error("Could not index record at {chrom}:{pos}")]
    InvalidIndexPosition { chrom: String, pos: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SubsetError>;
