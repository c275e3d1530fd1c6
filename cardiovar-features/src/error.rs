use std::path::PathBuf;

use thiserror::Error;

use cardiovar_core::CoreError;
use cardiovar_vep::VepError;

use crate::config::FeatureConfigError;

#[derive(Error, Debug)]
pub enum FeatureError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Vep(#[from] VepError),

    #[error(transparent)]
    Config(#[from] FeatureConfigError),

    #[error("Feature table error in {path:?}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path:?} has no {column} column")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid value {value:?} in column {column} of {path:?}")]
    InvalidTableValue {
        path: PathBuf,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FeatureError>;
