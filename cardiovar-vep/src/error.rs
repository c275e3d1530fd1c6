use thiserror::Error;

use cardiovar_core::CoreError;

#[derive(Error, Debug)]
pub enum VepError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VepError>;
