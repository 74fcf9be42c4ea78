use thiserror::Error;

#[derive(Error, Debug)]
pub enum Z2mError {
    /* mapped errors */
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error("Property path {0:?} mixes array indices and object keys")]
    PathConflict(String),

    #[error("Array index too large in property path {0:?}")]
    IndexTooLarge(String),
}

pub type Z2mResult<T> = Result<T, Z2mError>;
