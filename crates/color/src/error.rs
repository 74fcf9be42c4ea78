use thiserror::Error;

use crate::range::RangeError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /* mapped errors */
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("One or more required properties missing. Required properties: {0:?}")]
    MissingFields(&'static [&'static str]),

    #[error("Property {0:?} is not a number")]
    NotANumber(&'static str),

    #[error("HSV color must specify at least hue or saturation")]
    InvalidHsv,
}

pub type ColorResult<T> = Result<T, ColorError>;
