use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /* mapped errors */
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    SerdeYaml(#[from] serde_yml::Error),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),

    #[error(transparent)]
    SetLoggerError(#[from] log::SetLoggerError),

    #[error(transparent)]
    ClapStdinError(#[from] clap_stdin::StdinError),

    #[error(transparent)]
    ColorError(#[from] color::error::ColorError),

    #[error(transparent)]
    RangeError(#[from] color::range::RangeError),

    #[error(transparent)]
    Z2mError(#[from] z2m::error::Z2mError),

    /* capability errors */
    #[error("Device has no capability {0:?}")]
    UnknownCapability(String),

    #[error("Capability {0:?} cannot be set")]
    ReadOnlyCapability(String),

    #[error("Invalid value for {0:?}: {1}")]
    InvalidValue(String, serde_json::Value),

    #[error("Capability for {0:?} has no value range")]
    MissingRange(String),

    #[error("Missing option {0:?} for setting {1:?}")]
    MissingOption(&'static str, String),

    /* device errors */
    #[error("Device {0} not found")]
    DeviceNotFound(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
