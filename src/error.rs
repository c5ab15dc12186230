use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("machine {index} is invalid: {reason}")]
    InvalidMachine { index: usize, reason: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("machine {index} has {lights} indicator lights, at most {max} are supported")]
    TooManyLights {
        index: usize,
        lights: usize,
        max: usize,
    },
}
