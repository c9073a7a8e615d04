use thiserror::Error;

#[derive(Error, Debug)]
pub enum FirError {
    #[error("tap count mismatch: expected {expected}, got {actual}")]
    TapCountMismatch { expected: usize, actual: usize },

    #[error("tap index {index} out of range for {len}-tap filter")]
    TapIndexOutOfRange { index: usize, len: usize },

    #[error("tap set error: {0}")]
    TapSet(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FirError>;
