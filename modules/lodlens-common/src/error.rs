use thiserror::Error;

pub type Result<T> = std::result::Result<T, LodLensError>;

#[derive(Error, Debug)]
pub enum LodLensError {
    #[error("Predicate dictionary error: {0}")]
    Dictionary(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
