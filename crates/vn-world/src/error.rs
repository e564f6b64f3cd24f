use thiserror::Error;

use vn_core::BlockPos;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world parse error: {0}")]
    Parse(String),

    #[error("block {0} lies outside the world bounds")]
    OutOfBounds(BlockPos),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorldResult<T> = Result<T, WorldError>;
