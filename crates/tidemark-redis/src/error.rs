use thiserror::Error;

use tidemark_core::StoreError;

#[derive(Debug, Error)]
pub enum RedisError {
    #[error("redis error: {0}")]
    Redis(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("invalid target address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("unsupported target: {0}")]
    Unsupported(String),

    #[error("invalid keyspace line: {0}")]
    InvalidKeyspace(String),

    #[error(transparent)]
    Checkpoint(#[from] tidemark_core::Error),
}

impl From<redis::RedisError> for RedisError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_connection_refusal() || e.is_io_error() || e.is_connection_dropped() {
            RedisError::Connection(e.to_string())
        } else {
            RedisError::Redis(e.to_string())
        }
    }
}

impl From<RedisError> for StoreError {
    fn from(e: RedisError) -> Self {
        match e {
            RedisError::Connection(msg) => StoreError::Connection(msg),
            RedisError::InvalidKeyspace(msg) => StoreError::UnexpectedReply(msg),
            other => StoreError::Command(other.to_string()),
        }
    }
}

pub type RedisResult<T> = Result<T, RedisError>;
