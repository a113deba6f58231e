use thiserror::Error;

/// Errors reported by a [`StoreConnection`](crate::StoreConnection) implementation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("command failed: {0}")]
    Command(String),

    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reconciling checkpoints.
#[derive(Debug, Error)]
pub enum Error {
    #[error("store query failed ({context}): {source}")]
    StoreQuery {
        context: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to select db[{db}]: {source}")]
    StoreSelect {
        db: u32,
        #[source]
        source: StoreError,
    },

    #[error("corrupt checkpoint in db[{db}]: field '{field}' has non-numeric value '{value}'")]
    CheckpointCorrupt {
        db: u32,
        field: String,
        value: String,
    },

    #[error("failed to remove checkpoint fields from db[{db}]: {source}")]
    StoreWrite {
        db: u32,
        #[source]
        source: StoreError,
    },
}

impl Error {
    pub(crate) fn query(context: impl Into<String>, source: StoreError) -> Self {
        Error::StoreQuery {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
