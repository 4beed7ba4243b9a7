use std::collections::TryReserveError;

/// Represents errors that can occur in the hash table
#[derive(Debug)]
pub enum Error {
    /// Keys must contain at least one byte
    EmptyKey,

    /// The bucket array or a key buffer could not be allocated
    AllocFailed(TryReserveError),

    /// A cursor was advanced after the table it came from was resized
    StaleCursor,

    /// A cursor was advanced on a table other than the one that created it
    ForeignCursor,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HashTableError: {self:?}")
    }
}

impl std::error::Error for Error {}

impl From<TryReserveError> for Error {
    fn from(value: TryReserveError) -> Self {
        Self::AllocFailed(value)
    }
}

/// Hash table result
pub type Result<T> = std::result::Result<T, Error>;
