use thiserror::Error;

/// Errors that can arise while managing service actors and their catalogs.
#[derive(Debug, Error)]
pub enum KeeperError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (seed file access, directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when a spawn targets a world the engine has not loaded.
    #[error("world not loaded: {0}")]
    WorldNotLoaded(String),

    /// Refused spawn: an active catalog entry already uses this exact display
    /// name, which would make future name-fallback matches ambiguous.
    #[error("display name already in use: {0}")]
    DuplicateName(String),

    /// A configuration entry is missing a required field and was skipped.
    #[error("configuration entry {entry} is missing {field}")]
    ConfigurationIncomplete { entry: String, field: &'static str },

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when decoding a persisted record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// The player's client tag is not accepted by this service point.
    #[error("client tag not accepted")]
    NotAccepted,

    /// The requested item kind is not handled by this service point at all.
    #[error("not traded here: {0}")]
    NotTraded(String),

    /// The goods are not available (shop stock, or the player's own carry).
    #[error("out of stock")]
    OutOfStock,

    /// The per-player daily purchase ceiling would be exceeded.
    #[error("daily purchase limit exceeded")]
    DailyLimitExceeded,

    /// The request exceeds a per-operation ceiling of the service point.
    #[error("amount exceeds the ceiling of {limit}")]
    CeilingExceeded { limit: i64 },

    /// Insufficient funds for the transaction.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The player cannot receive the goods.
    #[error("no carrying capacity")]
    NoCapacity,

    /// The service point is closed at this hour.
    #[error("outside business hours")]
    OutsideBusinessHours,

    /// A zero or negative quantity/amount was requested.
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    /// Internal error (unexpected conditions, ledger refusals after checks).
    #[error("internal error: {0}")]
    Internal(String),
}
