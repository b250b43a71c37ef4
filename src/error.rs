use thiserror::Error;

/// Error taxonomy for the booking/lifecycle engine.
///
/// Each variant corresponds to a row in the error-handling design: callers
/// match on these to decide what the chat flow controller or admin surface
/// shows the user, never on the underlying infrastructure error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("slot is already taken")]
    SlotAlreadyTaken,

    #[error("no active price for this service")]
    PriceUnavailable,

    #[error("actor is not authorized to perform this action")]
    NotAuthorized,

    #[error("recipient has blocked the bot")]
    TransportUserBlocked,

    #[error("transport error: {0}")]
    TransportTransient(String),

    #[error("store rejected the write due to a conflicting constraint")]
    StoreConflict,

    #[error("store is temporarily unavailable: {0}")]
    StoreTransient(String),

    #[error("entity not found")]
    NotFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Classifies a `sqlx` error raised on commit of an appointment insert.
    ///
    /// Both the unique-ish `SELECT ... FOR UPDATE` race loser and the
    /// backstop `EXCLUDE USING GIST` constraint surface here as a Postgres
    /// error; anything else is a transient store failure the caller should
    /// retry (timers) or surface generically (request handlers).
    pub fn from_booking_commit(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            // Postgres exclusion_violation = 23P01, unique_violation = 23505
            if let Some(code) = db_err.code() {
                if code == "23P01" || code == "23505" {
                    return Error::SlotAlreadyTaken;
                }
            }
        }
        Error::StoreTransient(err.to_string())
    }
}
