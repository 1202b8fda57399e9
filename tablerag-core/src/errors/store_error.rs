/// Store-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("store unreachable at {path}: {reason}")]
    Unreachable { path: String, reason: String },
}
