use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageFault {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored snapshot is corrupt: {0}")]
    Corrupt(serde_json::Error),

    #[error("Failed to encode snapshot: {0}")]
    Encode(serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
