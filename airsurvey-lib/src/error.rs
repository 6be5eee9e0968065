#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Not enough bytes")]
    NotEnoughData { actual: usize, minimum: usize },

    /// Sentence has no `*` followed by two hex digits, or does not start with `$`.
    #[error("missing or malformed sentence checksum")]
    MissingChecksum,
    #[error("sentence checksum mismatch: expected {expected:02X}, computed {actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("invalid frame magic: {0:02x?}")]
    InvalidMagic([u8; 4]),
    #[error("frame header checksum mismatch: expected {expected:02x}, computed {actual:02x}")]
    HeaderChecksum { expected: u8, actual: u8 },
    #[error("frame body checksum mismatch: expected {expected:02x}, computed {actual:02x}")]
    BodyChecksum { expected: u8, actual: u8 },

    /// The only field of a single-value record could not be parsed.
    #[error("invalid {field} value {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
