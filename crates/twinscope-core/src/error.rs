use thiserror::Error;

/// All errors that can occur in twinscope-core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("No items found in {0}")]
    NoItemsFound(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Saved filter not found: {0}")]
    FilterNotFound(String),

    #[error("Library is locked by another run: {0}")]
    LibraryLocked(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid record id: {0}")]
    InvalidId(#[from] uuid::Error),
}

impl CoreError {
    /// Whether the error means the requested records simply are not there,
    /// as opposed to the library itself being unusable.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RecordNotFound(_)
                | Self::NoItemsFound(_)
                | Self::CollectionNotFound(_)
                | Self::FilterNotFound(_)
        )
    }
}

/// Exit codes used by the CLI.
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NotFound = 2,
    InvalidArgs = 3,
    Conflict = 7,
}

pub type Result<T> = std::result::Result<T, CoreError>;
