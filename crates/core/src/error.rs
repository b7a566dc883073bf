use api_shared::UnsupportedValue;

/// Failures raised by a [`RecordStore`](crate::store::RecordStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("failed to read fixture file: {0}")]
    FixtureRead(std::io::Error),
    #[error("failed to parse fixture file: {0}")]
    FixtureParse(serde_json::Error),
    #[error("fixture must be a JSON array of documents")]
    FixtureShape,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures of a conditions query.
///
/// The `Display` strings are returned verbatim to API clients in the `error` field.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("scenarioId is required for results")]
    MissingScenarioId,
    #[error(transparent)]
    UnsupportedValue(#[from] UnsupportedValue),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Whether the failure was caused by the request rather than the data layer.
    pub fn is_validation(&self) -> bool {
        !matches!(self, QueryError::Store(_))
    }
}

pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Startup configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("MONGODB_URI must be set unless REFERRAL_FIXTURE points at a fixture file")]
    MissingMongoUri,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
