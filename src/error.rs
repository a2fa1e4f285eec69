/// Error types for ingestion, query validation and readiness.
///
/// Numeric coercion failures and zero-revenue ratios are deliberately absent
/// from this taxonomy: both resolve to `0` and never surface as errors.
use std::path::PathBuf;

/// Failure while reading records from a source.
///
/// Fatal to a single load attempt. The service logs it and keeps serving
/// (see `QueryService::load`).
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    /// The source file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A delimited source had no header row.
    #[error("{origin} has no header row")]
    MissingHeader { origin: String },

    /// A remote scan page could not be fetched. `page` is zero-based.
    #[error("failed to fetch scan page {page}: {message}")]
    PageFetch { page: usize, message: String },

    /// A remote page handed back the same cursor it was asked for.
    #[error("scan cursor did not advance after page {page}")]
    StalledCursor { page: usize },
}

/// A caller-supplied query parameter outside the closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unsupported dimension: '{0}'")]
    UnsupportedDimension(String),

    #[error("unsupported aggregate: '{0}'")]
    UnsupportedAggregate(String),
}

/// A collaborator the query needs has not been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotReadyError {
    #[error("table has not been built yet")]
    Table,

    #[error("prediction model is not loaded")]
    Predictor,
}

/// The predictor ran but could not produce a usable number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("prediction failed: {0}")]
pub struct PredictionError(pub String);

/// Everything a single query can fail with.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotReady(#[from] NotReadyError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}
