/// UsageTable - In-Memory Analytics over User Activity Records
///
/// Ingests user-activity records from a CSV file or a paginated remote scan,
/// builds an immutable columnar table with dictionary-encoded categories, and
/// answers grouped aggregate queries against an atomically swappable snapshot.

pub mod error;
pub mod record;
pub mod source;
pub mod bracket;
pub mod interner;
pub mod column;
pub mod table;
pub mod builder;
pub mod aggregate;
pub mod state;
pub mod predict;
pub mod messages;
pub mod service;
pub mod config;

pub use error::{IngestionError, NotReadyError, PredictionError, QueryError, ValidationError};
pub use record::{RawRecord, RawValue};
pub use source::{CsvFileSource, PageClient, PaginatedSource, RecordSource, ScanCursor, ScanPage};
pub use bracket::AgeBracket;
pub use interner::{StringId, StringInterner};
pub use column::{Column, ColumnType, ColumnValue};
pub use table::{Dimension, NumericField, Schema, Table};
pub use builder::TableBuilder;
pub use aggregate::{
    aggregate, revenue_by_age_bracket, user_counts_by_region, AgeSalesShare, AggregateKind,
    ChartPoint, ChartQuery,
};
pub use state::TableCell;
pub use predict::{Prediction, PredictionRequest, Predictor};
pub use messages::{ErrorStatus, QueryRequest, QueryResponse};
pub use service::QueryService;
pub use config::Config;
