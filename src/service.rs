/// Query service: the boundary between a front end and the engine.
///
/// Owns the [`TableCell`] and the optional predictor. Raw query parameters are
/// validated into closed enums here, before any table is touched; the engine
/// itself only ever sees valid queries.
///
/// # Loading
///
/// - [`load`](QueryService::load) is the startup path. If ingestion fails the
///   error is logged and an empty table is installed, so every query answers
///   with an empty result and the process keeps serving.
/// - [`reload`](QueryService::reload) is the explicit refresh path. A failure
///   leaves the current snapshot in place and is returned to the caller.
use crate::aggregate::{self, AgeSalesShare, ChartPoint, ChartQuery};
use crate::builder::TableBuilder;
use crate::error::{IngestionError, NotReadyError, QueryError};
use crate::messages::{QueryRequest, QueryResponse};
use crate::predict::{Prediction, PredictionRequest, Predictor};
use crate::source::RecordSource;
use crate::state::TableCell;
use crate::table::Table;
use log::{error, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct QueryService {
    builder: TableBuilder,
    table: TableCell,
    predictor: Option<Arc<dyn Predictor>>,
}

impl QueryService {
    pub fn new(table_name: impl Into<String>) -> Self {
        QueryService {
            builder: TableBuilder::new(table_name),
            table: TableCell::new(),
            predictor: None,
        }
    }

    pub fn with_predictor(mut self, predictor: Arc<dyn Predictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn table(&self) -> &TableCell {
        &self.table
    }

    fn ingest(&self, source: &dyn RecordSource) -> Result<Table, IngestionError> {
        let records = source.read_records()?;
        Ok(self.builder.build(records))
    }

    /// Build from `source` and install the result; on failure install an empty
    /// table. Returns the number of rows now being served.
    pub fn load(&self, source: &dyn RecordSource) -> usize {
        let table = match self.ingest(source) {
            Ok(table) => table,
            Err(e) => {
                error!(
                    "ingestion from {} failed, serving an empty table: {}",
                    source.describe(),
                    e
                );
                Table::empty(self.builder.name())
            }
        };
        self.install(table, source)
    }

    /// Rebuild from `source`. The current snapshot stays live if this fails.
    pub fn reload(&self, source: &dyn RecordSource) -> Result<usize, IngestionError> {
        match self.ingest(source) {
            Ok(table) => Ok(self.install(table, source)),
            Err(e) => {
                warn!(
                    "reload from {} failed, keeping generation {}: {}",
                    source.describe(),
                    self.table.generation(),
                    e
                );
                Err(e)
            }
        }
    }

    fn install(&self, table: Table, source: &dyn RecordSource) -> usize {
        let rows = table.len();
        let generation = self.table.install(table);
        info!(
            "loaded {} rows from {} (generation {})",
            rows,
            source.describe(),
            generation
        );
        rows
    }

    /// Grouped aggregate for raw axis names, e.g. `("age_group", "sales")`.
    pub fn chart(&self, x_axis: &str, y_axis: &str) -> Result<Vec<ChartPoint>, QueryError> {
        let query = ChartQuery::parse(x_axis, y_axis)?;
        let table = self.table.snapshot()?;
        Ok(query.run(&table))
    }

    pub fn age_sales_ratio(&self) -> Result<Vec<AgeSalesShare>, QueryError> {
        let table = self.table.snapshot()?;
        Ok(aggregate::revenue_by_age_bracket(&table))
    }

    pub fn map_users(&self) -> Result<BTreeMap<String, u64>, QueryError> {
        let table = self.table.snapshot()?;
        Ok(aggregate::user_counts_by_region(&table))
    }

    pub fn records(&self) -> Result<Vec<serde_json::Value>, QueryError> {
        let table = self.table.snapshot()?;
        Ok(table.to_json_rows())
    }

    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction, QueryError> {
        let predictor = self.predictor.as_ref().ok_or(NotReadyError::Predictor)?;
        let score = predictor.predict(request)?;
        Ok(Prediction::from_score(score)?)
    }

    /// Dispatch one request. Failures come back as `QueryResponse::Error`.
    pub fn handle(&self, request: QueryRequest) -> QueryResponse {
        let result = match request {
            QueryRequest::MapUsers => self
                .map_users()
                .map(|counts| QueryResponse::MapUsers { counts }),
            QueryRequest::Chart { x_axis, y_axis } => self
                .chart(&x_axis, &y_axis)
                .map(|points| QueryResponse::Chart { points }),
            QueryRequest::AgeSalesRatio => self
                .age_sales_ratio()
                .map(|rows| QueryResponse::AgeSalesRatio { rows }),
            QueryRequest::Records => self.records().map(|rows| QueryResponse::Records { rows }),
            QueryRequest::Predict(features) => {
                self.predict(&features)
                    .map(|p| QueryResponse::Prediction {
                        predicted_payment: p.predicted_payment,
                    })
            }
        };
        result.unwrap_or_else(QueryResponse::from)
    }
}
