/// Query Surface message types.
///
/// A front end (HTTP handler, CLI, socket) deserializes a [`QueryRequest`],
/// hands it to [`QueryService::handle`](crate::service::QueryService::handle)
/// and serializes the [`QueryResponse`] it gets back.
use crate::aggregate::{AgeSalesShare, ChartPoint};
use crate::error::QueryError;
use crate::predict::PredictionRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Messages sent from client to service
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum QueryRequest {
    /// Row count per region
    MapUsers,

    /// Grouped aggregate for a chart
    Chart { x_axis: String, y_axis: String },

    /// Revenue and revenue share per age bracket
    AgeSalesRatio,

    /// Every row of the current table
    Records,

    /// Score one set of features with the predictor
    Predict(PredictionRequest),
}

/// How a front end should classify a failed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatus {
    /// The caller sent an unsupported parameter.
    BadRequest,
    /// A collaborator is not loaded yet.
    Unavailable,
    /// The collaborator ran and failed.
    Internal,
}

impl ErrorStatus {
    pub fn http_code(self) -> u16 {
        match self {
            ErrorStatus::BadRequest => 400,
            ErrorStatus::Unavailable => 503,
            ErrorStatus::Internal => 500,
        }
    }
}

impl From<&QueryError> for ErrorStatus {
    fn from(err: &QueryError) -> Self {
        match err {
            QueryError::Validation(_) => ErrorStatus::BadRequest,
            QueryError::NotReady(_) => ErrorStatus::Unavailable,
            QueryError::Prediction(_) => ErrorStatus::Internal,
        }
    }
}

/// Messages sent from service to client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum QueryResponse {
    MapUsers {
        counts: BTreeMap<String, u64>,
    },

    Chart {
        points: Vec<ChartPoint>,
    },

    AgeSalesRatio {
        rows: Vec<AgeSalesShare>,
    },

    Records {
        rows: Vec<JsonValue>,
    },

    Prediction {
        predicted_payment: i64,
    },

    Error {
        status: ErrorStatus,
        message: String,
    },
}

impl QueryResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, QueryResponse::Error { .. })
    }
}

impl From<QueryError> for QueryResponse {
    fn from(err: QueryError) -> Self {
        QueryResponse::Error {
            status: ErrorStatus::from(&err),
            message: err.to_string(),
        }
    }
}
