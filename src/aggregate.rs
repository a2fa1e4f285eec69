/// Group-by aggregation over an immutable [`Table`].
///
/// Every function here is a pure read of the table: no state, no locks, safe
/// to call from any number of threads at once.
///
/// Groups come from the rows themselves, so a group in the output always has
/// at least one row and a mean never divides by zero. An empty table yields
/// empty results.
///
/// # Ordering
///
/// - `region` groups are ordered by label.
/// - `age_group` groups follow bracket order with `unbracketed` last.
///
/// # Rounding
///
/// Chart values are rounded half away from zero to 2 decimals; revenue ratios
/// to 1 decimal. `total_sales` truncates toward zero.
use crate::bracket::AgeBracket;
use crate::error::ValidationError;
use crate::table::{Dimension, NumericField, Table};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Decimal places for chart values.
pub const CHART_PRECISION: i32 = 2;
/// Decimal places for revenue ratio percentages.
pub const RATIO_PRECISION: i32 = 1;

/// The reduction applied within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    /// Rows per group.
    Count,
    /// Sum of a numeric field.
    Sum(NumericField),
    /// Mean of a numeric field scaled by 100, for 0/1 fractions read as percent.
    MeanPercent(NumericField),
}

impl FromStr for AggregateKind {
    type Err = ValidationError;

    /// Accepts the chart y-axis names (`users`, `sales`, `retention`) and the
    /// generic names (`count`, `sum`, `mean`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" | "count" => Ok(AggregateKind::Count),
            "sales" | "sum" => Ok(AggregateKind::Sum(NumericField::TotalPayment)),
            "retention" | "mean" => Ok(AggregateKind::MeanPercent(NumericField::Retained90)),
            _ => Err(ValidationError::UnsupportedAggregate(s.to_string())),
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateKind::Count => f.write_str("count"),
            AggregateKind::Sum(field) => write!(f, "sum({})", field),
            AggregateKind::MeanPercent(field) => write!(f, "mean({}) * 100", field),
        }
    }
}

/// A validated chart query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartQuery {
    pub group_by: Dimension,
    pub kind: AggregateKind,
}

impl ChartQuery {
    /// Validate raw axis names. The dimension is checked first.
    pub fn parse(x_axis: &str, y_axis: &str) -> Result<Self, ValidationError> {
        Ok(ChartQuery {
            group_by: x_axis.parse()?,
            kind: y_axis.parse()?,
        })
    }

    pub fn run(&self, table: &Table) -> Vec<ChartPoint> {
        aggregate(table, self.group_by, self.kind)
    }
}

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// One row of the revenue-by-age-bracket report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeSalesShare {
    pub age_group: String,
    pub total_sales: i64,
    pub ratio_percent: f64,
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy, Default)]
struct GroupTotals {
    rows: u64,
    sum: f64,
}

/// Per-group row counts and (optionally) field sums, in output order.
/// Only groups with at least one row are returned.
fn group_totals<'t>(
    table: &'t Table,
    dimension: Dimension,
    field: Option<NumericField>,
) -> Vec<(&'t str, GroupTotals)> {
    let Some((ids, labels)) = table.categories(dimension) else {
        return Vec::new();
    };

    let mut totals = vec![GroupTotals::default(); labels.len()];
    match field {
        Some(field) => {
            for (&id, &value) in ids.iter().zip(table.numeric(field)) {
                if let Some(group) = totals.get_mut(id as usize) {
                    group.rows += 1;
                    group.sum += value;
                }
            }
        }
        None => {
            for &id in ids {
                if let Some(group) = totals.get_mut(id as usize) {
                    group.rows += 1;
                }
            }
        }
    }

    let mut groups: Vec<(&str, GroupTotals)> = labels
        .iter()
        .zip(totals)
        .filter(|(_, group)| group.rows > 0)
        .map(|((_, label), group)| (label, group))
        .collect();

    match dimension {
        Dimension::Region => groups.sort_by(|a, b| a.0.cmp(b.0)),
        Dimension::AgeGroup => groups.sort_by_key(|(label, _)| AgeBracket::from_label(label)),
    }
    groups
}

/// One result per distinct value of `group_by`.
pub fn aggregate(table: &Table, group_by: Dimension, kind: AggregateKind) -> Vec<ChartPoint> {
    let field = match kind {
        AggregateKind::Count => None,
        AggregateKind::Sum(field) | AggregateKind::MeanPercent(field) => Some(field),
    };

    group_totals(table, group_by, field)
        .into_iter()
        .map(|(label, group)| {
            let value = match kind {
                AggregateKind::Count => group.rows as f64,
                AggregateKind::Sum(_) => group.sum,
                AggregateKind::MeanPercent(_) => group.sum / group.rows as f64 * 100.0,
            };
            ChartPoint {
                label: label.to_string(),
                value: round_to(value, CHART_PRECISION),
            }
        })
        .collect()
}

/// Per-bracket revenue and its share of total revenue.
///
/// When total revenue is zero, or overflows to infinity, every ratio is `0.0`.
pub fn revenue_by_age_bracket(table: &Table) -> Vec<AgeSalesShare> {
    let groups = group_totals(table, Dimension::AgeGroup, Some(NumericField::TotalPayment));
    let total: f64 = groups.iter().map(|(_, group)| group.sum).sum();

    groups
        .into_iter()
        .map(|(label, group)| {
            let ratio_percent = if total == 0.0 || !total.is_finite() {
                0.0
            } else {
                round_to(group.sum / total * 100.0, RATIO_PRECISION)
            };
            AgeSalesShare {
                age_group: label.to_string(),
                total_sales: group.sum.trunc() as i64,
                ratio_percent,
            }
        })
        .collect()
}

/// Row count per region.
pub fn user_counts_by_region(table: &Table) -> BTreeMap<String, u64> {
    group_totals(table, Dimension::Region, None)
        .into_iter()
        .map(|(label, group)| (label.to_string(), group.rows))
        .collect()
}
