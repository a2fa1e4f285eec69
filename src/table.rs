//! The immutable user-activity table.
//!
//! A Table is a fixed set of typed columns of equal length. It is assembled
//! once by the [`TableBuilder`](crate::builder::TableBuilder) and then only
//! read: there is no insert, update or delete. Sharing a `Table` across
//! threads behind an `Arc` needs no locking.
//!
//! # Examples
//!
//! ```
//! use usagetable::{NumericField, RawRecord, RawValue, TableBuilder};
//!
//! let mut record = RawRecord::new();
//! record.insert("region".to_string(), RawValue::from("Seoul"));
//! record.insert("age".to_string(), RawValue::from("31"));
//! record.insert("total_payment".to_string(), RawValue::from(12000.0));
//!
//! let table = TableBuilder::new("users").build(vec![record]);
//!
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.numeric(NumericField::Age), &[31.0]);
//! assert_eq!(table.get_value(0, "age_group").unwrap().as_string(), Some("[30,40)"));
//! assert_eq!(table.sum(NumericField::TotalPayment), 12000.0);
//! ```

use crate::column::{Column, ColumnType, ColumnValue};
use crate::error::ValidationError;
use crate::interner::{StringId, StringInterner};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The declared numeric fields. Every row has a finite value for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Age,
    VisitDays,
    TotalDurationMin,
    TotalPayment,
    Retained90,
}

impl NumericField {
    pub const ALL: [NumericField; 5] = [
        NumericField::Age,
        NumericField::VisitDays,
        NumericField::TotalDurationMin,
        NumericField::TotalPayment,
        NumericField::Retained90,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            NumericField::Age => "age",
            NumericField::VisitDays => "visit_days",
            NumericField::TotalDurationMin => "total_duration_min",
            NumericField::TotalPayment => "total_payment",
            NumericField::Retained90 => "retained_90",
        }
    }

    /// Alternate raw field names accepted on ingestion.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            NumericField::TotalPayment => &["total_payment_may"],
            _ => &[],
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// The closed set of group-by dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Region,
    AgeGroup,
}

impl Dimension {
    pub const ALL: [Dimension; 2] = [Dimension::Region, Dimension::AgeGroup];

    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Region => "region",
            Dimension::AgeGroup => "age_group",
        }
    }
}

impl FromStr for Dimension {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "region" | "region_city_group" => Ok(Dimension::Region),
            "age_group" | "ageGroup" => Ok(Dimension::AgeGroup),
            _ => Err(ValidationError::UnsupportedDimension(s.to_string())),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Raw field names accepted for the region column.
pub const REGION_ALIASES: &[&str] = &["region_city_group"];

/// Schema definition with column names and types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<(String, ColumnType)>,
}

impl Schema {
    /// The one schema every user-activity table shares.
    pub fn user_activity() -> Self {
        let mut columns = vec![(Dimension::Region.column_name().to_string(), ColumnType::Category)];
        columns.extend(
            NumericField::ALL
                .iter()
                .map(|field| (field.column_name().to_string(), ColumnType::Float64)),
        );
        columns.push((Dimension::AgeGroup.column_name().to_string(), ColumnType::Category));
        Schema { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _)| n == name)
    }

    pub fn get_column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| *ty)
    }
}

pub struct Table {
    name: String,
    schema: Schema,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Assemble a table from finished columns, one per schema entry in order.
    pub(crate) fn from_columns(name: String, schema: Schema, columns: Vec<Column>) -> Self {
        let row_count = columns.first().map_or(0, Column::len);
        debug_assert_eq!(schema.len(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() == row_count));
        debug_assert!(columns
            .iter()
            .zip(schema.get_column_names())
            .all(|(c, n)| c.name() == n));

        Table {
            name,
            schema,
            columns,
            row_count,
        }
    }

    /// A valid table with the user-activity schema and no rows.
    pub fn empty(name: impl Into<String>) -> Self {
        crate::builder::TableBuilder::new(name).build(Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.schema
            .get_column_index(name)
            .and_then(|idx| self.columns.get(idx))
    }

    /// All values of a numeric field, in row order.
    pub fn numeric(&self, field: NumericField) -> &[f64] {
        self.column(field.column_name())
            .and_then(Column::as_f64_slice)
            .unwrap_or(&[])
    }

    /// Per-row group IDs for a dimension and the interner that labels them.
    pub fn categories(&self, dimension: Dimension) -> Option<(&[StringId], &StringInterner)> {
        self.column(dimension.column_name())
            .and_then(Column::as_categories)
    }

    /// Ungrouped total of a numeric field.
    pub fn sum(&self, field: NumericField) -> f64 {
        self.numeric(field).iter().sum()
    }

    pub fn get_value(&self, row: usize, column: &str) -> Result<ColumnValue, String> {
        let col = self
            .column(column)
            .ok_or_else(|| format!("Column '{}' not found", column))?;
        col.get(row)
            .ok_or_else(|| format!("Row {} out of range [0, {})", row, self.row_count))
    }

    pub fn get_row(&self, row: usize) -> Result<HashMap<String, ColumnValue>, String> {
        if row >= self.row_count {
            return Err(format!("Row {} out of range [0, {})", row, self.row_count));
        }

        self.columns
            .iter()
            .map(|col| {
                col.get(row)
                    .map(|value| (col.name().to_string(), value))
                    .ok_or_else(|| format!("Column '{}' is shorter than the table", col.name()))
            })
            .collect()
    }

    pub fn iter_rows(&self) -> TableRowIterator<'_> {
        TableRowIterator {
            table: self,
            index: 0,
        }
    }

    /// Every row as a JSON object keyed by column name.
    pub fn to_json_rows(&self) -> Vec<serde_json::Value> {
        self.iter_rows()
            .map(|row| {
                let obj: serde_json::Map<String, serde_json::Value> = row
                    .into_iter()
                    .map(|(name, value)| (name, value.to_json()))
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect()
    }
}

pub struct TableRowIterator<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Iterator for TableRowIterator<'a> {
    type Item = HashMap<String, ColumnValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.table.row_count {
            None
        } else {
            let result = self.table.get_row(self.index).ok();
            self.index += 1;
            result
        }
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Table {{ name: '{}', columns: {}, rows: {} }}",
            self.name,
            self.schema.len(),
            self.row_count
        )
    }
}
