/// Table builder: raw records in, typed [`Table`] out.
///
/// # Coercion policy
///
/// Every declared numeric field is parsed with [`RawValue::as_number`]. Any
/// value that does not yield a finite number (absent, null, `"abc"`, `"NaN"`)
/// becomes `0.0`. This is lossy on purpose: a bad cell zeroes that cell, it
/// never drops the row and never leaves a missing-value marker behind for the
/// aggregation engine to trip over.
///
/// The region label is trimmed; absent or blank regions become
/// [`UNKNOWN_REGION`]. The `age_group` column is derived from the coerced age
/// with [`AgeBracket::for_age`].
///
/// Row count in always equals row count out, and building twice from the same
/// records yields identical contents.
use crate::bracket::AgeBracket;
use crate::column::Column;
use crate::interner::{StringId, StringInterner};
use crate::record::{RawRecord, RawValue};
use crate::table::{Dimension, NumericField, Schema, Table, REGION_ALIASES};
use log::debug;

/// Label for rows without a usable region.
pub const UNKNOWN_REGION: &str = "unknown";

/// First non-null value among the canonical field name and its aliases.
fn lookup<'a>(record: &'a RawRecord, name: &str, aliases: &[&str]) -> Option<&'a RawValue> {
    std::iter::once(name)
        .chain(aliases.iter().copied())
        .filter_map(|key| record.get(key))
        .find(|value| !value.is_null())
}

#[derive(Debug, Clone)]
pub struct TableBuilder {
    name: String,
}

impl TableBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        TableBuilder { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build<I>(&self, records: I) -> Table
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let records = records.into_iter();
        let capacity = records.size_hint().0;

        let mut numeric: Vec<Vec<f64>> = NumericField::ALL
            .iter()
            .map(|_| Vec::with_capacity(capacity))
            .collect();
        let mut zeroed = vec![0usize; NumericField::ALL.len()];

        let mut regions = StringInterner::new();
        let mut region_ids: Vec<StringId> = Vec::with_capacity(capacity);

        // Seeded so every table assigns the same ID to each bracket.
        let mut brackets = StringInterner::with_capacity(AgeBracket::ALL.len());
        for bracket in AgeBracket::ALL {
            brackets.intern(bracket.label());
        }
        let mut bracket_ids: Vec<StringId> = Vec::with_capacity(capacity);

        for record in records {
            let region = lookup(&record, Dimension::Region.column_name(), REGION_ALIASES)
                .and_then(RawValue::as_label);
            region_ids.push(regions.intern(region.as_deref().unwrap_or(UNKNOWN_REGION)));

            for (i, field) in NumericField::ALL.iter().enumerate() {
                let raw = lookup(&record, field.column_name(), field.aliases());
                let value = match raw.and_then(RawValue::as_number) {
                    Some(value) => value,
                    None => {
                        zeroed[i] += 1;
                        0.0
                    }
                };
                numeric[i].push(value);

                if *field == NumericField::Age {
                    bracket_ids.push(brackets.intern(AgeBracket::for_age(value).label()));
                }
            }
        }

        for (field, count) in NumericField::ALL.iter().zip(zeroed) {
            if count > 0 {
                debug!("{}: {} values of '{}' coerced to 0", self.name, count, field);
            }
        }

        let mut columns = Vec::with_capacity(NumericField::ALL.len() + 2);
        columns.push(Column::category(Dimension::Region.column_name(), region_ids, regions));
        columns.extend(
            NumericField::ALL
                .iter()
                .zip(numeric)
                .map(|(field, values)| Column::float64(field.column_name(), values)),
        );
        columns.push(Column::category(Dimension::AgeGroup.column_name(), bracket_ids, brackets));

        Table::from_columns(self.name.clone(), Schema::user_activity(), columns)
    }
}
