use crate::{
    conversion::{column_names, column_to_strings},
    error::PramResult,
    PramError,
};
use arrow::{
    array::{ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
    util::pretty::pretty_format_batches,
};
use itertools::Itertools;
use std::{collections::HashMap, fmt, sync::Arc};

#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyRow {
    pub column: String,
    pub value: String,
    pub original: f64,
    pub output: f64,
}

/// Per-column value proportions of an original dataset next to its
/// perturbed counterpart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrequencyTable {
    rows: Vec<FrequencyRow>,
}

fn proportions(values: &[String]) -> HashMap<&str, f64> {
    let total = values.len() as f64;

    values
        .iter()
        .map(|value| value.as_str())
        .counts()
        .into_iter()
        .map(|(value, count)| (value, count as f64 / total))
        .collect()
}

fn round(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn frequency_table(original: &RecordBatch, perturbed: &RecordBatch) -> PramResult<FrequencyTable> {
    let names = column_names(original);
    let perturbed_names = column_names(perturbed);

    if names != perturbed_names {
        return Err(PramError::SchemaMismatch(format!(
            "columns {:?} do not match {:?}",
            names, perturbed_names
        )));
    }

    let mut rows = vec![];
    for (index, name) in names.iter().enumerate() {
        let original_values = column_to_strings(original.column(index))?;
        let perturbed_values = column_to_strings(perturbed.column(index))?;

        let original_proportions = proportions(&original_values);
        let perturbed_proportions = proportions(&perturbed_values);

        let values = original_proportions
            .keys()
            .chain(perturbed_proportions.keys())
            .unique()
            .sorted();

        for value in values {
            rows.push(FrequencyRow {
                column: name.clone(),
                value: value.to_string(),
                original: original_proportions.get(value).copied().unwrap_or(0.0),
                output: perturbed_proportions.get(value).copied().unwrap_or(0.0),
            });
        }
    }

    Ok(FrequencyTable { rows })
}

impl FrequencyTable {
    pub fn rows(&self) -> &[FrequencyRow] {
        &self.rows
    }

    /// The table as a batch with proportions rounded to two decimals.
    pub fn to_record_batch(&self) -> PramResult<RecordBatch> {
        let schema = Schema::new(vec![
            Field::new("Column", DataType::Utf8, false),
            Field::new("Value", DataType::Utf8, false),
            Field::new("Original", DataType::Float64, false),
            Field::new("Output", DataType::Float64, false),
        ]);

        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(
                self.rows.iter().map(|row| row.column.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                self.rows.iter().map(|row| row.value.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(
                self.rows.iter().map(|row| round(row.original)),
            )),
            Arc::new(Float64Array::from_iter_values(
                self.rows.iter().map(|row| round(row.output)),
            )),
        ];

        Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let batch = self.to_record_batch().map_err(|_| fmt::Error)?;
        let table = pretty_format_batches(&[batch]).map_err(|_| fmt::Error)?;
        write!(f, "{}", table)
    }
}
