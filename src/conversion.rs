use crate::{error::PramResult, PramError};
use arrow::{
    array::{Array, ArrayRef, LargeStringArray, StringArray},
    compute::cast,
    datatypes::{DataType, Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;

/// Token a null cell collapses to once coerced to text.
///
/// pandas based PRAM tools spell a missing value `"nan"`; the empty string is
/// used here instead because the CSV layer reads and writes it as null.
pub const NULL_TOKEN: &str = "";

/// Returns the textual form of every cell of `column`.
pub fn column_to_strings(column: &ArrayRef) -> PramResult<Vec<String>> {
    let values: Vec<Option<String>> = match column.data_type() {
        DataType::Utf8 => column
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| PramError::SchemaMismatch("expected a utf8 array".to_string()))?
            .iter()
            .map(|value| value.map(|v| v.to_string()))
            .collect(),
        DataType::LargeUtf8 => column
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .ok_or_else(|| PramError::SchemaMismatch("expected a large utf8 array".to_string()))?
            .iter()
            .map(|value| value.map(|v| v.to_string()))
            .collect(),
        _ => {
            let casted = cast(column, &DataType::Utf8)?;
            return column_to_strings(&casted);
        }
    };

    Ok(values
        .into_iter()
        .map(|value| value.unwrap_or_else(|| NULL_TOKEN.to_string()))
        .collect())
}

/// Builds a batch of non-nullable utf8 columns, keeping the row count even
/// when there are no columns.
pub fn strings_to_record_batch(
    names: &[String],
    columns: Vec<Vec<String>>,
    num_rows: usize,
) -> PramResult<RecordBatch> {
    let fields: Vec<Field> = names
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, false))
        .collect();

    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|values| Arc::new(StringArray::from(values)) as ArrayRef)
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(num_rows));

    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &options,
    )?)
}

pub fn column_names(data: &RecordBatch) -> Vec<String> {
    data.schema()
        .fields()
        .iter()
        .map(|field| field.name().to_string())
        .collect()
}

/// Coerces every column of `data` to its string form.
pub fn coerce_to_strings(data: &RecordBatch) -> PramResult<RecordBatch> {
    let columns = data
        .columns()
        .iter()
        .map(column_to_strings)
        .collect::<PramResult<Vec<_>>>()?;

    strings_to_record_batch(&column_names(data), columns, data.num_rows())
}
