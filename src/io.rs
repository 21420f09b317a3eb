use crate::{conversion::coerce_to_strings, error::PramResult, PramError};
use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder, WriterBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{
    fs::File,
    io::{Seek, SeekFrom, Write},
    path::Path,
    sync::Arc,
};
use tracing::debug;

/// Loads a header-bearing CSV file into a single batch of utf8 columns.
///
/// Only the header is taken from the file's inferred schema; every cell is
/// read as text so it keeps its exact form.
pub fn read_csv(path: &Path) -> PramResult<RecordBatch> {
    if !path.exists() {
        return Err(PramError::MissingInput(path.to_path_buf()));
    }

    let mut file = File::open(path)?;

    let format = Format::default().with_header(true);
    let (inferred, _) = format.infer_schema(&mut file, Some(0))?;
    file.seek(SeekFrom::Start(0))?;

    let schema = Arc::new(Schema::new(
        inferred
            .fields()
            .iter()
            .map(|field| Field::new(field.name(), DataType::Utf8, true))
            .collect::<Vec<Field>>(),
    ));

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(file)?;

    let batches = reader.collect::<Result<Vec<RecordBatch>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;

    debug!(
        path = %path.display(),
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "loaded csv"
    );

    Ok(batch)
}

/// Writes `data` as CSV with a header row, coercing every cell to text.
pub fn write_csv(path: &Path, data: &RecordBatch) -> PramResult<()> {
    let data = coerce_to_strings(data)?;

    let mut writer = WriterBuilder::new().with_header(true).build(Vec::new());
    writer.write(&data)?;
    let contents = writer.into_inner();

    let mut file = File::create(path)?;
    file.write_all(&contents)?;
    file.flush()?;
    file.sync_all()?;

    debug!(path = %path.display(), rows = data.num_rows(), "wrote csv");

    Ok(())
}
