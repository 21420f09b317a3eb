use crate::{
    conversion::{column_names, column_to_strings, strings_to_record_batch},
    error::PramResult,
    matrix::TransitionMatrix,
    replacer::Replacer,
    weighting::WeightingParameters,
    PramError,
};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{collections::HashMap, sync::Mutex};
use tracing::{debug, info};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PramOptions {
    pub parameters: WeightingParameters,
    /// Columns to perturb. `None` or an empty list selects every column.
    pub columns: Option<Vec<String>>,
}

impl PramOptions {
    pub fn new(m: f64, alpha: f64) -> PramResult<Self> {
        Ok(Self {
            parameters: WeightingParameters::new(m, alpha)?,
            columns: None,
        })
    }

    pub fn with_columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    /// Validates the options against `names` and returns the selected columns.
    fn selected_columns(&self, names: &[String]) -> PramResult<Vec<String>> {
        self.parameters.validate()?;

        // Matrices are fitted per column name
        if let Some(duplicate) = names.iter().duplicates().next() {
            return Err(PramError::SchemaMismatch(format!(
                "duplicate column name: {}",
                duplicate
            )));
        }

        match &self.columns {
            Some(columns) if !columns.is_empty() => {
                for column in columns {
                    if !names.contains(column) {
                        return Err(PramError::UnknownColumn(column.clone()));
                    }
                }

                Ok(names
                    .iter()
                    .filter(|name| columns.contains(name))
                    .cloned()
                    .collect())
            }
            _ => Ok(names.to_vec()),
        }
    }
}

/// Weighted matrices of the perturbed columns, keyed by column name.
pub type FittedColumns = HashMap<String, TransitionMatrix>;

fn fit_columns(
    names: &[String],
    columns: &[Vec<String>],
    selected: &[String],
    parameters: &WeightingParameters,
) -> FittedColumns {
    names
        .iter()
        .zip(columns)
        .filter(|(name, _)| selected.contains(name))
        .map(|(name, values)| {
            let matrix = TransitionMatrix::from_values(values).weighted(parameters);
            debug!(column = %name, domain_size = matrix.len(), "fitted transition matrix");
            (name.clone(), matrix)
        })
        .collect()
}

/// Fits the weighted matrix of every selected column of `data`.
pub fn fit(data: &RecordBatch, options: &PramOptions) -> PramResult<FittedColumns> {
    let names = column_names(data);
    let selected = options.selected_columns(&names)?;

    let columns = data
        .columns()
        .iter()
        .map(column_to_strings)
        .collect::<PramResult<Vec<_>>>()?;

    Ok(fit_columns(&names, &columns, &selected, &options.parameters))
}

/// Applies PRAM to `data`.
///
/// Every cell is coerced to text. Selected columns are re-sampled cell by
/// cell from their weighted matrix, the rest pass through unchanged. The
/// output has the same rows and columns in the same order.
pub fn perturb<R: Rng + ?Sized>(
    data: &RecordBatch,
    options: &PramOptions,
    rng: &mut R,
) -> PramResult<RecordBatch> {
    let names = column_names(data);
    let selected = options.selected_columns(&names)?;

    let columns = data
        .columns()
        .iter()
        .map(column_to_strings)
        .collect::<PramResult<Vec<_>>>()?;

    if data.num_rows() == 0 {
        return strings_to_record_batch(&names, columns, 0);
    }

    let mut fitted = fit_columns(&names, &columns, &selected, &options.parameters);

    let mut replacers = HashMap::new();
    for name in &selected {
        if let Some(matrix) = fitted.remove(name) {
            replacers.insert(name.as_str(), Replacer::new(name, matrix)?);
        }
    }

    info!(
        rows = data.num_rows(),
        columns = names.len(),
        perturbed = selected.len(),
        "applying pram"
    );

    let mut output = Vec::with_capacity(columns.len());
    for (name, values) in names.iter().zip(columns) {
        match replacers.get(name.as_str()) {
            Some(replacer) => output.push(
                values
                    .iter()
                    .map(|value| replacer.replace(value, &mut *rng).map(|v| v.to_string()))
                    .collect::<PramResult<Vec<String>>>()?,
            ),
            None => output.push(values),
        }
    }

    strings_to_record_batch(&names, output, data.num_rows())
}

/// A reusable PRAM transformation owning its random source.
pub struct Pram {
    options: PramOptions,
    rng: Mutex<StdRng>,
}

impl Pram {
    pub fn new(options: PramOptions) -> Self {
        Self {
            options,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(options: PramOptions, seed: u64) -> Self {
        Self {
            options,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn options(&self) -> &PramOptions {
        &self.options
    }

    pub fn fit(&self, data: &RecordBatch) -> PramResult<FittedColumns> {
        fit(data, &self.options)
    }

    pub fn transform_records(&self, data: &RecordBatch) -> PramResult<RecordBatch> {
        // A poisoned lock still holds a usable generator
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        perturb(data, &self.options, &mut *rng)
    }
}
