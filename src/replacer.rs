use crate::{error::PramResult, matrix::TransitionMatrix, PramError};
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
};

/// Draws replacement values for one column from its weighted matrix.
pub struct Replacer {
    column: String,
    matrix: TransitionMatrix,
    distributions: Vec<WeightedIndex<f64>>,
}

impl Replacer {
    pub fn new(column: &str, matrix: TransitionMatrix) -> PramResult<Self> {
        let distributions = (0..matrix.len())
            .map(|position| WeightedIndex::new(matrix.column_at(position)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            column: column.to_string(),
            matrix,
            distributions,
        })
    }

    pub fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }

    pub fn replace<R: Rng + ?Sized>(&self, value: &str, rng: &mut R) -> PramResult<&str> {
        let source = self
            .matrix
            .position(value)
            .ok_or_else(|| PramError::UnknownCategory {
                column: self.column.clone(),
                value: value.to_string(),
            })?;

        let target = self.distributions[source].sample(rng);

        Ok(self.matrix.domain()[target].as_str())
    }
}
