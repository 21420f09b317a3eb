use crate::{error::PramResult, matrix::TransitionMatrix, PramError};

pub const DEFAULT_MINIMUM_DIAGONAL: f64 = 0.8;
pub const DEFAULT_ALPHA: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightingParameters {
    m: f64,
    alpha: f64,
}

impl Default for WeightingParameters {
    fn default() -> Self {
        Self {
            m: DEFAULT_MINIMUM_DIAGONAL,
            alpha: DEFAULT_ALPHA,
        }
    }
}

fn check_unit_interval(name: &'static str, value: f64) -> PramResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PramError::InvalidParameter { name, value })
    }
}

impl WeightingParameters {
    pub fn new(m: f64, alpha: f64) -> PramResult<Self> {
        let parameters = Self { m, alpha };
        parameters.validate()?;
        Ok(parameters)
    }

    /// Floor for the probability of a value mapping to itself.
    pub fn m(&self) -> f64 {
        self.m
    }

    /// Blend between no perturbation (0) and the empirical matrix (1).
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn validate(&self) -> PramResult<()> {
        check_unit_interval("m", self.m)?;
        check_unit_interval("alpha", self.alpha)
    }
}

impl TransitionMatrix {
    /// Raises every diagonal entry below `m` to `m` and renormalises the
    /// columns. Off-diagonal mass shrinks proportionally.
    pub fn with_minimum_diagonal(&self, m: f64) -> TransitionMatrix {
        let diagonal: Vec<f64> = self
            .diagonal()
            .into_iter()
            .map(|value| if value < m { m } else { value })
            .collect();

        let mut matrix = self.clone();
        matrix.set_diagonal(&diagonal);
        matrix.normalize_columns();
        matrix
    }

    /// Derives the weighted matrix used for sampling.
    pub fn weighted(&self, parameters: &WeightingParameters) -> TransitionMatrix {
        let adjusted = self.with_minimum_diagonal(parameters.m);
        let identity = TransitionMatrix::identity(adjusted.domain());

        let mut weighted = adjusted.blend(&identity, parameters.alpha);
        weighted.normalize_columns();
        weighted
    }
}

/// Builds the weighted matrix for a column straight from its values.
pub fn weighted_transition_matrix<S: AsRef<str>>(
    values: &[S],
    parameters: &WeightingParameters,
) -> TransitionMatrix {
    TransitionMatrix::from_values(values).weighted(parameters)
}
