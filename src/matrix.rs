use itertools::Itertools;
use std::collections::HashMap;

/// A column-stochastic matrix over the distinct values of one column.
///
/// Entry `(target, source)` holds `P(target | source)`. Values are stored
/// column-major, so the distribution for a source value is one contiguous
/// slice.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrix {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    values: Vec<f64>,
}

impl TransitionMatrix {
    fn from_parts(domain: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(domain.len() * domain.len(), values.len());

        let index = domain
            .iter()
            .enumerate()
            .map(|(position, value)| (value.clone(), position))
            .collect();

        Self {
            domain,
            index,
            values,
        }
    }

    /// Builds the raw empirical matrix of a column.
    ///
    /// Every ordered pair of rows `(i, j)` contributes one count to
    /// `(values[i], values[j])`, so the count of a pair `(s, t)` is
    /// `freq(s) * freq(t)`. Each source column is then normalised to 1.
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Self {
        let frequencies = values.iter().map(|value| value.as_ref()).counts();

        let domain: Vec<String> = frequencies
            .keys()
            .sorted()
            .map(|value| value.to_string())
            .collect();

        let counts: Vec<f64> = domain
            .iter()
            .map(|value| frequencies[value.as_str()] as f64)
            .collect();

        let mut values = Vec::with_capacity(domain.len() * domain.len());
        for source in &counts {
            for target in &counts {
                values.push(source * target);
            }
        }

        let mut matrix = Self::from_parts(domain, values);
        matrix.normalize_columns();
        matrix
    }

    /// The matrix that maps every value to itself.
    pub fn identity(domain: &[String]) -> Self {
        let size = domain.len();
        let mut values = vec![0.0; size * size];
        for position in 0..size {
            values[position * size + position] = 1.0;
        }

        Self::from_parts(domain.to_vec(), values)
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    /// The distribution over targets for `source`, ordered like [`Self::domain`].
    pub fn column(&self, source: &str) -> Option<&[f64]> {
        self.position(source)
            .map(|position| self.column_at(position))
    }

    pub(crate) fn column_at(&self, position: usize) -> &[f64] {
        let size = self.len();
        &self.values[position * size..(position + 1) * size]
    }

    pub(crate) fn column_at_mut(&mut self, position: usize) -> &mut [f64] {
        let size = self.len();
        &mut self.values[position * size..(position + 1) * size]
    }

    pub fn probability(&self, target: &str, source: &str) -> Option<f64> {
        let target = self.position(target)?;
        self.column(source).map(|column| column[target])
    }

    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.len())
            .map(|position| self.column_at(position)[position])
            .collect()
    }

    pub(crate) fn set_diagonal(&mut self, diagonal: &[f64]) {
        for (position, value) in diagonal.iter().enumerate() {
            self.column_at_mut(position)[position] = *value;
        }
    }

    pub fn column_sums(&self) -> Vec<f64> {
        (0..self.len())
            .map(|position| self.column_at(position).iter().sum())
            .collect()
    }

    pub fn is_column_stochastic(&self, tolerance: f64) -> bool {
        self.column_sums()
            .iter()
            .all(|sum| (sum - 1.0).abs() <= tolerance)
    }

    /// Scales every column so that it sums to 1. Columns summing to zero are
    /// left untouched.
    pub(crate) fn normalize_columns(&mut self) {
        for position in 0..self.len() {
            let column = self.column_at_mut(position);
            let sum: f64 = column.iter().sum();
            if sum > 0.0 {
                column.iter_mut().for_each(|value| *value /= sum);
            }
        }
    }

    /// Element-wise `weight * self + (1 - weight) * other`.
    pub(crate) fn blend(&self, other: &TransitionMatrix, weight: f64) -> TransitionMatrix {
        debug_assert_eq!(self.domain, other.domain);

        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(left, right)| weight * left + (1.0 - weight) * right)
            .collect();

        Self::from_parts(self.domain.clone(), values)
    }
}
