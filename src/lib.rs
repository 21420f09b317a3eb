pub mod config;
pub mod conversion;
mod error;
mod frequency;
pub mod io;
mod matrix;
mod perturbation;
mod replacer;
mod weighting;

pub use crate::error::{PramError, PramResult};
pub use crate::frequency::{frequency_table, FrequencyRow, FrequencyTable};
pub use crate::matrix::TransitionMatrix;
pub use crate::perturbation::{fit, perturb, FittedColumns, Pram, PramOptions};
pub use crate::replacer::Replacer;
pub use crate::weighting::{weighted_transition_matrix, WeightingParameters};
