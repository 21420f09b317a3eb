use crate::{
    error::PramResult,
    perturbation::PramOptions,
    weighting::{WeightingParameters, DEFAULT_ALPHA, DEFAULT_MINIMUM_DIAGONAL},
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT: &str = "output.csv";

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_m() -> f64 {
    DEFAULT_MINIMUM_DIAGONAL
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PramConfig {
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_m")]
    pub m: f64,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub print_frequencies: bool,
}

impl Default for PramConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: default_output(),
            m: DEFAULT_MINIMUM_DIAGONAL,
            alpha: DEFAULT_ALPHA,
            columns: None,
            seed: None,
            print_frequencies: false,
        }
    }
}

impl PramConfig {
    pub fn options(&self) -> PramResult<PramOptions> {
        Ok(PramOptions {
            parameters: WeightingParameters::new(self.m, self.alpha)?,
            columns: self.columns.clone(),
        })
    }
}

pub fn load_config(path: &Path) -> PramResult<PramConfig> {
    let mut s = ::config::Config::default();
    s.merge(::config::File::from(path))?;
    Ok(s.try_into()?)
}
