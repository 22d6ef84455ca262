//! Generator configuration.
//!
//! The binary always runs with [`GeneratorConfig::default`]. A YAML file
//! with any subset of the fields can be read with
//! [`GeneratorConfig::from_reader`]; missing fields take their defaults.
//!

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;

pub const DEFAULT_NUM_PATIENTS: usize = 5000;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_OUTPUT_FILE: &str = "CardioPulse.csv";

/// Which source of randomness drives the sampling
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RngEngine {
    /// One Mersenne Twister stream, reproducing NumPy's legacy generator
    NumpyCompatible,
    /// An independent ChaCha8 stream per block of columns
    SeededBlocks,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of patient records (rows) to generate
    pub num_patients: usize,
    /// Global seed controlling all randomness
    pub seed: u64,
    /// Admission dates are offset from this date
    pub base_date: NaiveDate,
    /// Where the CSV is written
    pub output_path: PathBuf,
    pub engine: RngEngine,
}

/// 2023-01-01
fn default_base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).expect("2023-01-01 is a valid calendar date")
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_patients: DEFAULT_NUM_PATIENTS,
            seed: DEFAULT_SEED,
            base_date: default_base_date(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            engine: RngEngine::NumpyCompatible,
        }
    }
}

impl GeneratorConfig {
    /// Read a configuration from a YAML byte source, e.g. the
    /// result of std::fs::File::open() on a yaml file.
    pub fn from_reader<R>(reader: R) -> Result<Self>
    where
        R: Read,
    {
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }
}
