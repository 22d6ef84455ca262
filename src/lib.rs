//! Synthetic CardioPulse cohort: simulated heart-failure admissions with
//! demographics, comorbidities, labs, vitals, discharge medications,
//! admission history and a 30-day readmission outcome drawn from a fixed
//! logistic risk model.

pub use cohort::{generate_cohort, sample_cohort, Cohort, PatientRecord, COLUMN_NAMES};
pub use config::{GeneratorConfig, RngEngine};
pub use error::{GenerateError, Result};
pub use export::{save_csv, write_cohort_csv};

pub mod cohort;
pub mod config;
pub mod error;
pub mod export;
pub mod mt19937;
pub mod numeric;
pub mod readmission;
pub mod sampler;
pub mod seeded_column_block;
pub mod seeded_rng;
