//! The synthetic CardioPulse cohort.
//!
//! A cohort is a set of simulated heart-failure admissions. It is sampled
//! column by column, one block of related columns at a time, in this
//! order:
//! * demographics (age, sex, race, insurance)
//! * comorbidities
//! * laboratory results
//! * vital signs
//! * discharge medications
//! * admission history (prior admissions, length of stay, days since
//!   the last admission)
//! * admission, discharge and previous discharge dates
//! * the 30-day readmission outcome, which depends on the columns above
//!
//! The order matters for the NumPy-compatible engine, where all blocks
//! share a single random stream.
//!

use crate::config::{GeneratorConfig, RngEngine};
use crate::error::Result;
use crate::numeric::round_to;
use crate::readmission::{risk_factors, sample_readmissions};
use crate::seeded_column_block::{flag_column, to_polars, SeededColumnBlock};
use crate::seeded_rng::{BlockSampler, NumpyStream, SeededBlocks};
use chrono::NaiveDate;
use log::{debug, info};
use polars::frame::DataFrame;

pub use admissions::{AdmissionDates, AdmissionHistory};
pub use clinical::{Comorbidities, Labs, Medications, Vitals};
pub use demographics::{Demographics, Insurance, Race, Sex};

pub mod admissions;
pub mod clinical;
pub mod demographics;

/// Output columns, in file order
pub const COLUMN_NAMES: [&str; 25] = [
    "age",
    "sex",
    "race",
    "insurance",
    "diabetes",
    "hypertension",
    "ckd",
    "copd",
    "bnp",
    "creatinine",
    "sodium",
    "hemoglobin",
    "sbp",
    "dbp",
    "heart_rate",
    "ace_inhibitor",
    "beta_blocker",
    "diuretic",
    "admissions_last_6_months",
    "length_of_stay",
    "days_since_last_admission",
    "admission_date",
    "discharge_date",
    "prev_discharge_date",
    "readmitted_30d",
];

/// One row of the exported table. Continuous values are rounded the way
/// they are written out.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub age: i64,
    pub sex: Sex,
    pub race: Race,
    pub insurance: Insurance,
    pub diabetes: i32,
    pub hypertension: i32,
    pub ckd: i32,
    pub copd: i32,
    pub bnp: f64,
    pub creatinine: f64,
    pub sodium: f64,
    pub hemoglobin: f64,
    pub sbp: f64,
    pub dbp: f64,
    pub heart_rate: f64,
    pub ace_inhibitor: i32,
    pub beta_blocker: i32,
    pub diuretic: i32,
    pub admissions_last_6_months: i64,
    pub length_of_stay: i64,
    pub days_since_last_admission: i64,
    pub admission_date: NaiveDate,
    pub discharge_date: NaiveDate,
    pub prev_discharge_date: NaiveDate,
    pub readmitted_30d: i32,
}

/// All sampled columns, row-aligned. Built once and not modified after.
#[derive(Debug, Clone, PartialEq)]
pub struct Cohort {
    pub demographics: Demographics,
    pub comorbidities: Comorbidities,
    pub labs: Labs,
    pub vitals: Vitals,
    pub medications: Medications,
    pub history: AdmissionHistory,
    pub dates: AdmissionDates,
    pub readmitted_30d: Vec<i32>,
}

/// Generate a cohort using the engine named in the configuration
pub fn generate_cohort(config: &GeneratorConfig) -> Result<Cohort> {
    info!(
        "Generating {} patients with seed {} ({:?} engine)",
        config.num_patients, config.seed, config.engine
    );
    match config.engine {
        RngEngine::NumpyCompatible => {
            let mut source = NumpyStream::new(config.seed)?;
            sample_cohort(&mut source, config.num_patients, config.base_date)
        }
        RngEngine::SeededBlocks => {
            let mut source = SeededBlocks::new(config.seed);
            sample_cohort(&mut source, config.num_patients, config.base_date)
        }
    }
}

/// Sample every block of the cohort from `source`, in file order
pub fn sample_cohort<S: BlockSampler>(
    source: &mut S,
    num_rows: usize,
    base_date: NaiveDate,
) -> Result<Cohort> {
    let demographics = Demographics::sample(source.block("demographics"), num_rows)?;
    debug!("Sampled demographics");
    let comorbidities = Comorbidities::sample(source.block("comorbidities"), num_rows)?;
    debug!("Sampled comorbidities");
    let labs = Labs::sample(source.block("labs"), num_rows)?;
    debug!("Sampled labs");
    let vitals = Vitals::sample(source.block("vitals"), num_rows)?;
    debug!("Sampled vitals");
    let medications = Medications::sample(source.block("medications"), num_rows)?;
    debug!("Sampled medications");
    let history = AdmissionHistory::sample(source.block("admission_history"), num_rows)?;
    debug!("Sampled admission history");
    let dates = AdmissionDates::sample(source.block("admission_dates"), base_date, &history)?;
    debug!("Derived admission dates");

    let factors = risk_factors(&labs, &comorbidities, &medications, &history);
    let readmitted_30d = sample_readmissions(source.block("readmission"), &factors)?;
    debug!("Sampled readmission outcomes");

    Ok(Cohort {
        demographics,
        comorbidities,
        labs,
        vitals,
        medications,
        history,
        dates,
        readmitted_30d,
    })
}

impl Cohort {
    /// Number of patients (rows)
    pub fn len(&self) -> usize {
        self.readmitted_30d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readmitted_30d.is_empty()
    }

    /// Mean of readmitted_30d, rounded to 3 decimals (NaN for an empty
    /// cohort)
    pub fn readmission_rate(&self) -> f64 {
        let readmitted: i64 = self.readmitted_30d.iter().map(|x| *x as i64).sum();
        round_to(readmitted as f64 / self.len() as f64, 3)
    }

    /// The nth row, as it appears in the exported table
    pub fn record(&self, n: usize) -> PatientRecord {
        let labs = &self.labs;
        let vitals = &self.vitals;
        PatientRecord {
            age: self.demographics.age[n],
            sex: self.demographics.sex[n],
            race: self.demographics.race[n],
            insurance: self.demographics.insurance[n],
            diabetes: self.comorbidities.diabetes[n],
            hypertension: self.comorbidities.hypertension[n],
            ckd: self.comorbidities.ckd[n],
            copd: self.comorbidities.copd[n],
            bnp: round_to(labs.bnp[n], clinical::BNP_DECIMALS),
            creatinine: round_to(labs.creatinine[n], clinical::CREATININE_DECIMALS),
            sodium: round_to(labs.sodium[n], clinical::SODIUM_DECIMALS),
            hemoglobin: round_to(labs.hemoglobin[n], clinical::HEMOGLOBIN_DECIMALS),
            sbp: round_to(vitals.sbp[n], clinical::VITALS_DECIMALS),
            dbp: round_to(vitals.dbp[n], clinical::VITALS_DECIMALS),
            heart_rate: round_to(vitals.heart_rate[n], clinical::VITALS_DECIMALS),
            ace_inhibitor: self.medications.ace_inhibitor[n],
            beta_blocker: self.medications.beta_blocker[n],
            diuretic: self.medications.diuretic[n],
            admissions_last_6_months: self.history.admissions_last_6_months[n],
            length_of_stay: self.history.length_of_stay[n],
            days_since_last_admission: self.history.days_since_last_admission[n],
            admission_date: self.dates.admission_date[n],
            discharge_date: self.dates.discharge_date[n],
            prev_discharge_date: self.dates.prev_discharge_date[n],
            readmitted_30d: self.readmitted_30d[n],
        }
    }

    pub fn records(&self) -> impl Iterator<Item = PatientRecord> + '_ {
        (0..self.len()).map(|n| self.record(n))
    }

    /// Assemble the export table, one block of columns at a time
    pub fn to_polars(&self) -> Result<DataFrame> {
        let blocks = vec![
            self.demographics.column_block(),
            self.comorbidities.column_block(),
            self.labs.column_block(),
            self.vitals.column_block(),
            self.medications.column_block(),
            self.history.column_block(),
            self.dates.column_block()?,
            SeededColumnBlock {
                columns: vec![flag_column("readmitted_30d", &self.readmitted_30d)],
            },
        ];
        Ok(to_polars(blocks)?)
    }
}
