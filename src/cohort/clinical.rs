//! Comorbidities, laboratory results, vital signs and discharge
//! medications. Every column here is drawn independently of the others.

use crate::error::Result;
use crate::numeric::clip_all;
use crate::sampler::Sampler;
use crate::seeded_column_block::{flag_column, float_column, SeededColumnBlock};
use rand_core::RngCore;

/// Clinical range a continuous measurement is clipped to
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub lower: f64,
    pub upper: f64,
}

impl Range {
    const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

pub const CREATININE_RANGE: Range = Range::new(0.6, 5.0);
pub const SODIUM_RANGE: Range = Range::new(120.0, 150.0);
pub const HEMOGLOBIN_RANGE: Range = Range::new(7.0, 18.0);
pub const SBP_RANGE: Range = Range::new(80.0, 200.0);
pub const DBP_RANGE: Range = Range::new(40.0, 120.0);
pub const HEART_RATE_RANGE: Range = Range::new(40.0, 140.0);

/// Decimal places kept when the columns are written out
pub const BNP_DECIMALS: i32 = 1;
pub const CREATININE_DECIMALS: i32 = 2;
pub const SODIUM_DECIMALS: i32 = 1;
pub const HEMOGLOBIN_DECIMALS: i32 = 1;
pub const VITALS_DECIMALS: i32 = 0;

/// Draw a normal column and clip it to a clinical range
fn clipped_normal<R: RngCore>(
    sampler: &mut Sampler<R>,
    loc: f64,
    scale: f64,
    range: Range,
    num_rows: usize,
) -> Result<Vec<f64>> {
    Ok(clip_all(
        sampler.normal(loc, scale, num_rows)?,
        range.lower,
        range.upper,
    ))
}

/// Pre-existing conditions, each 0 or 1
#[derive(Debug, Clone, PartialEq)]
pub struct Comorbidities {
    pub diabetes: Vec<i32>,
    pub hypertension: Vec<i32>,
    /// Chronic kidney disease
    pub ckd: Vec<i32>,
    /// Chronic obstructive pulmonary disease
    pub copd: Vec<i32>,
}

impl Comorbidities {
    pub fn sample<R: RngCore>(sampler: &mut Sampler<R>, num_rows: usize) -> Result<Self> {
        Ok(Self {
            diabetes: sampler.bernoulli(0.4, num_rows)?,
            hypertension: sampler.bernoulli(0.7, num_rows)?,
            ckd: sampler.bernoulli(0.3, num_rows)?,
            copd: sampler.bernoulli(0.25, num_rows)?,
        })
    }

    pub fn column_block(&self) -> SeededColumnBlock {
        SeededColumnBlock {
            columns: vec![
                flag_column("diabetes", &self.diabetes),
                flag_column("hypertension", &self.hypertension),
                flag_column("ckd", &self.ckd),
                flag_column("copd", &self.copd),
            ],
        }
    }
}

/// Laboratory results at full precision
#[derive(Debug, Clone, PartialEq)]
pub struct Labs {
    /// B-type natriuretic peptide (pg/mL), log-normal and unclipped
    pub bnp: Vec<f64>,
    /// mg/dL
    pub creatinine: Vec<f64>,
    /// mmol/L
    pub sodium: Vec<f64>,
    /// g/dL
    pub hemoglobin: Vec<f64>,
}

impl Labs {
    pub fn sample<R: RngCore>(sampler: &mut Sampler<R>, num_rows: usize) -> Result<Self> {
        let bnp = sampler.lognormal(6.5, 0.7, num_rows)?;
        let creatinine = clipped_normal(sampler, 1.6, 0.6, CREATININE_RANGE, num_rows)?;
        let sodium = clipped_normal(sampler, 137.0, 4.0, SODIUM_RANGE, num_rows)?;
        let hemoglobin = clipped_normal(sampler, 12.5, 1.8, HEMOGLOBIN_RANGE, num_rows)?;
        Ok(Self {
            bnp,
            creatinine,
            sodium,
            hemoglobin,
        })
    }

    pub fn column_block(&self) -> SeededColumnBlock {
        SeededColumnBlock {
            columns: vec![
                float_column("bnp", &self.bnp, BNP_DECIMALS),
                float_column("creatinine", &self.creatinine, CREATININE_DECIMALS),
                float_column("sodium", &self.sodium, SODIUM_DECIMALS),
                float_column("hemoglobin", &self.hemoglobin, HEMOGLOBIN_DECIMALS),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vitals {
    /// Systolic blood pressure (mmHg)
    pub sbp: Vec<f64>,
    /// Diastolic blood pressure (mmHg)
    pub dbp: Vec<f64>,
    /// Beats per minute
    pub heart_rate: Vec<f64>,
}

impl Vitals {
    pub fn sample<R: RngCore>(sampler: &mut Sampler<R>, num_rows: usize) -> Result<Self> {
        let sbp = clipped_normal(sampler, 130.0, 20.0, SBP_RANGE, num_rows)?;
        let dbp = clipped_normal(sampler, 75.0, 12.0, DBP_RANGE, num_rows)?;
        let heart_rate = clipped_normal(sampler, 82.0, 15.0, HEART_RATE_RANGE, num_rows)?;
        Ok(Self {
            sbp,
            dbp,
            heart_rate,
        })
    }

    pub fn column_block(&self) -> SeededColumnBlock {
        SeededColumnBlock {
            columns: vec![
                float_column("sbp", &self.sbp, VITALS_DECIMALS),
                float_column("dbp", &self.dbp, VITALS_DECIMALS),
                float_column("heart_rate", &self.heart_rate, VITALS_DECIMALS),
            ],
        }
    }
}

/// Medications at discharge, each 0 or 1
#[derive(Debug, Clone, PartialEq)]
pub struct Medications {
    pub ace_inhibitor: Vec<i32>,
    pub beta_blocker: Vec<i32>,
    pub diuretic: Vec<i32>,
}

impl Medications {
    pub fn sample<R: RngCore>(sampler: &mut Sampler<R>, num_rows: usize) -> Result<Self> {
        Ok(Self {
            ace_inhibitor: sampler.bernoulli(0.65, num_rows)?,
            beta_blocker: sampler.bernoulli(0.75, num_rows)?,
            diuretic: sampler.bernoulli(0.8, num_rows)?,
        })
    }

    pub fn column_block(&self) -> SeededColumnBlock {
        SeededColumnBlock {
            columns: vec![
                flag_column("ace_inhibitor", &self.ace_inhibitor),
                flag_column("beta_blocker", &self.beta_blocker),
                flag_column("diuretic", &self.diuretic),
            ],
        }
    }
}
