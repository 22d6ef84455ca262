//! Admission history and the calendar dates derived from it.
//!
//! `days_since_last_admission` depends on whether the patient had any
//! admission in the previous six months, and the three dates are offsets
//! from a sampled admission date. These are the only columns that are
//! not drawn independently (apart from the readmission outcome).
//!

use crate::error::{GenerateError, Result};
use crate::numeric::clip_truncate;
use crate::sampler::Sampler;
use crate::seeded_column_block::{date_column, int_column, SeededColumnBlock};
use chrono::{Days, NaiveDate};
use polars::prelude::PolarsResult;
use rand_core::RngCore;

pub const MAX_ADMISSIONS: i64 = 6;
pub const LENGTH_OF_STAY_RANGE: (f64, f64) = (1.0, 30.0);
/// Half-open ranges for days since the last discharge
pub const DAYS_SINCE_WITHOUT_RECENT_ADMISSION: (i64, i64) = (90, 365);
pub const DAYS_SINCE_WITH_RECENT_ADMISSION: (i64, i64) = (5, 90);
/// Admission dates fall within this many days of the base date
pub const ADMISSION_WINDOW_DAYS: i64 = 365;

#[derive(Debug, Clone, PartialEq)]
pub struct AdmissionHistory {
    pub admissions_last_6_months: Vec<i64>,
    /// Whole days
    pub length_of_stay: Vec<i64>,
    pub days_since_last_admission: Vec<i64>,
}

impl AdmissionHistory {
    pub fn sample<R: RngCore>(sampler: &mut Sampler<R>, num_rows: usize) -> Result<Self> {
        let admissions_last_6_months: Vec<i64> = sampler
            .poisson(1.2, num_rows)?
            .into_iter()
            .map(|k| k.clamp(0, MAX_ADMISSIONS))
            .collect();

        let length_of_stay = clip_truncate(
            sampler.gamma(2.2, 3.0, num_rows)?,
            LENGTH_OF_STAY_RANGE.0,
            LENGTH_OF_STAY_RANGE.1,
        );

        // Both candidate columns are drawn in full, then picked per row
        let (low, high) = DAYS_SINCE_WITHOUT_RECENT_ADMISSION;
        let without_recent = sampler.randint(low, high, num_rows)?;
        let (low, high) = DAYS_SINCE_WITH_RECENT_ADMISSION;
        let with_recent = sampler.randint(low, high, num_rows)?;

        let days_since_last_admission = admissions_last_6_months
            .iter()
            .zip(without_recent.into_iter().zip(with_recent))
            .map(|(admissions, (without, with))| if *admissions == 0 { without } else { with })
            .collect();

        Ok(Self {
            admissions_last_6_months,
            length_of_stay,
            days_since_last_admission,
        })
    }

    pub fn column_block(&self) -> SeededColumnBlock {
        SeededColumnBlock {
            columns: vec![
                int_column("admissions_last_6_months", &self.admissions_last_6_months),
                int_column("length_of_stay", &self.length_of_stay),
                int_column("days_since_last_admission", &self.days_since_last_admission),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdmissionDates {
    pub admission_date: Vec<NaiveDate>,
    /// Admission date plus the length of stay
    pub discharge_date: Vec<NaiveDate>,
    /// Admission date minus the days since the last admission
    pub prev_discharge_date: Vec<NaiveDate>,
}

fn offset_date(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or_else(|| GenerateError::DateOutOfRange(format!("{date} offset by {days} days")))
}

impl AdmissionDates {
    /// Sample admission dates in the year after `base_date` and derive the
    /// discharge and previous discharge dates from the admission history.
    pub fn sample<R: RngCore>(
        sampler: &mut Sampler<R>,
        base_date: NaiveDate,
        history: &AdmissionHistory,
    ) -> Result<Self> {
        let num_rows = history.length_of_stay.len();
        let offsets = sampler.randint(0, ADMISSION_WINDOW_DAYS, num_rows)?;

        let admission_date = offsets
            .into_iter()
            .map(|days| offset_date(base_date, days))
            .collect::<Result<Vec<_>>>()?;
        let discharge_date = admission_date
            .iter()
            .zip(&history.length_of_stay)
            .map(|(date, stay)| offset_date(*date, *stay))
            .collect::<Result<Vec<_>>>()?;
        let prev_discharge_date = admission_date
            .iter()
            .zip(&history.days_since_last_admission)
            .map(|(date, days)| offset_date(*date, -days))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            admission_date,
            discharge_date,
            prev_discharge_date,
        })
    }

    pub fn column_block(&self) -> PolarsResult<SeededColumnBlock> {
        Ok(SeededColumnBlock {
            columns: vec![
                date_column("admission_date", &self.admission_date)?,
                date_column("discharge_date", &self.discharge_date)?,
                date_column("prev_discharge_date", &self.prev_discharge_date)?,
            ],
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::mt19937::Mt19937;

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
    }

    #[test]
    fn history_respects_bounds_and_branch() {
        let mut sampler = Sampler::new(Mt19937::new(99));
        let history = AdmissionHistory::sample(&mut sampler, 5000).unwrap();

        assert!(history
            .admissions_last_6_months
            .iter()
            .all(|k| (0..=MAX_ADMISSIONS).contains(k)));
        assert!(history.length_of_stay.iter().all(|d| (1..=30).contains(d)));

        for (admissions, days) in history
            .admissions_last_6_months
            .iter()
            .zip(&history.days_since_last_admission)
        {
            if *admissions == 0 {
                assert!((90..365).contains(days), "{admissions} {days}");
            } else {
                assert!((5..90).contains(days), "{admissions} {days}");
            }
        }
        // Poisson(1.2) gives no admissions about 30% of the time
        let none = history
            .admissions_last_6_months
            .iter()
            .filter(|k| **k == 0)
            .count();
        assert!((1200..1800).contains(&none), "{none}");
    }

    #[test]
    fn dates_follow_from_history() {
        let mut sampler = Sampler::new(Mt19937::new(5));
        let history = AdmissionHistory::sample(&mut sampler, 2000).unwrap();
        let dates = AdmissionDates::sample(&mut sampler, base_date(), &history).unwrap();

        let last_admission = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        for n in 0..2000 {
            let admitted = dates.admission_date[n];
            assert!(admitted >= base_date() && admitted <= last_admission);
            assert_eq!(
                (dates.discharge_date[n] - admitted).num_days(),
                history.length_of_stay[n]
            );
            assert_eq!(
                (admitted - dates.prev_discharge_date[n]).num_days(),
                history.days_since_last_admission[n]
            );
        }
    }

    #[test]
    fn offsets_outside_the_calendar_fail() {
        let err = offset_date(NaiveDate::MAX, 1).unwrap_err();
        assert!(matches!(err, GenerateError::DateOutOfRange(_)));
        assert_eq!(
            offset_date(base_date(), -1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 12, 31).unwrap()
        );
    }
}
