//! Contains the functions required for turning the sampled column blocks
//! into one table. Each block of the cohort (demographics, labs, ...) is
//! generated from one seeded sampler and converts itself into a
//! SeededColumnBlock; the blocks are then concatenated left to right.
//!

use crate::numeric::round_to;
use chrono::NaiveDate;
use polars::prelude::*;

/// A set of synthetic data columns which are randomly
/// generated from one seeded sampler and which are considered
/// as one logical unit.
///
/// The purpose of the block is to be the smallest unit
/// of reproducible synthetic data. SeededColumnBlocks can
/// be combined together into a DataFrame.
///
pub struct SeededColumnBlock {
    pub columns: Vec<Series>,
}

/// Convert a list of SeededColumnBlocks (which are themselves
/// groups of columns) into a Polars dataframe. Fails if the
/// columns do not all have the same length or a name repeats.
pub fn to_polars(seeded_column_blocks: Vec<SeededColumnBlock>) -> PolarsResult<DataFrame> {
    let columns = seeded_column_blocks
        .into_iter()
        .flat_map(|x| x.columns)
        .collect::<Vec<_>>();
    DataFrame::new(columns)
}

pub fn int_column(name: &str, values: &[i64]) -> Series {
    Series::new(name, values)
}

/// Indicator column holding 0 or 1
pub fn flag_column(name: &str, values: &[i32]) -> Series {
    Series::new(name, values)
}

/// Float column rounded to a fixed number of decimals. The values stay
/// floating point even when rounded to whole numbers.
pub fn float_column(name: &str, values: &[f64], decimals: i32) -> Series {
    let rounded: Vec<f64> = values.iter().map(|x| round_to(*x, decimals)).collect();
    Series::new(name, rounded)
}

pub fn label_column(name: &str, labels: Vec<&'static str>) -> Series {
    Series::new(name, labels)
}

/// Date column, stored as days since the Unix epoch
pub fn date_column(name: &str, dates: &[NaiveDate]) -> PolarsResult<Series> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("the Unix epoch is a valid date");
    let days: Vec<i32> = dates
        .iter()
        .map(|date| (*date - epoch).num_days() as i32)
        .collect();
    Series::new(name, days).cast(&DataType::Date)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn blocks_concatenate_in_order() {
        let first = SeededColumnBlock {
            columns: vec![int_column("age", &[70, 81])],
        };
        let second = SeededColumnBlock {
            columns: vec![
                label_column("sex", vec!["Male", "Female"]),
                flag_column("ckd", &[0, 1]),
            ],
        };
        let df = to_polars(vec![first, second]).unwrap();
        assert_eq!(df.get_column_names(), vec!["age", "sex", "ckd"]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let block = SeededColumnBlock {
            columns: vec![int_column("a", &[1, 2]), int_column("b", &[1])],
        };
        assert!(to_polars(vec![block]).is_err());
    }

    #[test]
    fn float_columns_are_rounded() {
        let series = float_column("creatinine", &[1.23456, 0.999], 2);
        let values: Vec<Option<f64>> = series.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.23), Some(1.0)]);
    }

    #[test]
    fn dates_become_a_date_column() {
        let dates = [
            NaiveDate::from_ymd_opt(1970, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        ];
        let series = date_column("admission_date", &dates).unwrap();
        assert_eq!(series.dtype(), &DataType::Date);
        let days = series.cast(&DataType::Int32).unwrap();
        let days: Vec<Option<i32>> = days.i32().unwrap().into_iter().collect();
        assert_eq!(days, vec![Some(1), Some(19358)]);
    }
}
