//! Writing the cohort to a flat CSV file

use crate::cohort::Cohort;
use crate::error::Result;
use log::info;
use polars::prelude::*;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a table as comma-separated text with a header row. Dates are
/// written as YYYY-MM-DD.
pub fn save_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    CsvWriter::new(&mut writer).finish(df)?;
    writer.flush()?;
    Ok(())
}

/// Assemble the cohort into one table and write it to `path`
pub fn write_cohort_csv(path: &Path, cohort: &Cohort) -> Result<()> {
    let mut df = cohort.to_polars()?;
    save_csv(path, &mut df)?;
    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}
