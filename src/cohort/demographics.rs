//! Age, sex, race and insurance columns

use crate::error::Result;
use crate::numeric::clip_truncate;
use crate::sampler::Sampler;
use crate::seeded_column_block::{int_column, label_column, SeededColumnBlock};
use rand_core::RngCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    const ALL: [Self; 2] = [Self::Male, Self::Female];
    const PROBABILITIES: [f64; 2] = [0.55, 0.45];

    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Race {
    White,
    Black,
    Hispanic,
    Asian,
    Other,
}

impl Race {
    const ALL: [Self; 5] = [
        Self::White,
        Self::Black,
        Self::Hispanic,
        Self::Asian,
        Self::Other,
    ];
    const PROBABILITIES: [f64; 5] = [0.55, 0.25, 0.12, 0.05, 0.03];

    pub fn label(self) -> &'static str {
        match self {
            Self::White => "White",
            Self::Black => "Black",
            Self::Hispanic => "Hispanic",
            Self::Asian => "Asian",
            Self::Other => "Other",
        }
    }
}

/// Primary payer for the admission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insurance {
    Medicare,
    Medicaid,
    Private,
    Uninsured,
}

impl Insurance {
    const ALL: [Self; 4] = [
        Self::Medicare,
        Self::Medicaid,
        Self::Private,
        Self::Uninsured,
    ];
    const PROBABILITIES: [f64; 4] = [0.6, 0.15, 0.2, 0.05];

    pub fn label(self) -> &'static str {
        match self {
            Self::Medicare => "Medicare",
            Self::Medicaid => "Medicaid",
            Self::Private => "Private",
            Self::Uninsured => "Uninsured",
        }
    }
}

pub const AGE_RANGE: (f64, f64) = (30.0, 95.0);

#[derive(Debug, Clone, PartialEq)]
pub struct Demographics {
    /// Whole years, from a normal(68, 12) clipped to AGE_RANGE
    pub age: Vec<i64>,
    pub sex: Vec<Sex>,
    pub race: Vec<Race>,
    pub insurance: Vec<Insurance>,
}

impl Demographics {
    pub fn sample<R: RngCore>(sampler: &mut Sampler<R>, num_rows: usize) -> Result<Self> {
        let age = clip_truncate(sampler.normal(68.0, 12.0, num_rows)?, AGE_RANGE.0, AGE_RANGE.1);
        let sex = sampler.choice(&Sex::ALL, &Sex::PROBABILITIES, num_rows)?;
        let race = sampler.choice(&Race::ALL, &Race::PROBABILITIES, num_rows)?;
        let insurance = sampler.choice(&Insurance::ALL, &Insurance::PROBABILITIES, num_rows)?;
        Ok(Self {
            age,
            sex,
            race,
            insurance,
        })
    }

    pub fn column_block(&self) -> SeededColumnBlock {
        SeededColumnBlock {
            columns: vec![
                int_column("age", &self.age),
                label_column("sex", self.sex.iter().map(|x| x.label()).collect()),
                label_column("race", self.race.iter().map(|x| x.label()).collect()),
                label_column(
                    "insurance",
                    self.insurance.iter().map(|x| x.label()).collect(),
                ),
            ],
        }
    }
}
