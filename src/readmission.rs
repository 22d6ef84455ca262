//! Ground-truth 30-day readmission model.
//!
//! A fixed linear risk score over a handful of features is mapped through
//! the logistic function to a per-patient probability, and the outcome is
//! one Bernoulli draw with that probability. The score uses the unrounded
//! lab values.
//!

use crate::cohort::{AdmissionHistory, Comorbidities, Labs, Medications};
use crate::error::Result;
use crate::sampler::Sampler;
use rand_core::RngCore;

/// Hyponatraemia threshold (mmol/L)
pub const LOW_SODIUM: f64 = 135.0;
/// Number of recent admissions counted as frequent
pub const FREQUENT_ADMISSIONS: i64 = 2;

/// The features that enter the risk score for one patient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskFactors {
    pub bnp: f64,
    pub sodium: f64,
    pub admissions_last_6_months: i64,
    pub length_of_stay: i64,
    pub ckd: bool,
    pub copd: bool,
    pub beta_blocker: bool,
    pub ace_inhibitor: bool,
}

fn indicator(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

/// Linear risk score. Terms are summed left to right in a fixed order,
/// which matters for reproducing the outcome column bit for bit.
pub fn risk_score(factors: &RiskFactors) -> f64 {
    0.004 * factors.bnp + 0.8 * indicator(factors.sodium < LOW_SODIUM)
        + 1.2 * indicator(factors.admissions_last_6_months >= FREQUENT_ADMISSIONS)
        + 0.04 * factors.length_of_stay as f64
        + 0.6 * indicator(factors.ckd)
        + 0.4 * indicator(factors.copd)
        - 0.5 * indicator(factors.beta_blocker)
        - 0.4 * indicator(factors.ace_inhibitor)
}

pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Probability of readmission within 30 days
pub fn readmission_probability(factors: &RiskFactors) -> f64 {
    logistic(risk_score(factors))
}

/// Gather the risk factors for every row of the sampled columns
pub fn risk_factors(
    labs: &Labs,
    comorbidities: &Comorbidities,
    medications: &Medications,
    history: &AdmissionHistory,
) -> Vec<RiskFactors> {
    (0..labs.bnp.len())
        .map(|n| RiskFactors {
            bnp: labs.bnp[n],
            sodium: labs.sodium[n],
            admissions_last_6_months: history.admissions_last_6_months[n],
            length_of_stay: history.length_of_stay[n],
            ckd: comorbidities.ckd[n] == 1,
            copd: comorbidities.copd[n] == 1,
            beta_blocker: medications.beta_blocker[n] == 1,
            ace_inhibitor: medications.ace_inhibitor[n] == 1,
        })
        .collect()
}

/// Draw the readmitted_30d column, 0 or 1 per row
pub fn sample_readmissions<R: RngCore>(
    sampler: &mut Sampler<R>,
    factors: &[RiskFactors],
) -> Result<Vec<i32>> {
    let probabilities: Vec<f64> = factors.iter().map(readmission_probability).collect();
    sampler.bernoulli_each(&probabilities)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::mt19937::Mt19937;

    /// A low-risk patient on both protective medications
    fn treated_patient() -> RiskFactors {
        RiskFactors {
            bnp: 0.0,
            sodium: 140.0,
            admissions_last_6_months: 0,
            length_of_stay: 1,
            ckd: false,
            copd: false,
            beta_blocker: true,
            ace_inhibitor: true,
        }
    }

    #[test]
    fn logistic_is_centred_at_one_half() {
        assert_eq!(logistic(0.0), 0.5);
        assert!((logistic(2.0) + logistic(-2.0) - 1.0).abs() < 1e-15);
        assert_eq!(logistic(50.0), 1.0);
    }

    #[test]
    fn medications_lower_the_score_by_nine_tenths() {
        let factors = RiskFactors {
            length_of_stay: 0,
            ..treated_patient()
        };
        assert!((risk_score(&factors) + 0.9).abs() < 1e-12);
        let p = readmission_probability(&factors);
        assert!((p - 1.0 / (1.0 + 0.9f64.exp())).abs() < 1e-12);
        assert!((p - 0.289).abs() < 5e-4);
    }

    #[test]
    fn one_day_stay_adds_four_hundredths() {
        let factors = treated_patient();
        assert!((risk_score(&factors) + 0.86).abs() < 1e-12);
        assert!((readmission_probability(&factors) - 0.2973).abs() < 5e-4);
    }

    #[test]
    fn each_risk_term_contributes_its_weight() {
        let base = RiskFactors {
            bnp: 0.0,
            sodium: 140.0,
            admissions_last_6_months: 0,
            length_of_stay: 0,
            ckd: false,
            copd: false,
            beta_blocker: false,
            ace_inhibitor: false,
        };
        assert_eq!(risk_score(&base), 0.0);

        let cases = [
            (RiskFactors { bnp: 1000.0, ..base }, 4.0),
            (RiskFactors { sodium: 134.9, ..base }, 0.8),
            (RiskFactors { sodium: 135.0, ..base }, 0.0),
            (RiskFactors { admissions_last_6_months: 1, ..base }, 0.0),
            (RiskFactors { admissions_last_6_months: 2, ..base }, 1.2),
            (RiskFactors { length_of_stay: 10, ..base }, 0.4),
            (RiskFactors { ckd: true, ..base }, 0.6),
            (RiskFactors { copd: true, ..base }, 0.4),
            (RiskFactors { beta_blocker: true, ..base }, -0.5),
            (RiskFactors { ace_inhibitor: true, ..base }, -0.4),
        ];
        for (factors, expected) in cases {
            assert!((risk_score(&factors) - expected).abs() < 1e-12, "{factors:?}");
        }
    }

    #[test]
    fn outcomes_track_probabilities() {
        let mut sampler = Sampler::new(Mt19937::new(17));
        let high = RiskFactors {
            bnp: 20_000.0,
            ..treated_patient()
        };
        let low = RiskFactors {
            length_of_stay: 0,
            ..treated_patient()
        };
        let outcomes_high = sample_readmissions(&mut sampler, &vec![high; 2000]).unwrap();
        let outcomes_low = sample_readmissions(&mut sampler, &vec![low; 2000]).unwrap();

        assert!(outcomes_high.iter().all(|x| *x == 1));
        let rate_low = outcomes_low.iter().sum::<i32>() as f64 / 2000.0;
        assert!((rate_low - 0.289).abs() < 0.04, "{rate_low}");
    }
}
