//! Vectorised random variates over any 32-bit word source.
//!
//! The algorithms are the ones NumPy's legacy `RandomState` uses, so that
//! when the word source is an [`Mt19937`](crate::mt19937::Mt19937) seeded
//! the same way, every column matches what `numpy.random` draws for that
//! seed. Each function draws `n` values with one set of parameters,
//! consuming words in row order.
//!

use crate::error::{GenerateError, Result};
use rand_core::RngCore;

/// Coefficients of the Stirling series used by `log_gamma`
const LOG_GAMMA_COEFFICIENTS: [f64; 10] = [
    8.333333333333333e-02,
    -2.777777777777778e-03,
    7.936507936507937e-04,
    -5.952380952380952e-04,
    8.417508417508418e-04,
    -1.917526917526918e-03,
    6.410256410256410e-03,
    -2.955065359477124e-02,
    1.796443723688307e-01,
    -1.39243221690590e+00,
];

/// A random variate generator wrapping a word source.
///
/// The polar Box-Muller method produces Gaussians in pairs; the spare one
/// is cached here and handed out by the next Gaussian draw, whichever
/// distribution asks for it.
pub struct Sampler<R> {
    rng: R,
    spare_gauss: Option<f64>,
}

impl<R: RngCore> Sampler<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            spare_gauss: None,
        }
    }

    /// Uniform double in [0, 1) with 53 bits of randomness
    pub fn next_double(&mut self) -> f64 {
        let a = self.rng.next_u32() >> 5;
        let b = self.rng.next_u32() >> 6;
        (a as f64 * 67_108_864.0 + b as f64) / 9_007_199_254_740_992.0
    }

    fn gauss(&mut self) -> f64 {
        if let Some(spare) = self.spare_gauss.take() {
            return spare;
        }
        loop {
            let x1 = 2.0 * self.next_double() - 1.0;
            let x2 = 2.0 * self.next_double() - 1.0;
            let r2 = x1 * x1 + x2 * x2;
            if r2 < 1.0 && r2 != 0.0 {
                let f = (-2.0 * r2.ln() / r2).sqrt();
                self.spare_gauss = Some(f * x1);
                return f * x2;
            }
        }
    }

    fn standard_exponential(&mut self) -> f64 {
        -(1.0 - self.next_double()).ln()
    }

    fn standard_gamma(&mut self, shape: f64) -> f64 {
        if shape == 1.0 {
            return self.standard_exponential();
        }
        if shape == 0.0 {
            return 0.0;
        }
        if shape < 1.0 {
            loop {
                let u = self.next_double();
                let v = self.standard_exponential();
                if u <= 1.0 - shape {
                    let x = u.powf(1.0 / shape);
                    if x <= v {
                        return x;
                    }
                } else {
                    let y = -((1.0 - u) / shape).ln();
                    let x = (1.0 - shape + shape * y).powf(1.0 / shape);
                    if x <= v + y {
                        return x;
                    }
                }
            }
        }

        // Marsaglia and Tsang
        let b = shape - 1.0 / 3.0;
        let c = 1.0 / (9.0 * b).sqrt();
        loop {
            let (x, mut v) = loop {
                let x = self.gauss();
                let v = 1.0 + c * x;
                if v > 0.0 {
                    break (x, v);
                }
            };
            v = v * v * v;
            let u = self.next_double();
            if u < 1.0 - 0.0331 * (x * x) * (x * x) {
                return b * v;
            }
            if u.ln() < 0.5 * x * x + b * (1.0 - v + v.ln()) {
                return b * v;
            }
        }
    }

    fn poisson_multiplication(&mut self, lam: f64) -> i64 {
        let enlam = (-lam).exp();
        let mut count = 0;
        let mut prod = 1.0;
        loop {
            prod *= self.next_double();
            if prod > enlam {
                count += 1;
            } else {
                return count;
            }
        }
    }

    /// Transformed rejection with squeeze (Hörmann), for larger means
    fn poisson_ptrs(&mut self, lam: f64) -> i64 {
        let slam = lam.sqrt();
        let loglam = lam.ln();
        let b = 0.931 + 2.53 * slam;
        let a = -0.059 + 0.02483 * b;
        let invalpha = 1.1239 + 1.1328 / (b - 3.4);
        let vr = 0.9277 - 3.6224 / (b - 2.0);

        loop {
            let u = self.next_double() - 0.5;
            let v = self.next_double();
            let us = 0.5 - u.abs();
            let k = ((2.0 * a / us + b) * u + lam + 0.43).floor() as i64;
            if us >= 0.07 && v <= vr {
                return k;
            }
            if k < 0 || (us < 0.013 && v > us) {
                continue;
            }
            if v.ln() + invalpha.ln() - (a / (us * us) + b).ln()
                <= -lam + k as f64 * loglam - log_gamma(k as f64 + 1.0)
            {
                return k;
            }
        }
    }

    fn binomial_inversion(&mut self, n: i64, p: f64) -> i64 {
        let q = 1.0 - p;
        let qn = (n as f64 * q.ln()).exp();
        let np = n as f64 * p;
        let bound = (n as f64).min(np + 10.0 * (np * q + 1.0).sqrt()) as i64;

        let mut x = 0;
        let mut px = qn;
        let mut u = self.next_double();
        while u > px {
            x += 1;
            if x > bound {
                x = 0;
                px = qn;
                u = self.next_double();
            } else {
                u -= px;
                px = ((n - x + 1) as f64 * p * px) / (x as f64 * q);
            }
        }
        x
    }

    /// One Bernoulli trial, reflected so the inversion always runs on the
    /// less likely outcome.
    fn bernoulli_trial(&mut self, p: f64) -> i32 {
        if p <= 0.5 {
            self.binomial_inversion(1, p) as i32
        } else {
            1 - self.binomial_inversion(1, 1.0 - p) as i32
        }
    }

    pub fn normal(&mut self, loc: f64, scale: f64, n: usize) -> Result<Vec<f64>> {
        check_non_negative("normal", "scale", scale)?;
        Ok((0..n).map(|_| loc + scale * self.gauss()).collect())
    }

    /// Log-normal with `mean` and `sigma` given for the underlying normal
    pub fn lognormal(&mut self, mean: f64, sigma: f64, n: usize) -> Result<Vec<f64>> {
        check_non_negative("lognormal", "sigma", sigma)?;
        Ok((0..n).map(|_| (mean + sigma * self.gauss()).exp()).collect())
    }

    pub fn gamma(&mut self, shape: f64, scale: f64, n: usize) -> Result<Vec<f64>> {
        check_non_negative("gamma", "shape", shape)?;
        check_non_negative("gamma", "scale", scale)?;
        Ok((0..n).map(|_| scale * self.standard_gamma(shape)).collect())
    }

    pub fn poisson(&mut self, lam: f64, n: usize) -> Result<Vec<i64>> {
        check_non_negative("poisson", "lambda", lam)?;
        if !lam.is_finite() {
            return Err(GenerateError::invalid("poisson", "lambda must be finite"));
        }
        Ok((0..n)
            .map(|_| {
                if lam >= 10.0 {
                    self.poisson_ptrs(lam)
                } else if lam == 0.0 {
                    0
                } else {
                    self.poisson_multiplication(lam)
                }
            })
            .collect())
    }

    /// `n` Bernoulli trials with a shared success probability, as 0/1
    pub fn bernoulli(&mut self, p: f64, n: usize) -> Result<Vec<i32>> {
        check_probability("bernoulli", p)?;
        Ok((0..n).map(|_| self.bernoulli_trial(p)).collect())
    }

    /// One Bernoulli trial per entry of `probs`, in order
    pub fn bernoulli_each(&mut self, probs: &[f64]) -> Result<Vec<i32>> {
        for p in probs {
            check_probability("bernoulli", *p)?;
        }
        Ok(probs.iter().map(|p| self.bernoulli_trial(*p)).collect())
    }

    /// Uniform integers in the half-open range [low, high)
    pub fn randint(&mut self, low: i64, high: i64, n: usize) -> Result<Vec<i64>> {
        if low >= high {
            return Err(GenerateError::invalid(
                "randint",
                format!("low ({low}) must be below high ({high})"),
            ));
        }
        let range = u32::try_from(high - 1 - low).map_err(|_| {
            GenerateError::invalid("randint", "range does not fit in 32 bits")
        })?;
        if range == 0 {
            return Ok(vec![low; n]);
        }

        // Smallest all-ones mask covering the range
        let mut mask = range;
        mask |= mask >> 1;
        mask |= mask >> 2;
        mask |= mask >> 4;
        mask |= mask >> 8;
        mask |= mask >> 16;

        Ok((0..n)
            .map(|_| loop {
                let value = self.rng.next_u32() & mask;
                if value <= range {
                    break low + value as i64;
                }
            })
            .collect())
    }

    /// Pick `n` labels at random, label `i` with probability `probs[i]`
    pub fn choice<T: Copy>(&mut self, labels: &[T], probs: &[f64], n: usize) -> Result<Vec<T>> {
        if labels.is_empty() {
            return Err(GenerateError::invalid("choice", "no labels to choose from"));
        }
        if labels.len() != probs.len() {
            return Err(GenerateError::invalid(
                "choice",
                format!("{} labels but {} probabilities", labels.len(), probs.len()),
            ));
        }
        for p in probs {
            check_probability("choice", *p)?;
        }
        let total: f64 = probs.iter().sum();
        if (total - 1.0).abs() > f64::EPSILON.sqrt() {
            return Err(GenerateError::invalid(
                "choice",
                format!("probabilities sum to {total}, not 1"),
            ));
        }

        let mut cdf: Vec<f64> = probs
            .iter()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .collect();
        let last = cdf[cdf.len() - 1];
        for c in cdf.iter_mut() {
            *c /= last;
        }

        let uniforms: Vec<f64> = (0..n).map(|_| self.next_double()).collect();
        Ok(uniforms
            .into_iter()
            .map(|u| {
                let idx = cdf.partition_point(|c| *c <= u);
                labels[idx.min(labels.len() - 1)]
            })
            .collect())
    }
}

fn check_non_negative(distribution: &'static str, name: &str, value: f64) -> Result<()> {
    // Written this way round so that NaN is rejected too
    if value >= 0.0 {
        Ok(())
    } else {
        Err(GenerateError::invalid(
            distribution,
            format!("{name} must be non-negative, got {value}"),
        ))
    }
}

fn check_probability(distribution: &'static str, p: f64) -> Result<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(GenerateError::invalid(
            distribution,
            format!("probability must lie in [0, 1], got {p}"),
        ))
    }
}

/// Natural log of the gamma function
fn log_gamma(x: f64) -> f64 {
    if x == 1.0 || x == 2.0 {
        return 0.0;
    }
    let n = if x < 7.0 { (7.0 - x) as i64 } else { 0 };
    let mut x0 = x + n as f64;
    let x2 = (1.0 / x0) * (1.0 / x0);
    let lg2pi = 1.8378770664093453e+00;

    let mut gl0 = LOG_GAMMA_COEFFICIENTS[9];
    for coefficient in LOG_GAMMA_COEFFICIENTS[..9].iter().rev() {
        gl0 *= x2;
        gl0 += coefficient;
    }
    let mut gl = gl0 / x0 + 0.5 * lg2pi + (x0 - 0.5) * x0.ln() - x0;
    if x < 7.0 {
        for _ in 1..=n {
            gl -= (x0 - 1.0).ln();
            x0 -= 1.0;
        }
    }
    gl
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::mt19937::Mt19937;

    fn numpy_sampler(seed: u32) -> Sampler<Mt19937> {
        Sampler::new(Mt19937::new(seed))
    }

    fn assert_close(found: &[f64], expected: &[f64]) {
        assert_eq!(found.len(), expected.len());
        for (f, e) in found.iter().zip(expected) {
            assert!((f - e).abs() < 1e-12, "{f} != {e}");
        }
    }

    fn mean(values: impl Iterator<Item = f64>) -> f64 {
        let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        sum / count as f64
    }

    /// np.random.seed(42); np.random.rand(3)
    #[test]
    fn uniform_matches_numpy_seed_42() {
        let mut sampler = numpy_sampler(42);
        let found: Vec<f64> = (0..3).map(|_| sampler.next_double()).collect();
        assert_close(
            &found,
            &[0.3745401188473625, 0.9507143064099162, 0.7319939418114051],
        );
    }

    /// np.random.seed(42); np.random.randn(5)
    #[test]
    fn standard_normal_matches_numpy_seed_42() {
        let mut sampler = numpy_sampler(42);
        let found = sampler.normal(0.0, 1.0, 5).unwrap();
        assert_close(
            &found,
            &[
                0.4967141530112327,
                -0.13826430117118466,
                0.6476885381006925,
                1.5230298564080254,
                -0.23415337472333597,
            ],
        );
    }

    /// np.random.seed(42); np.random.randint(0, 10, 5)
    #[test]
    fn randint_matches_numpy_seed_42() {
        let mut sampler = numpy_sampler(42);
        assert_eq!(sampler.randint(0, 10, 5).unwrap(), vec![6, 3, 7, 4, 6]);
    }

    #[test]
    fn spare_gaussian_carries_over_between_calls() {
        let mut one_call = numpy_sampler(42);
        let mut two_calls = numpy_sampler(42);
        let all = one_call.normal(0.0, 1.0, 3).unwrap();
        let mut split = two_calls.normal(0.0, 1.0, 1).unwrap();
        split.extend(two_calls.normal(0.0, 1.0, 2).unwrap());
        assert_close(&all, &split);
    }

    #[test]
    fn lognormal_is_exponential_of_normal() {
        let normal = numpy_sampler(3).normal(6.5, 0.7, 10).unwrap();
        let lognormal = numpy_sampler(3).lognormal(6.5, 0.7, 10).unwrap();
        let expected: Vec<f64> = normal.iter().map(|x| x.exp()).collect();
        assert_close(&lognormal, &expected);
    }

    #[test]
    fn randint_stays_in_half_open_range() {
        let mut sampler = numpy_sampler(1);
        let values = sampler.randint(5, 90, 10_000).unwrap();
        assert!(values.iter().all(|v| (5..90).contains(v)));
        assert!(values.contains(&5));
        assert!(values.contains(&89));
    }

    #[test]
    fn randint_with_single_value_consumes_nothing() {
        let mut sampler = numpy_sampler(42);
        assert_eq!(sampler.randint(3, 4, 4).unwrap(), vec![3; 4]);
        assert_eq!(sampler.randint(0, 10, 1).unwrap(), vec![6]);
    }

    #[test]
    fn poisson_small_and_large_means() {
        let mut sampler = numpy_sampler(11);
        let small = sampler.poisson(1.2, 20_000).unwrap();
        assert!(small.iter().all(|k| *k >= 0));
        let small_mean = mean(small.iter().map(|k| *k as f64));
        assert!((small_mean - 1.2).abs() < 0.05, "{small_mean}");

        let large = sampler.poisson(25.0, 20_000).unwrap();
        let large_mean = mean(large.iter().map(|k| *k as f64));
        assert!((large_mean - 25.0).abs() < 0.3, "{large_mean}");

        assert_eq!(sampler.poisson(0.0, 3).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn gamma_mean_is_shape_times_scale() {
        let mut sampler = numpy_sampler(5);
        for (shape, scale) in [(2.2, 3.0), (0.5, 2.0), (1.0, 1.5)] {
            let values = sampler.gamma(shape, scale, 20_000).unwrap();
            assert!(values.iter().all(|v| *v >= 0.0));
            let m = mean(values.into_iter());
            let expected = shape * scale;
            assert!((m - expected).abs() < 0.05 * expected + 0.02, "{shape} {scale}: {m}");
        }
    }

    #[test]
    fn bernoulli_rates_and_extremes() {
        let mut sampler = numpy_sampler(8);
        for p in [0.25, 0.4, 0.65, 0.8] {
            let values = sampler.bernoulli(p, 20_000).unwrap();
            assert!(values.iter().all(|v| *v == 0 || *v == 1));
            let rate = mean(values.iter().map(|v| *v as f64));
            assert!((rate - p).abs() < 0.02, "{p}: {rate}");
        }
        assert!(sampler.bernoulli(0.0, 100).unwrap().iter().all(|v| *v == 0));
        assert!(sampler.bernoulli(1.0, 100).unwrap().iter().all(|v| *v == 1));
    }

    #[test]
    fn bernoulli_each_follows_row_probabilities() {
        let mut sampler = numpy_sampler(9);
        let probs = [0.0, 1.0, 0.0, 1.0];
        assert_eq!(sampler.bernoulli_each(&probs).unwrap(), vec![0, 1, 0, 1]);
    }

    #[test]
    fn choice_follows_probabilities() {
        let mut sampler = numpy_sampler(4);
        let labels = ["a", "b", "c"];
        let picks = sampler.choice(&labels, &[0.6, 0.3, 0.1], 30_000).unwrap();
        let share = |label: &str| picks.iter().filter(|p| **p == label).count() as f64 / 30_000.0;
        assert!((share("a") - 0.6).abs() < 0.02);
        assert!((share("b") - 0.3).abs() < 0.02);
        assert!((share("c") - 0.1).abs() < 0.02);

        let only = sampler.choice(&labels, &[0.0, 1.0, 0.0], 50).unwrap();
        assert!(only.iter().all(|p| *p == "b"));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut sampler = numpy_sampler(0);
        assert!(sampler.normal(0.0, -1.0, 1).is_err());
        assert!(sampler.normal(0.0, f64::NAN, 1).is_err());
        assert!(sampler.lognormal(0.0, -0.1, 1).is_err());
        assert!(sampler.gamma(-1.0, 1.0, 1).is_err());
        assert!(sampler.poisson(-0.5, 1).is_err());
        assert!(sampler.bernoulli(1.5, 1).is_err());
        assert!(sampler.bernoulli_each(&[0.5, -0.1]).is_err());
        assert!(sampler.randint(5, 5, 1).is_err());
        assert!(sampler.choice(&["a", "b"], &[0.5, 0.4], 1).is_err());
        assert!(sampler.choice(&["a", "b"], &[1.0], 1).is_err());

        let err = sampler.choice::<&str>(&[], &[], 1).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::InvalidParameter {
                distribution: "choice",
                ..
            }
        ));
    }

    #[test]
    fn log_gamma_of_small_integers() {
        // log((k - 1)!)
        assert_eq!(log_gamma(1.0), 0.0);
        assert_eq!(log_gamma(2.0), 0.0);
        assert!((log_gamma(5.0) - 24f64.ln()).abs() < 1e-10);
        assert!((log_gamma(11.0) - 3_628_800f64.ln()).abs() < 1e-9);
    }
}
