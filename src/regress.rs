//! Ordinary least squares for `y ~ x`
//!
//! Single-predictor OLS with listwise deletion: rows where either variable
//! is undefined are excluded before fitting. Reports slope and intercept
//! with standard errors, t-values, two-sided p-values, and R², rendered as a
//! coefficient table in the style of a statsmodels summary.
//!
//! No external statistics dependency: the Student-t tail is evaluated
//! through the regularized incomplete beta function.

use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;

use crate::error::FitpulseError;

/// A fitted `y ~ x` model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OlsFit {
    pub response: String,
    pub predictor: String,
    /// Rows used after listwise deletion
    pub n_used: usize,
    pub intercept: f64,
    pub slope: f64,
    pub intercept_se: f64,
    pub slope_se: f64,
    pub intercept_t: f64,
    pub slope_t: f64,
    pub intercept_p: f64,
    pub slope_p: f64,
    pub r_squared: f64,
}

/// Fit `y ~ x` by ordinary least squares.
///
/// `x` and `y` are positional columns of equal length; a row enters the fit
/// only when both are defined. At least three complete rows are required
/// (one residual degree of freedom).
pub fn fit_ols(
    response: &str,
    predictor: &str,
    y: &[Option<f64>],
    x: &[Option<f64>],
) -> Result<OlsFit, FitpulseError> {
    if x.len() != y.len() {
        return Err(FitpulseError::RegressionError(format!(
            "column lengths differ: {} vs {}",
            y.len(),
            x.len()
        )));
    }

    // Listwise deletion
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    let n = pairs.len();
    if n < 3 {
        return Err(FitpulseError::RegressionError(format!(
            "need at least 3 complete rows, have {n}"
        )));
    }

    let nf = n as f64;
    let x_mean = pairs.iter().map(|(x, _)| x).sum::<f64>() / nf;
    let y_mean = pairs.iter().map(|(_, y)| y).sum::<f64>() / nf;

    let sxx: f64 = pairs.iter().map(|(x, _)| (x - x_mean).powi(2)).sum();
    let sxy: f64 = pairs
        .iter()
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    if sxx == 0.0 {
        return Err(FitpulseError::RegressionError(
            "predictor has zero variance".to_string(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let sse: f64 = pairs
        .iter()
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum();
    let sst: f64 = pairs.iter().map(|(_, y)| (y - y_mean).powi(2)).sum();
    let df = nf - 2.0;
    let residual_var = sse / df;

    let slope_se = (residual_var / sxx).sqrt();
    let intercept_se = (residual_var * (1.0 / nf + x_mean.powi(2) / sxx)).sqrt();

    let slope_t = t_value(slope, slope_se);
    let intercept_t = t_value(intercept, intercept_se);

    Ok(OlsFit {
        response: response.to_string(),
        predictor: predictor.to_string(),
        n_used: n,
        intercept,
        slope,
        intercept_se,
        slope_se,
        intercept_t,
        slope_t,
        intercept_p: two_sided_p(intercept_t, df),
        slope_p: two_sided_p(slope_t, df),
        r_squared: if sst > 0.0 { 1.0 - sse / sst } else { 1.0 },
    })
}

fn t_value(coef: f64, se: f64) -> f64 {
    if se == 0.0 {
        if coef == 0.0 {
            0.0
        } else {
            f64::INFINITY * coef.signum()
        }
    } else {
        coef / se
    }
}

/// Two-sided p-value for a t statistic with `df` degrees of freedom
fn two_sided_p(t: f64, df: f64) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }
    let x = df / (df + t * t);
    reg_incomplete_beta(df / 2.0, 0.5, x).clamp(0.0, 1.0)
}

/// Regularized incomplete beta function I_x(a, b)
fn reg_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front =
        ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_cf(a, b, x) / a
    } else {
        1.0 - front * beta_cf(b, a, 1.0 - x) / b
    }
}

/// Continued-fraction expansion of the incomplete beta (modified Lentz)
fn beta_cf(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 200;
    const EPS: f64 = 3.0e-14;
    const FPMIN: f64 = 1.0e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < FPMIN {
        d = FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < FPMIN {
            d = FPMIN;
        }
        c = 1.0 + aa / c;
        if c.abs() < FPMIN {
            c = FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Natural log of the gamma function (Lanczos, g = 7)
fn ln_gamma(x: f64) -> f64 {
    const COEF: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut acc = COEF[0];
        for (i, coef) in COEF.iter().enumerate().skip(1) {
            acc += coef / (x + i as f64);
        }
        let t = x + 7.5;
        0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
    }
}

impl fmt::Display for OlsFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "OLS: {} ~ {}   (n = {}, R² = {:.3})",
            self.response, self.predictor, self.n_used, self.r_squared
        )?;
        writeln!(
            f,
            "{:<12} {:>12} {:>12} {:>10} {:>10}",
            "", "coef", "std err", "t", "P>|t|"
        )?;
        writeln!(
            f,
            "{:<12} {:>12.4} {:>12.4} {:>10.3} {:>10.3}",
            "Intercept", self.intercept, self.intercept_se, self.intercept_t, self.intercept_p
        )?;
        write!(
            f,
            "{:<12} {:>12.4} {:>12.4} {:>10.3} {:>10.3}",
            self.predictor, self.slope, self.slope_se, self.slope_t, self.slope_p
        )
    }
}
