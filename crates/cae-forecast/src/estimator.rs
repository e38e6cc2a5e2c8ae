use cae_core::{ForecastInterval, IntervalKind, VideoStatRecord};

use crate::error::ForecastError;
use crate::normal::inverse_normal_cdf;

pub const DEFAULT_CONFIDENCE: f64 = 0.90;

/// Maximum-likelihood log-normal fit with location fixed at zero.
///
/// `mu` and `sigma` are the mean and population standard deviation of the
/// natural logarithms of the sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormalFit {
    pub mu: f64,
    pub sigma: f64,
}

impl LogNormalFit {
    /// Fit the distribution to `values`.
    ///
    /// # Errors
    ///
    /// Returns [`ForecastError::EmptySeries`] for an empty slice and
    /// [`ForecastError::NonPositiveValue`] / [`ForecastError::NonFiniteValue`]
    /// for the first value that is not a strictly positive finite number.
    pub fn fit(values: &[f64]) -> Result<Self, ForecastError> {
        if values.is_empty() {
            return Err(ForecastError::EmptySeries);
        }
        for (index, &value) in values.iter().enumerate() {
            if value.is_nan() || value <= 0.0 {
                return Err(ForecastError::NonPositiveValue { index, value });
            }
            if value.is_infinite() {
                return Err(ForecastError::NonFiniteValue { index, value });
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let n = values.len() as f64;
        let mu = values.iter().map(|v| v.ln()).sum::<f64>() / n;
        let variance = values
            .iter()
            .map(|v| {
                let d = v.ln() - mu;
                d * d
            })
            .sum::<f64>()
            / n;

        Ok(Self {
            mu,
            sigma: variance.sqrt(),
        })
    }

    /// Value below which a fraction `p` of the probability mass lies.
    #[must_use]
    pub fn quantile(&self, p: f64) -> f64 {
        (self.mu + self.sigma * inverse_normal_cdf(p)).exp()
    }

    #[must_use]
    pub fn median(&self) -> f64 {
        self.mu.exp()
    }
}

/// Prediction bounds for the next observation of a view series.
///
/// With `alpha = 1 - confidence_level`:
/// - [`IntervalKind::Lower`] → `(Q(alpha), +inf)`
/// - [`IntervalKind::Upper`] → `(-inf, Q(confidence_level))`
/// - [`IntervalKind::TwoSided`] → `(Q(alpha / 2), Q(1 - alpha / 2))`
///
/// A single-value series fits `sigma = 0`, so both finite bounds collapse
/// onto that value.
///
/// # Errors
///
/// Returns [`ForecastError::InvalidConfidence`] when `confidence_level` is
/// not in the open interval `(0, 1)`, plus the fitting errors of
/// [`LogNormalFit::fit`].
pub fn forecast(
    views: &[f64],
    confidence_level: f64,
    kind: IntervalKind,
) -> Result<ForecastInterval, ForecastError> {
    if confidence_level.is_nan() || confidence_level <= 0.0 || confidence_level >= 1.0 {
        return Err(ForecastError::InvalidConfidence(confidence_level));
    }

    let fit = LogNormalFit::fit(views)?;
    let alpha = 1.0 - confidence_level;

    let (lower, upper) = match kind {
        IntervalKind::Lower => (fit.quantile(alpha), f64::INFINITY),
        IntervalKind::Upper => (f64::NEG_INFINITY, fit.quantile(confidence_level)),
        IntervalKind::TwoSided => (fit.quantile(alpha / 2.0), fit.quantile(1.0 - alpha / 2.0)),
    };

    tracing::debug!(
        samples = views.len(),
        mu = fit.mu,
        sigma = fit.sigma,
        confidence_level,
        %kind,
        lower,
        upper,
        "fitted view forecast"
    );

    Ok(ForecastInterval { kind, lower, upper })
}

/// [`forecast`] over the view counts of filtered stat records.
///
/// # Errors
///
/// Same as [`forecast`]; a zero view count is rejected as non-positive.
pub fn forecast_records(
    records: &[VideoStatRecord],
    confidence_level: f64,
    kind: IntervalKind,
) -> Result<ForecastInterval, ForecastError> {
    #[allow(clippy::cast_precision_loss)]
    let views: Vec<f64> = records.iter().map(|r| r.view_count as f64).collect();
    forecast(&views, confidence_level, kind)
}
