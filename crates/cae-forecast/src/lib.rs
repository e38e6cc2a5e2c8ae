//! View-count forecasting for the next upload of a channel.
//!
//! Historical views are modelled as log-normal with location fixed at zero.
//! [`forecast`] fits that distribution and turns a confidence level into
//! one- or two-sided prediction bounds.

pub mod error;
pub mod estimator;
pub mod normal;

pub use error::ForecastError;
pub use estimator::{forecast, forecast_records, LogNormalFit, DEFAULT_CONFIDENCE};
pub use normal::inverse_normal_cdf;
