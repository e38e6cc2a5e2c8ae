//! Lexical sentiment scoring for comments, titles and descriptions.
//!
//! [`polarity`] scores one text in `[-1.0, 1.0]`; [`sentiment`] averages the
//! polarity of one or many texts.

pub mod aggregate;
pub mod error;
pub mod scorer;

pub use aggregate::{sentiment, Texts};
pub use error::SentimentError;
pub use scorer::polarity;
