//! `kwcompare-engine` — keyword ranking comparison engine.
//!
//! Pure engine crate: receives pre-loaded keyword tables, returns classified
//! buckets. No CLI or IO dependencies.

pub mod classify;
pub mod engine;
pub mod error;
pub mod merge;
pub mod model;

pub use engine::run;
pub use error::CompareError;
pub use model::{Bucket, CompareReport, KeywordTable, LoadOutcome};
