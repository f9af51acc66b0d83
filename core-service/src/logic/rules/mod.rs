//! Rule Engine - CME candidate detection
//!
//! Full rescan of the sample buffer on every invocation. A sample fires when
//!
//! ```text
//! (shock AND (highSpeed OR highDensity)) OR (highSpeed AND highDensity AND southBz)
//! ```
//!
//! Fired samples become `Detection`s, deduplicated by id and kept in a capped
//! `DetectionLog`.

pub mod types;
pub mod engine;
pub mod log;

#[cfg(test)]
mod tests;

pub use types::{Detection, Intensity};
pub use engine::{RuleConditions, RuleEngine};
pub use self::log::DetectionLog;
