//! Data models

pub mod detection;
pub mod sample;

pub use detection::*;
pub use sample::*;
