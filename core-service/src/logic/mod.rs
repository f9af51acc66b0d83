//! Logic Module - Pipeline engines
//!
//! Leaves first: `sample` → `buffer` → `features` / `anomaly` / `scorer` /
//! `forecast` → `rules` → `export` → `pipeline`.

pub mod config;
pub mod sample;
pub mod buffer;
pub mod features;
pub mod anomaly;
pub mod scorer;
pub mod forecast;
pub mod rules;
pub mod store;
pub mod export;
pub mod upstream;
pub mod pipeline;
