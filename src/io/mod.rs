//! File output for aligned series and stage results.

pub mod export;
