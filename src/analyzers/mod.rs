//! Aggregated views over the normalized record set.
//!
//! This module pivots records over a dimension and the period axis,
//! layers month-over-month derivations on top, ranks dimension members,
//! and joins two metrics into a cross-metric comparison table.

pub mod compare;
pub mod derive;
pub mod detail;
pub mod margin;
pub mod pivot;
pub mod ranking;
pub mod types;
pub mod utility;
