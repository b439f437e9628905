//! Trip aggregation engine.
//!
//! Every function here is a pure pass over an in-memory trip snapshot:
//! summary averages, correlation, payment-type and company group-bys,
//! rankings, and chart breakdowns. [`analyzer::analyze`] runs them all.

pub mod aggregate;
pub mod analyzer;
pub mod correlation;
pub mod distribution;
pub mod ranking;
pub mod types;
pub mod utility;
