//! Employer Cost Engine for Brazilian hiring regimes
//!
//! This crate computes the fully-loaded monthly and annual cost of an
//! employee under CLT (Simples Nacional or Lucro Presumido/Real) and PJ
//! contracts, runs the calculation over spreadsheet rows and consolidates
//! the results by a grouping column.

#![warn(missing_docs)]

pub mod api;
pub mod batch;
pub mod calculation;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
