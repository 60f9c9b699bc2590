//! Core data models for the Employer Cost Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod batch;
mod breakdown;
mod profile;

pub use batch::{
    BatchOutcome, DetailRow, DetailTable, GRAND_TOTAL_LABEL, GroupKey, GroupSummary, GroupTotal,
    InputTable, Record, RowError, SummaryLabel, SummaryRow, UNGROUPED_LABEL,
};
pub use breakdown::{
    AuditStep, CostBreakdown, CostComponent, LineItem, NetPayEstimate, TOTAL_ANNUAL_COLUMN,
    TOTAL_MONTHLY_COLUMN,
};
pub use profile::{CompensationProfile, EmployerChargeRates, Regime};
