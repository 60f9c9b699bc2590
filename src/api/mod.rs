//! HTTP API module for the Employer Cost Engine.
//!
//! This module provides the REST API endpoints for single calculations,
//! regime comparisons and batch runs.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BatchRequest, CalculationRequest};
pub use response::{
    ApiError, BatchResponse, CalculationResponse, ComparisonResponse, RegimeComparison,
};
pub use state::AppState;
