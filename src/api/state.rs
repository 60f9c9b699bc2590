//! Application state for the Employer Cost Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::CostCalculator;

/// Shared application state.
///
/// Holds the calculator built from the statutory configuration loaded at
/// startup.
#[derive(Clone)]
pub struct AppState {
    calculator: Arc<CostCalculator>,
}

impl AppState {
    /// Creates a new application state around the given calculator.
    pub fn new(calculator: CostCalculator) -> Self {
        Self {
            calculator: Arc::new(calculator),
        }
    }

    /// Returns the shared calculator.
    pub fn calculator(&self) -> &CostCalculator {
        &self.calculator
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CostCalculator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_calculator() {
        let state = AppState::default();
        let clone = state.clone();
        assert!(std::ptr::eq(state.calculator(), clone.calculator()));
    }
}
